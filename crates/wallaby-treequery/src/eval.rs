//! Path expression evaluation.
//!
//! Steps are evaluated left to right over a growing set of context nodes;
//! predicates filter each context node's axis candidates with XPath-style
//! position semantics ([§ 2.4 Predicates](https://www.w3.org/TR/xpath-10/#predicates):
//! "a predicate filters a node-set with respect to an axis").

use std::collections::HashSet;

use wallaby_dom::{DomTree, NodeId};

use crate::QueryError;
use crate::path::{Axis, BinOp, Expr, Func, PathExpr, SiblingAxis};

/// An expression value.
///
/// [§ 1 Introduction](https://www.w3.org/TR/xpath-10/#section-Introduction)
/// "An object is one of four basic types (node-set, boolean, number, string)."
/// The extra `Attr` variant keeps attribute existence distinct from an empty
/// value, so `[@disabled]` holds for `disabled=""` while `[@a != "v"]` holds
/// for an absent attribute.
#[derive(Debug, Clone)]
enum Value {
    Number(i64),
    Text(String),
    Boolean(bool),
    Nodes(Vec<NodeId>),
    Attr { exists: bool, value: String },
}

impl Value {
    /// [§ 4.3 boolean()](https://www.w3.org/TR/xpath-10/#function-boolean)
    /// "a node-set is true if and only if it is non-empty"
    fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Nodes(nodes) => !nodes.is_empty(),
            Value::Attr { exists, .. } => *exists,
        }
    }

    fn as_str(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Nodes(_) => String::new(),
            Value::Attr { value, .. } => value.clone(),
        }
    }

    fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) | Value::Attr { value: s, .. } => s.parse().ok(),
            Value::Boolean(b) => Some(i64::from(*b)),
            Value::Nodes(_) => None,
        }
    }
}

/// Per-candidate evaluation context: the node under test plus its 1-based
/// position and the size of its axis candidate list.
struct EvalContext<'a> {
    tree: &'a DomTree,
    node: NodeId,
    position: i64,
    size: i64,
}

/// Evaluate a parsed path against a context node.
///
/// Returns the matched nodes without any order guarantee (deduplicated).
pub fn evaluate_path(
    tree: &DomTree,
    context: NodeId,
    path: &PathExpr,
) -> Result<Vec<NodeId>, QueryError> {
    let mut contexts = vec![context];

    for step in &path.steps {
        let mut next: Vec<NodeId> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();

        for &ctx in &contexts {
            let mut candidates = axis_nodes(tree, ctx, step.axis, &step.tag);
            for predicate in &step.predicates {
                candidates = filter_predicate(tree, candidates, predicate)?;
            }
            for node in candidates {
                if seen.insert(node) {
                    next.push(node);
                }
            }
        }

        contexts = next;
        if contexts.is_empty() {
            break;
        }
    }

    Ok(contexts)
}

/// Collect the axis candidates of one context node, filtered by node test.
fn axis_nodes(tree: &DomTree, ctx: NodeId, axis: Axis, tag: &str) -> Vec<NodeId> {
    let matches_tag = |id: NodeId| {
        tree.as_element(id)
            .is_some_and(|e| tag == "*" || e.tag_name.eq_ignore_ascii_case(tag))
    };
    match axis {
        Axis::Descendant => tree.descendants(ctx).filter(|&id| matches_tag(id)).collect(),
        Axis::Child => tree
            .children(ctx)
            .iter()
            .copied()
            .filter(|&id| matches_tag(id))
            .collect(),
        Axis::FollowingSibling => tree
            .following_siblings(ctx)
            .filter(|&id| matches_tag(id))
            .collect(),
    }
}

/// Apply one predicate to a candidate list.
///
/// [§ 2.4](https://www.w3.org/TR/xpath-10/#predicates) "If the result is a
/// number, the result will be converted to true if the number is equal to
/// the context position."
fn filter_predicate(
    tree: &DomTree,
    candidates: Vec<NodeId>,
    predicate: &Expr,
) -> Result<Vec<NodeId>, QueryError> {
    let size = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
    let mut kept = Vec::new();
    for (index, node) in candidates.iter().enumerate() {
        let ctx = EvalContext {
            tree,
            node: *node,
            position: i64::try_from(index).unwrap_or(i64::MAX - 1) + 1,
            size,
        };
        let value = eval_expr(&ctx, predicate)?;
        let keep = match value {
            Value::Number(n) => n == ctx.position,
            other => other.truthy(),
        };
        if keep {
            kept.push(*node);
        }
    }
    Ok(kept)
}

fn eval_expr(ctx: &EvalContext<'_>, expr: &Expr) -> Result<Value, QueryError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Literal(s) => Ok(Value::Text(s.clone())),
        Expr::Attr(name) => {
            let attr = ctx
                .tree
                .as_element(ctx.node)
                .and_then(|e| e.attrs.get(name));
            Ok(Value::Attr {
                exists: attr.is_some(),
                value: attr.cloned().unwrap_or_default(),
            })
        }
        Expr::Siblings(axis) => Ok(Value::Nodes(sibling_elements(ctx, *axis))),
        Expr::Call(func, args) => eval_call(ctx, *func, args),
        Expr::Binary(op, left, right) => eval_binary(ctx, *op, left, right),
    }
}

fn sibling_elements(ctx: &EvalContext<'_>, axis: SiblingAxis) -> Vec<NodeId> {
    let iter: Box<dyn Iterator<Item = NodeId>> = match axis {
        SiblingAxis::Preceding => Box::new(ctx.tree.preceding_siblings(ctx.node)),
        SiblingAxis::Following => Box::new(ctx.tree.following_siblings(ctx.node)),
    };
    iter.filter(|&id| ctx.tree.as_element(id).is_some()).collect()
}

fn eval_binary(
    ctx: &EvalContext<'_>,
    op: BinOp,
    left: &Expr,
    right: &Expr,
) -> Result<Value, QueryError> {
    // Boolean operators short-circuit.
    match op {
        BinOp::Or => {
            let l = eval_expr(ctx, left)?;
            if l.truthy() {
                return Ok(Value::Boolean(true));
            }
            return Ok(Value::Boolean(eval_expr(ctx, right)?.truthy()));
        }
        BinOp::And => {
            let l = eval_expr(ctx, left)?;
            if !l.truthy() {
                return Ok(Value::Boolean(false));
            }
            return Ok(Value::Boolean(eval_expr(ctx, right)?.truthy()));
        }
        _ => {}
    }

    let l = eval_expr(ctx, left)?;
    let r = eval_expr(ctx, right)?;
    match op {
        BinOp::Eq => Ok(Value::Boolean(compare(&l, &r))),
        BinOp::NotEq => Ok(Value::Boolean(!compare(&l, &r))),
        BinOp::Add | BinOp::Sub | BinOp::Mod => {
            let (Some(a), Some(b)) = (l.as_number(), r.as_number()) else {
                return Err(QueryError::BadArgument(
                    "arithmetic on a non-numeric value".to_string(),
                ));
            };
            let result = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mod if b != 0 => a % b,
                _ => return Err(QueryError::BadArgument("mod by zero".to_string())),
            };
            Ok(Value::Number(result))
        }
        BinOp::Or | BinOp::And | BinOp::Eq | BinOp::NotEq => unreachable!(),
    }
}

/// Equality comparison with attribute-aware semantics: an attribute equals a
/// string only when it exists, so `!=` holds for absent attributes.
fn compare(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Attr { exists, value }, other) | (other, Value::Attr { exists, value }) => {
            *exists && *value == other.as_str()
        }
        (Value::Number(a), b) | (b, Value::Number(a)) => b.as_number() == Some(*a),
        (a, b) => a.as_str() == b.as_str(),
    }
}

fn eval_call(ctx: &EvalContext<'_>, func: Func, args: &[Expr]) -> Result<Value, QueryError> {
    let arity = |expected: usize| -> Result<(), QueryError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(QueryError::BadArgument(format!(
                "{func:?} expects {expected} argument(s), got {}",
                args.len()
            )))
        }
    };

    match func {
        Func::Count => {
            arity(1)?;
            match eval_expr(ctx, &args[0])? {
                Value::Nodes(nodes) => {
                    Ok(Value::Number(i64::try_from(nodes.len()).unwrap_or(i64::MAX)))
                }
                _ => Err(QueryError::BadArgument(
                    "count() expects a node-set".to_string(),
                )),
            }
        }
        Func::Last => {
            arity(0)?;
            Ok(Value::Number(ctx.size))
        }
        Func::Position => {
            arity(0)?;
            Ok(Value::Number(ctx.position))
        }
        Func::Not => {
            arity(1)?;
            Ok(Value::Boolean(!eval_expr(ctx, &args[0])?.truthy()))
        }
        Func::Contains => {
            arity(2)?;
            let haystack = eval_expr(ctx, &args[0])?.as_str();
            let needle = eval_expr(ctx, &args[1])?.as_str();
            Ok(Value::Boolean(haystack.contains(&needle)))
        }
        Func::StartsWith => {
            arity(2)?;
            let haystack = eval_expr(ctx, &args[0])?.as_str();
            let prefix = eval_expr(ctx, &args[1])?.as_str();
            Ok(Value::Boolean(haystack.starts_with(&prefix)))
        }
        Func::Concat => {
            let mut out = String::new();
            for arg in args {
                out.push_str(&eval_expr(ctx, arg)?.as_str());
            }
            Ok(Value::Text(out))
        }
        Func::Substring => {
            // [§ 4.2](https://www.w3.org/TR/xpath-10/#function-substring)
            // "substring("12345", 2) returns "2345""
            if args.len() != 2 && args.len() != 3 {
                return Err(QueryError::BadArgument(
                    "substring() expects 2 or 3 arguments".to_string(),
                ));
            }
            let s = eval_expr(ctx, &args[0])?.as_str();
            let start = eval_expr(ctx, &args[1])?
                .as_number()
                .ok_or_else(|| QueryError::BadArgument("substring() start".to_string()))?;
            let skip = usize::try_from(start.max(1) - 1).unwrap_or(0);
            let taken: String = match args.get(2) {
                Some(len_expr) => {
                    let len = eval_expr(ctx, len_expr)?
                        .as_number()
                        .ok_or_else(|| QueryError::BadArgument("substring() length".to_string()))?;
                    let take = usize::try_from(len.max(0)).unwrap_or(0);
                    s.chars().skip(skip).take(take).collect()
                }
                None => s.chars().skip(skip).collect(),
            };
            Ok(Value::Text(taken))
        }
        Func::StringLength => {
            arity(1)?;
            let s = eval_expr(ctx, &args[0])?.as_str();
            Ok(Value::Number(
                i64::try_from(s.chars().count()).unwrap_or(i64::MAX),
            ))
        }
        Func::Text => {
            arity(0)?;
            Ok(Value::Text(ctx.tree.text_content(ctx.node)))
        }
        Func::Node => {
            arity(0)?;
            Ok(Value::Nodes(ctx.tree.children(ctx.node).to_vec()))
        }
    }
}
