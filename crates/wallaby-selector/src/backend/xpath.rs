//! The declarative backend: compile to one tree-query path, evaluate once.
//!
//! Each selector step becomes a location step — axis chosen by combinator,
//! node test from the tag — followed by predicates in fixed order: pseudo,
//! id, class, attribute. The whole path is built (surfacing any clause
//! error) before the single evaluation, and the snapshot is materialized in
//! document order.

use std::fmt::Write;

use wallaby_dom::{DomTree, NodeId};

use crate::backend::{MatchStrategy, in_document_order};
use crate::error::SelectorError;
use crate::grammar::{AttrOperator, parse_attribute_clause};
use crate::parser::{Combinator, CompiledSelector, SimpleSelector};
use crate::pseudo::{NthExpr, PseudoParam, parse_pseudo};

/// Tree-query strategy; compiled in with the `treequery` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct XPathStrategy;

impl MatchStrategy for XPathStrategy {
    fn matches(
        &self,
        tree: &DomTree,
        context: NodeId,
        selector: &CompiledSelector,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let mut path = String::from(".");
        for step in &selector.steps {
            push_step(&mut path, step.combinator, &step.simple)?;
        }

        // Generated paths always follow the evaluator's dialect; an
        // evaluator complaint still surfaces rather than matching nothing.
        let snapshot = wallaby_treequery::evaluate(tree, context, &path)
            .map_err(|e| SelectorError::BadSelector(e.to_string()))?;
        Ok(in_document_order(tree, snapshot.into_iter().collect()))
    }
}

/// Append one location step for a selector step.
fn push_step(
    path: &mut String,
    combinator: Option<Combinator>,
    simple: &SimpleSelector,
) -> Result<(), SelectorError> {
    let axis = match combinator {
        None | Some(Combinator::Descendant) => "//",
        Some(Combinator::Child) => "/",
        Some(Combinator::AdjacentSibling | Combinator::GeneralSibling) => "/following-sibling::",
    };
    path.push_str(axis);
    path.push_str(&simple.tag);
    if combinator == Some(Combinator::AdjacentSibling) {
        path.push_str("[1]");
    }

    if let Some(raw) = &simple.pseudo {
        push_pseudo_predicate(path, raw)?;
    }
    if let Some(id) = &simple.id {
        let _ = write!(path, "[@id=\"{id}\"]");
    }
    if let Some(class_name) = &simple.class_name {
        let _ = write!(
            path,
            "[contains(concat(\" \", @class, \" \"), \" {class_name} \")]"
        );
    }
    if let Some(raw) = &simple.attribute {
        push_attribute_predicate(path, raw)?;
    }
    Ok(())
}

/// Translate a pseudo clause into a structural predicate.
fn push_pseudo_predicate(path: &mut String, raw: &str) -> Result<(), SelectorError> {
    let clause = parse_pseudo(raw)?;
    match clause.name.as_str() {
        "nth" => {
            let PseudoParam::Nth(nth) = clause.param else {
                return Ok(());
            };
            match nth {
                NthExpr::Exact(n) => {
                    let _ = write!(path, "[count(preceding-sibling::*) = {n}]");
                }
                // A zero multiple matches no position at all.
                NthExpr::Step { step: 0, .. } => path.push_str("[0]"),
                NthExpr::Step { step, offset } => {
                    let _ = write!(path, "[count(preceding-sibling::*) mod {step} = {offset}]");
                }
            }
        }
        // Sibling-count forms rather than positional [1]/[last()]: the
        // imperative backend tests position among siblings, and the two
        // backends must agree on every tree.
        "first" => path.push_str("[count(preceding-sibling::*) = 0]"),
        "last" => path.push_str("[not(following-sibling::*)]"),
        "empty" => path.push_str("[not(node())]"),
        "only" => path.push_str("[not(preceding-sibling::* or following-sibling::*)]"),
        "contains" => {
            let needle = match &clause.param {
                PseudoParam::Literal(s) => s.as_str(),
                _ => "",
            };
            path.push_str("[contains(text(), ");
            push_literal(path, needle);
            path.push_str(")]");
        }
        "enabled" => path.push_str("[not(@disabled)]"),
        name => match &clause.param {
            PseudoParam::Literal(value) => {
                let _ = write!(path, "[@{name}=");
                push_literal(path, value);
                path.push(']');
            }
            _ => {
                let _ = write!(path, "[@{name}]");
            }
        },
    }
    Ok(())
}

/// Append a quoted string literal, picking the quote style the value does
/// not contain. A value carrying both styles becomes a `concat()` of
/// double-quoted runs joined by `'"'` pieces, the XPath 1.0 idiom for
/// literals with mixed quotes.
fn push_literal(path: &mut String, value: &str) {
    if !value.contains('"') {
        let _ = write!(path, "\"{value}\"");
    } else if !value.contains('\'') {
        let _ = write!(path, "'{value}'");
    } else {
        path.push_str("concat(");
        for (index, run) in value.split('"').enumerate() {
            if index > 0 {
                path.push_str(", '\"', ");
            }
            let _ = write!(path, "\"{run}\"");
        }
        path.push(')');
    }
}

/// Translate an attribute clause into a predicate.
fn push_attribute_predicate(path: &mut String, raw: &str) -> Result<(), SelectorError> {
    let clause = parse_attribute_clause(raw)?;
    let key = &clause.key;
    let (Some(operator), Some(value)) = (clause.operator, clause.value.as_deref()) else {
        let _ = write!(path, "[@{key}]");
        return Ok(());
    };
    match operator {
        AttrOperator::Equals => {
            let _ = write!(path, "[@{key}=\"{value}\"]");
        }
        AttrOperator::NotEquals => {
            let _ = write!(path, "[@{key}!=\"{value}\"]");
        }
        AttrOperator::Contains => {
            let _ = write!(path, "[contains(@{key}, \"{value}\")]");
        }
        AttrOperator::Prefix => {
            let _ = write!(path, "[starts-with(@{key}, \"{value}\")]");
        }
        AttrOperator::Suffix => {
            let len = value.chars().count();
            let _ = write!(
                path,
                "[substring(@{key}, string-length(@{key}) - {len} + 1) = \"{value}\"]"
            );
        }
        AttrOperator::Includes => {
            let _ = write!(
                path,
                "[contains(concat(\" \", @{key}, \" \"), \" {value} \")]"
            );
        }
    }
    Ok(())
}
