//! Set utilities over ordered node sequences.
//!
//! These are the building blocks the imperative backend narrows candidate
//! sets with: deduplication plus per-clause filters. Each takes and returns
//! an ordered `Vec<NodeId>`.

use std::collections::HashSet;

use wallaby_dom::{DomTree, ElementData, NodeId};

use crate::grammar::{AttrOperator, AttributeClause};
use crate::pseudo::{NthExpr, PseudoClause, PseudoParam};

/// Deduplicate, preserving first-seen order.
#[must_use]
pub fn unique(items: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Keep only nodes whose id attribute equals `id`.
#[must_use]
pub fn filter_by_id(tree: &DomTree, items: Vec<NodeId>, id: &str) -> Vec<NodeId> {
    items
        .into_iter()
        .filter(|&node| {
            tree.as_element(node)
                .is_some_and(|e| e.id().is_some_and(|v| v == id))
        })
        .collect()
}

/// Keep only nodes whose class attribute contains `class_name` as a whole
/// space-delimited token.
#[must_use]
pub fn filter_by_class(tree: &DomTree, items: Vec<NodeId>, class_name: &str) -> Vec<NodeId> {
    let token = format!(" {class_name} ");
    items
        .into_iter()
        .filter(|&node| {
            tree.as_element(node).is_some_and(|e| {
                e.attrs
                    .get("class")
                    .is_some_and(|list| format!(" {list} ").contains(&token))
            })
        })
        .collect()
}

/// Keep only nodes satisfying an attribute clause.
#[must_use]
pub fn filter_by_attribute(
    tree: &DomTree,
    items: Vec<NodeId>,
    clause: &AttributeClause,
) -> Vec<NodeId> {
    items
        .into_iter()
        .filter(|&node| {
            tree.as_element(node)
                .is_some_and(|e| attribute_matches(e, clause))
        })
        .collect()
}

fn attribute_matches(element: &ElementData, clause: &AttributeClause) -> bool {
    let current = element.attrs.get(&clause.key);
    let (Some(operator), Some(value)) = (clause.operator, clause.value.as_deref()) else {
        return current.is_some();
    };
    let Some(current) = current else {
        // An absent attribute satisfies only the not-equals test.
        return operator == AttrOperator::NotEquals;
    };
    match operator {
        AttrOperator::Equals => current == value,
        AttrOperator::NotEquals => current != value,
        AttrOperator::Contains => current.contains(value),
        AttrOperator::Prefix => current.starts_with(value),
        AttrOperator::Suffix => current.ends_with(value),
        AttrOperator::Includes => format!(" {current} ").contains(&format!(" {value} ")),
    }
}

/// Keep only nodes satisfying a pseudo clause.
#[must_use]
pub fn filter_by_pseudo(tree: &DomTree, items: Vec<NodeId>, clause: &PseudoClause) -> Vec<NodeId> {
    items
        .into_iter()
        .filter(|&node| pseudo_matches(tree, node, clause))
        .collect()
}

/// Count of preceding element siblings (the 0-based structural position).
fn preceding_element_count(tree: &DomTree, node: NodeId) -> i64 {
    let count = tree
        .preceding_siblings(node)
        .filter(|&id| tree.as_element(id).is_some())
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn pseudo_matches(tree: &DomTree, node: NodeId, clause: &PseudoClause) -> bool {
    match clause.name.as_str() {
        "nth" => {
            let PseudoParam::Nth(nth) = &clause.param else {
                return false;
            };
            let count = preceding_element_count(tree, node);
            match *nth {
                NthExpr::Exact(n) => count == n,
                // A zero multiple can never divide the count.
                NthExpr::Step { step: 0, .. } => false,
                NthExpr::Step { step, offset } => count.rem_euclid(step) == offset,
            }
        }
        "first" => preceding_element_count(tree, node) == 0,
        "last" => !tree
            .following_siblings(node)
            .any(|id| tree.as_element(id).is_some()),
        "empty" => tree.children(node).is_empty(),
        "only" => {
            let siblings = tree
                .preceding_siblings(node)
                .chain(tree.following_siblings(node))
                .filter(|&id| tree.as_element(id).is_some())
                .count();
            siblings == 0
        }
        "contains" => {
            let needle = match &clause.param {
                PseudoParam::Literal(s) => s.as_str(),
                _ => "",
            };
            tree.text_content(node).contains(needle)
        }
        "enabled" => tree
            .as_element(node)
            .is_some_and(|e| !e.attrs.contains_key("disabled")),
        // Unrecognized names test the attribute of the same name.
        name => tree.as_element(node).is_some_and(|e| {
            let attr = e.attrs.get(name);
            match &clause.param {
                PseudoParam::Literal(value) => attr.is_some_and(|v| v == value),
                _ => attr.is_some(),
            }
        }),
    }
}
