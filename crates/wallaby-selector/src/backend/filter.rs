//! The imperative backend: candidate-set narrowing by direct tree walking.
//!
//! The candidate set is seeded from the first simple selector (by unique id
//! within the context, or by all tag-matching descendants), then each
//! subsequent step narrows it structurally per its combinator and filters by
//! id, class, attribute, and pseudo clause.

use wallaby_dom::{DomTree, NodeId};

use crate::backend::{MatchStrategy, filters, in_document_order};
use crate::error::SelectorError;
use crate::grammar::{AttributeClause, parse_attribute_clause};
use crate::parser::{Combinator, CompiledSelector, SelectorStep, SimpleSelector};
use crate::pseudo::{PseudoClause, parse_pseudo};

/// Tree-walking strategy; always available.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterStrategy;

/// A selector step with its attribute and pseudo clauses parsed up front,
/// so clause errors surface before any tree access.
struct ResolvedStep<'a> {
    combinator: Option<Combinator>,
    simple: &'a SimpleSelector,
    attribute: Option<AttributeClause>,
    pseudo: Option<PseudoClause>,
}

fn resolve(step: &SelectorStep) -> Result<ResolvedStep<'_>, SelectorError> {
    Ok(ResolvedStep {
        combinator: step.combinator,
        simple: &step.simple,
        attribute: step
            .simple
            .attribute
            .as_deref()
            .map(parse_attribute_clause)
            .transpose()?,
        pseudo: step.simple.pseudo.as_deref().map(parse_pseudo).transpose()?,
    })
}

impl MatchStrategy for FilterStrategy {
    fn matches(
        &self,
        tree: &DomTree,
        context: NodeId,
        selector: &CompiledSelector,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let steps = selector
            .steps
            .iter()
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;

        let mut items: Vec<NodeId> = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            if index == 0 {
                items = match &step.simple.id {
                    Some(id) => seed_by_id(tree, context, id, &step.simple.tag),
                    None => descendants_by_tag(tree, context, &step.simple.tag),
                };
                // A missing or tag-mismatched id terminates the walk early.
                if step.simple.id.is_some() && items.is_empty() {
                    return Ok(Vec::new());
                }
            } else {
                let combinator = step.combinator.unwrap_or(Combinator::Descendant);
                items = narrow(tree, &items, combinator, &step.simple.tag);
                if let Some(id) = &step.simple.id {
                    items = filters::filter_by_id(tree, items, id);
                }
            }

            if let Some(class_name) = &step.simple.class_name {
                items = filters::filter_by_class(tree, items, class_name);
            }
            if let Some(clause) = &step.attribute {
                items = filters::filter_by_attribute(tree, items, clause);
            }
            if let Some(clause) = &step.pseudo {
                items = filters::filter_by_pseudo(tree, items, clause);
            }
        }

        Ok(in_document_order(tree, filters::unique(items)))
    }
}

/// Does this node pass the element + tag test?
fn has_tag(tree: &DomTree, node: NodeId, tag: &str) -> bool {
    tree.as_element(node)
        .is_some_and(|e| tag == "*" || e.tag_name.eq_ignore_ascii_case(tag))
}

/// Seed the candidate set from a unique id within `context`, tag-checked.
fn seed_by_id(tree: &DomTree, context: NodeId, id: &str, tag: &str) -> Vec<NodeId> {
    match tree.element_by_id(context, id) {
        Some(node) if has_tag(tree, node, tag) => vec![node],
        _ => Vec::new(),
    }
}

/// All tag-matching descendant elements of `context`, document order.
fn descendants_by_tag(tree: &DomTree, context: NodeId, tag: &str) -> Vec<NodeId> {
    tree.descendants(context)
        .filter(|&id| has_tag(tree, id, tag))
        .collect()
}

/// Replace the candidate set per the combinator's structural relation.
fn narrow(tree: &DomTree, items: &[NodeId], combinator: Combinator, tag: &str) -> Vec<NodeId> {
    let mut found = Vec::new();
    for &item in items {
        match combinator {
            Combinator::Descendant => {
                found.extend(tree.descendants(item).filter(|&id| has_tag(tree, id, tag)));
            }
            Combinator::Child => {
                found.extend(
                    tree.children(item)
                        .iter()
                        .copied()
                        .filter(|&id| has_tag(tree, id, tag)),
                );
            }
            Combinator::AdjacentSibling => {
                // Nearest following sibling matching the tag, not merely the
                // immediate one.
                if let Some(next) = tree
                    .following_siblings(item)
                    .find(|&id| has_tag(tree, id, tag))
                {
                    found.push(next);
                }
            }
            Combinator::GeneralSibling => {
                found.extend(
                    tree.following_siblings(item)
                        .filter(|&id| has_tag(tree, id, tag)),
                );
            }
        }
    }
    found
}
