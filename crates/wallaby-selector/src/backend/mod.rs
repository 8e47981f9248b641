//! Evaluation backends.
//!
//! A compiled selector can be matched two ways: declaratively, by folding
//! it into one tree-query path evaluated in a single pass
//! ([`xpath::XPathStrategy`]), or imperatively, by narrowing a candidate
//! node set step by step ([`filter::FilterStrategy`]). Both produce
//! identical ordered, deduplicated match sets; the choice is a performance
//! trade-off, not a semantic one.

use std::collections::HashSet;

use wallaby_dom::{DomTree, NodeId};

use crate::error::SelectorError;
use crate::parser::CompiledSelector;

pub mod filter;
pub mod filters;
#[cfg(feature = "treequery")]
pub mod xpath;

/// A selector evaluation strategy.
///
/// Implementations must return matches in document order with no
/// duplicates, and must raise clause parse errors before any tree access.
pub trait MatchStrategy {
    /// Match a compiled selector against the subtree rooted at `context`
    /// (`context` itself is never a match).
    ///
    /// # Errors
    ///
    /// A [`SelectorError`] for a malformed attribute or pseudo clause.
    /// Matching nothing is an empty `Vec`, never an error.
    fn matches(
        &self,
        tree: &DomTree,
        context: NodeId,
        selector: &CompiledSelector,
    ) -> Result<Vec<NodeId>, SelectorError>;
}

/// Reduce `items` to the document-ordered set of distinct nodes, by
/// intersecting a pre-order walk of the whole tree with the set.
pub(crate) fn in_document_order(tree: &DomTree, items: Vec<NodeId>) -> Vec<NodeId> {
    let set: HashSet<NodeId> = items.into_iter().collect();
    tree.descendants(tree.root())
        .filter(|id| set.contains(id))
        .collect()
}
