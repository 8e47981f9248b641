//! Public query entry points.
//!
//! [`find_all`]/[`find_first`] run a selector — including comma-separated
//! selector lists — against a context node via the process-wide engine.
//! [`Queryable`] exposes the same operations as capabilities on a node
//! handle ([`NodeRef`]) and on the document ([`wallaby_dom::DomTree`]).

use wallaby_dom::{DomTree, NodeId};

use crate::backend::in_document_order;
use crate::engine;
use crate::error::SelectorError;
use crate::parser::compile;

/// All matches of `selector` within `context` (default: document root), in
/// document order, deduplicated. Comma-separated selector lists are unioned.
///
/// # Errors
///
/// A [`SelectorError`] for a malformed selector; matching nothing returns
/// an empty `Vec`.
pub fn find_all(
    tree: &DomTree,
    context: Option<NodeId>,
    selector: &str,
) -> Result<Vec<NodeId>, SelectorError> {
    let context = context.unwrap_or_else(|| tree.root());
    let engine = engine::global();

    let mut out = Vec::new();
    for part in split_selector_list(selector) {
        let compiled = compile(part)?;
        out.extend(engine.matches(tree, context, &compiled)?);
    }
    Ok(in_document_order(tree, out))
}

/// The first match of `selector` within `context` in document order, or
/// `None`.
///
/// # Errors
///
/// A [`SelectorError`] for a malformed selector.
pub fn find_first(
    tree: &DomTree,
    context: Option<NodeId>,
    selector: &str,
) -> Result<Option<NodeId>, SelectorError> {
    Ok(find_all(tree, context, selector)?.into_iter().next())
}

/// Split a selector list on top-level commas (commas inside `[...]` or
/// `(...)` belong to a clause).
fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

/// Query capabilities shared by element nodes and the document.
pub trait Queryable {
    /// All matches of a single selector (no comma lists) within this scope.
    ///
    /// # Errors
    ///
    /// A [`SelectorError`] for a malformed selector.
    fn get_elements(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError>;

    /// The first match of a single selector within this scope.
    ///
    /// # Errors
    ///
    /// A [`SelectorError`] for a malformed selector.
    fn get_element(&self, selector: &str) -> Result<Option<NodeId>, SelectorError>;

    /// All matches of a selector list (comma-aware) within this scope.
    ///
    /// # Errors
    ///
    /// A [`SelectorError`] for a malformed selector.
    fn get_elements_by_selector(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError>;
}

/// A node handle carrying its tree, scoping queries to the node's subtree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The tree the node belongs to.
    pub tree: &'a DomTree,
    /// The node.
    pub id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Create a handle for `id` in `tree`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, id: NodeId) -> Self {
        Self { tree, id }
    }
}

impl Queryable for NodeRef<'_> {
    fn get_elements(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let compiled = compile(selector)?;
        engine::global().matches(self.tree, self.id, &compiled)
    }

    fn get_element(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.get_elements(selector)?.into_iter().next())
    }

    fn get_elements_by_selector(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        find_all(self.tree, Some(self.id), selector)
    }
}

impl Queryable for DomTree {
    fn get_elements(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        NodeRef::new(self, self.root()).get_elements(selector)
    }

    fn get_element(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        NodeRef::new(self, self.root()).get_element(selector)
    }

    fn get_elements_by_selector(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        NodeRef::new(self, self.root()).get_elements_by_selector(selector)
    }
}
