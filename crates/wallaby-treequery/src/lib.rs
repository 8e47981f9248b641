//! XPath-style tree queries for the wallaby selector engine.
//!
//! This crate evaluates a path expression string against a context node of a
//! [`wallaby_dom::DomTree`] and returns an unordered [`Snapshot`] of the
//! matching nodes, in the spirit of `document.evaluate(...,
//! UNORDERED_NODE_SNAPSHOT_TYPE)`.
//!
//! The dialect is the subset of [XPath 1.0](https://www.w3.org/TR/xpath-10/)
//! needed for selector compilation: the abbreviated `//` and `/` steps, the
//! `following-sibling::` axis, and bracket predicates over a small expression
//! language (`count`, `last`, `position`, `not`, `contains`, `starts-with`,
//! `concat`, `substring`, `string-length`, `text`, `node`, `@attr`, sibling
//! axes, `or`/`and`, `=`/`!=`, `+`/`-`, `mod`).
//!
//! Two deliberate deviations from XPath 1.0, both in favor of agreement with
//! direct tree walking:
//!
//! - `text()` evaluates to the context node's entire text content rather
//!   than its set of child text nodes.
//! - Comparing an attribute with `!=` holds when the attribute is absent.
//!
//! # Example
//!
//! ```
//! use wallaby_dom::{DomTree, ElementData, NodeType};
//! use wallaby_treequery::evaluate;
//!
//! let mut tree = DomTree::new();
//! let ul = tree.alloc(NodeType::Element(ElementData::new("ul".into(), Default::default())));
//! tree.append_child(tree.root(), ul);
//! let li = tree.alloc(NodeType::Element(ElementData::new("li".into(), Default::default())));
//! tree.append_child(ul, li);
//!
//! let snapshot = evaluate(&tree, tree.root(), ".//ul/li").unwrap();
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot.item(0), Some(li));
//! ```

use thiserror::Error;
use wallaby_dom::{DomTree, NodeId};

mod eval;
mod path;
mod token;

use path::PathExpr;

/// Errors raised while parsing or evaluating a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The path string does not follow the dialect grammar.
    #[error("path syntax error at token {pos}: {message}")]
    Syntax {
        /// Token position where parsing failed.
        pos: usize,
        /// What the parser expected.
        message: String,
    },
    /// A function name outside the core library.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// A function or operator applied to an unsuitable value.
    #[error("bad argument: {0}")]
    BadArgument(String),
}

/// An unordered, deduplicated snapshot of matched nodes.
///
/// Indexable by position and countable, mirroring the DOM
/// `XPathResult` snapshot interface.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    items: Vec<NodeId>,
}

impl Snapshot {
    /// Number of nodes in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The node at `index`, if any.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    /// Iterate over the snapshot's nodes.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }
}

impl IntoIterator for Snapshot {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Evaluate a path expression against a context node.
///
/// # Errors
///
/// Returns a [`QueryError`] if the path fails to parse or applies a function
/// or operator to an unsuitable value. Matching nothing is not an error.
pub fn evaluate(tree: &DomTree, context: NodeId, path: &str) -> Result<Snapshot, QueryError> {
    let parsed = PathExpr::parse(path)?;
    let items = eval::evaluate_path(tree, context, &parsed)?;
    Ok(Snapshot { items })
}
