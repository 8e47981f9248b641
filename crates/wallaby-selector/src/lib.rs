//! CSS-style selector engine for wallaby trees.
//!
//! A selector string is compiled into an ordered sequence of
//! `(combinator, simple selector)` steps and matched against a
//! [`wallaby_dom::DomTree`] by one of two interchangeable backends:
//!
//! - **declarative** — the compiled selector is folded into a single
//!   tree-query path and evaluated in one pass by `wallaby-treequery`
//!   (requires the default `treequery` feature);
//! - **imperative** — the tree is walked directly, narrowing a candidate
//!   node set one step at a time.
//!
//! Both return identical ordered, deduplicated match sets; the backend is a
//! process-wide choice made once (see [`engine`]).
//!
//! # Example
//!
//! ```
//! use wallaby_dom::{DomTree, ElementData, NodeType};
//! use wallaby_selector::find_all;
//!
//! let mut tree = DomTree::new();
//! let ul = tree.alloc(NodeType::Element(ElementData::new("ul".into(), Default::default())));
//! tree.append_child(tree.root(), ul);
//! for _ in 0..3 {
//!     let li = tree.alloc(NodeType::Element(ElementData::new("li".into(), Default::default())));
//!     tree.append_child(ul, li);
//! }
//!
//! let items = find_all(&tree, None, "ul > li").unwrap();
//! assert_eq!(items.len(), 3);
//! let odd = find_all(&tree, None, "li:odd").unwrap();
//! assert_eq!(odd.len(), 2);
//! ```
//!
//! Supported syntax: tag, `#id`, `.class`, `[attr]` with `=`, `!=`, `*=`,
//! `^=`, `$=`, `~=` operators, `:pseudo` classes (`nth`, `first`, `last`,
//! `empty`, `only`, `contains`, `enabled`, `odd`/`even`, and
//! attribute-style names), and the four combinators ` `, `>`, `+`, `~`.
//! Selector lists (`a, b`) are unioned by [`find_all`].

pub mod backend;
pub mod engine;
mod error;
pub mod grammar;
mod parser;
pub mod pseudo;
mod query;

pub use backend::MatchStrategy;
pub use engine::Engine;
pub use error::SelectorError;
pub use grammar::{AttrOperator, AttributeClause};
pub use parser::{Combinator, CompiledSelector, SelectorStep, SimpleSelector, compile};
pub use pseudo::{NthExpr, PseudoClause, PseudoParam};
pub use query::{NodeRef, Queryable, find_all, find_first};
