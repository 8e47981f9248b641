//! Backend selection.
//!
//! An [`Engine`] wraps the strategy every query in the process runs with.
//! It is chosen once — by capability ([`Engine::auto`]) or explicitly — and
//! installed process-wide; after initialization the global engine is
//! read-only and safe to share across threads.

use std::sync::OnceLock;

use wallaby_dom::{DomTree, NodeId};

use crate::backend::MatchStrategy;
use crate::backend::filter::FilterStrategy;
#[cfg(feature = "treequery")]
use crate::backend::xpath::XPathStrategy;
use crate::error::SelectorError;
use crate::parser::CompiledSelector;

/// A selector engine: the strategy all matching goes through.
pub struct Engine {
    strategy: Box<dyn MatchStrategy + Send + Sync>,
}

impl Engine {
    /// An engine over a custom strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn MatchStrategy + Send + Sync>) -> Self {
        Self { strategy }
    }

    /// The declarative (tree-query) engine.
    #[cfg(feature = "treequery")]
    #[must_use]
    pub fn declarative() -> Self {
        Self::new(Box::new(XPathStrategy))
    }

    /// The imperative (tree-walking) engine.
    #[must_use]
    pub fn imperative() -> Self {
        Self::new(Box::new(FilterStrategy))
    }

    /// The preferred engine for this build: declarative when the tree-query
    /// evaluator capability is compiled in, imperative otherwise.
    #[must_use]
    pub fn auto() -> Self {
        #[cfg(feature = "treequery")]
        {
            Self::declarative()
        }
        #[cfg(not(feature = "treequery"))]
        {
            Self::imperative()
        }
    }

    /// Match a compiled selector against the subtree rooted at `context`.
    ///
    /// # Errors
    ///
    /// A [`SelectorError`] for a malformed attribute or pseudo clause.
    pub fn matches(
        &self,
        tree: &DomTree,
        context: NodeId,
        selector: &CompiledSelector,
    ) -> Result<Vec<NodeId>, SelectorError> {
        self.strategy.matches(tree, context, selector)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

/// The process-wide engine, written at most once.
static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Install the process-wide engine. The first installation wins; a later
/// call returns the rejected engine.
///
/// # Errors
///
/// The passed engine, when one is already installed.
pub fn install(engine: Engine) -> Result<(), Engine> {
    ENGINE.set(engine)
}

/// The process-wide engine, initializing to [`Engine::auto`] when nothing
/// was installed.
pub fn global() -> &'static Engine {
    ENGINE.get_or_init(Engine::auto)
}
