//! Selector compilation errors.

use thiserror::Error;

/// Errors raised while compiling a selector string.
///
/// All are raised synchronously before any tree access; a selector that
/// matches nothing is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A fragment fails the tag/id/class/attribute/pseudo decomposition
    /// grammar.
    #[error("bad selector: '{0}'")]
    BadSelector(String),

    /// An attribute clause fails the key/operator/value grammar.
    #[error("bad attribute selector: '{0}'")]
    BadAttributeSelector(String),

    /// A pseudo-class fragment fails the name/argument grammar.
    #[error("bad pseudo selector: '{0}'")]
    BadPseudoSelector(String),

    /// An `nth`-family pseudo-class has a malformed algebraic argument.
    #[error("bad nth pseudo selector parameter: '{0}'")]
    BadNthParameter(String),
}
