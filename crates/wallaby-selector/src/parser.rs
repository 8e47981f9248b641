//! Selector parsing: combinator splitting and simple-selector decomposition.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A selector string is split at combinator boundaries into fragments, and
//! each fragment is decomposed against the fixed simple-selector grammar
//! `tag? (#id)? (.class)? ([attribute])? (:pseudo)?`. The result is a
//! [`CompiledSelector`]: an ordered sequence of steps, each carrying the
//! combinator that precedes it. Compiled selectors are transient — rebuilt
//! per call, never cached here.

use strum_macros::Display;

use crate::error::SelectorError;
use crate::grammar::{is_name_char, is_word_char, split_fragments};

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// Whitespace: `A B` — B is an arbitrary descendant of A.
    #[strum(serialize = " ")]
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// `A > B` — B is a direct child of A.
    #[strum(serialize = ">")]
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// `A + B` — B is the nearest following sibling of A matching B's tag.
    #[strum(serialize = "+")]
    AdjacentSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// `A ~ B` — B is any following sibling of A.
    #[strum(serialize = "~")]
    GeneralSibling,
}

impl Combinator {
    /// Map a boundary character to its combinator.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Self::Descendant),
            '>' => Some(Self::Child),
            '+' => Some(Self::AdjacentSibling),
            '~' => Some(Self::GeneralSibling),
            _ => None,
        }
    }
}

/// One non-combinator selector fragment.
///
/// At least `tag` is always present (defaulted to `*`); the attribute and
/// pseudo parts are kept raw and parsed by the evaluation backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    /// Tag name, or `*` for any element.
    pub tag: String,
    /// `#id` part.
    pub id: Option<String>,
    /// `.class` part.
    pub class_name: Option<String>,
    /// Raw `[...]` clause, brackets stripped.
    pub attribute: Option<String>,
    /// Raw `:...` fragment, colon stripped.
    pub pseudo: Option<String>,
}

/// One step of a compiled selector: the combinator linking it to the
/// preceding step (`None` for the first), plus the simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    /// Relationship to the previous step; `None` means "search from
    /// context".
    pub combinator: Option<Combinator>,
    /// The fragment's decomposition.
    pub simple: SimpleSelector,
}

/// An ordered, immutable sequence of selector steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelector {
    /// The steps, left to right.
    pub steps: Vec<SelectorStep>,
}

impl CompiledSelector {
    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the selector has no steps (never produced by [`compile`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Compile a selector string (a single selector — comma-separated lists are
/// split by the entry points one level up).
///
/// # Errors
///
/// [`SelectorError::BadSelector`] when a fragment fails the decomposition
/// grammar. Attribute and pseudo clauses are kept raw here; their grammars
/// are enforced by the backends before any tree access.
pub fn compile(selector: &str) -> Result<CompiledSelector, SelectorError> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::BadSelector(selector.to_string()));
    }

    let mut steps = Vec::new();
    for (boundary, fragment) in split_fragments(trimmed) {
        let combinator = boundary.and_then(Combinator::from_char);
        let simple = decompose(&fragment)?;
        steps.push(SelectorStep { combinator, simple });
    }
    Ok(CompiledSelector { steps })
}

/// Decompose one fragment against the simple-selector grammar.
fn decompose(fragment: &str) -> Result<SimpleSelector, SelectorError> {
    let bad = || SelectorError::BadSelector(fragment.to_string());
    if fragment.is_empty() {
        return Err(bad());
    }

    let mut rest = fragment;

    let tag = if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped;
        "*".to_string()
    } else {
        let end = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
        let tag = &rest[..end];
        rest = &rest[end..];
        if tag.is_empty() { "*" } else { tag }.to_string()
    };

    let id = scan_name_part(&mut rest, '#');
    let class_name = scan_name_part(&mut rest, '.');
    if rest.starts_with(['#', '.']) {
        // Wrong part order (e.g. `.cls#id`) is outside the grammar.
        return Err(bad());
    }

    let attribute = if let Some(inner) = rest.strip_prefix('[') {
        // The clause runs to the last ']' of the fragment (the raw text may
        // itself contain '=' and the like; nested clauses are rejected by
        // the attribute grammar downstream).
        let close = inner.rfind(']').ok_or_else(bad)?;
        let raw = inner[..close].to_string();
        rest = &inner[close + 1..];
        Some(raw)
    } else {
        None
    };

    let pseudo = rest.strip_prefix(':').map(str::to_string);
    if pseudo.is_none() && !rest.is_empty() {
        return Err(bad());
    }

    Ok(SimpleSelector {
        tag,
        id,
        class_name,
        attribute,
        pseudo,
    })
}

/// Scan an optional `<marker>name` part (id or class) off `rest`.
fn scan_name_part(rest: &mut &str, marker: char) -> Option<String> {
    let after = rest.strip_prefix(marker)?;
    let end = after.find(|c| !is_name_char(c)).unwrap_or(after.len());
    if end == 0 {
        return None;
    }
    let name = after[..end].to_string();
    *rest = &after[end..];
    Some(name)
}
