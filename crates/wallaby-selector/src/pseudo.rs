//! Pseudo-class parsing.
//!
//! A raw pseudo fragment (the text after `:`) is normalized into a
//! [`PseudoClause`]: a dispatch name plus a parameter. Only the first
//! `-`-delimited segment of the name dispatches, so `nth-child`, `nth-of-type`
//! and plain `nth` all resolve to `nth`, and `first-child` to `first`.

use std::num::ParseIntError;

use crate::error::SelectorError;
use crate::grammar::split_pseudo;

/// An algebraic `an+b` position test over the 0-based count of preceding
/// element siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthExpr {
    /// Match exactly the given count (`:nth(3)`).
    Exact(i64),
    /// Match when `count mod step == offset` (`:nth(2n+1)`).
    Step {
        /// The multiple `a` in `an+b`.
        step: i64,
        /// The remainder `b` in `an+b`.
        offset: i64,
    },
}

/// A normalized pseudo-class parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoParam {
    /// No parameter (`:first`, `:enabled`).
    None,
    /// A literal argument string (`:contains(Hello)`).
    Literal(String),
    /// A resolved nth expression (`:nth(2n+1)`, `:odd`).
    Nth(NthExpr),
}

/// A normalized `(name, parameter)` pseudo-class pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoClause {
    /// Dispatch name (first `-`-segment of the written name).
    pub name: String,
    /// Normalized parameter.
    pub param: PseudoParam,
}

/// Parse a raw pseudo fragment into a [`PseudoClause`].
///
/// Policy table:
///
/// - `nth` without an argument means "every node" (`Step { 1, 0 }`);
///   otherwise the argument is parsed against the nth grammar. The words
///   `odd`/`even` inside an argument resolve to `Step { 2, 0 }` /
///   `Step { 2, 1 }`.
/// - Top-level `odd`/`even` names are pure aliases for those same `nth`
///   forms.
/// - `contains` keeps its literal argument.
/// - Every other name keeps its argument as a literal, or no parameter.
///
/// # Errors
///
/// [`SelectorError::BadPseudoSelector`] when the fragment fails the
/// name/argument grammar, [`SelectorError::BadNthParameter`] when an nth
/// argument fails the algebraic grammar.
pub fn parse_pseudo(raw: &str) -> Result<PseudoClause, SelectorError> {
    let (written_name, arg) = split_pseudo(raw)?;
    let mut name = written_name
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string();

    let param = match name.as_str() {
        "nth" => match arg {
            None | Some("") => PseudoParam::Nth(NthExpr::Step { step: 1, offset: 0 }),
            Some(arg) => PseudoParam::Nth(parse_nth_argument(arg)?),
        },
        "odd" => {
            name = "nth".to_string();
            PseudoParam::Nth(NthExpr::Step { step: 2, offset: 0 })
        }
        "even" => {
            name = "nth".to_string();
            PseudoParam::Nth(NthExpr::Step { step: 2, offset: 1 })
        }
        "contains" => match arg {
            Some(arg) => PseudoParam::Literal(arg.to_string()),
            None => PseudoParam::None,
        },
        _ => match arg {
            Some(arg) if !arg.is_empty() => PseudoParam::Literal(arg.to_string()),
            _ => PseudoParam::None,
        },
    };

    Ok(PseudoClause { name, param })
}

/// Parse an nth argument: `[+]digits? [n|odd|even]? [+]digits?`.
///
/// Both numbers are optional (`a` defaults to 1, `b` to 0); without the
/// algebraic word the expression matches exactly `a`.
///
/// # Errors
///
/// [`SelectorError::BadNthParameter`] on leftover input or an unknown word.
pub fn parse_nth_argument(arg: &str) -> Result<NthExpr, SelectorError> {
    let bad = || SelectorError::BadNthParameter(arg.to_string());

    let mut rest = arg.trim();
    let a = scan_number(&mut rest).map_err(|_| bad())?;
    let word_end = rest.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(rest.len());
    let word = &rest[..word_end];
    rest = &rest[word_end..];
    let b = scan_number(&mut rest).map_err(|_| bad())?;
    if !rest.is_empty() {
        return Err(bad());
    }

    let a = a.unwrap_or(1);
    match word {
        "n" => Ok(NthExpr::Step {
            step: a,
            offset: b.unwrap_or(0),
        }),
        "odd" => Ok(NthExpr::Step { step: 2, offset: 0 }),
        "even" => Ok(NthExpr::Step { step: 2, offset: 1 }),
        "" => Ok(NthExpr::Exact(a)),
        _ => Err(bad()),
    }
}

/// Scan an optional `[+]digits` prefix off `rest`. Digits that overflow the
/// number type are an error, not an absent number.
fn scan_number(rest: &mut &str) -> Result<Option<i64>, ParseIntError> {
    let unsigned = rest.strip_prefix('+').unwrap_or(rest);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_end == 0 {
        return Ok(None);
    }
    let value = unsigned[..digits_end].parse()?;
    *rest = &unsigned[digits_end..];
    Ok(Some(value))
}
