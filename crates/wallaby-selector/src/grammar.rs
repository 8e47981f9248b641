//! The selector grammar: fixed decomposition rules for simple selectors,
//! attribute clauses, pseudo fragments, and combinator boundaries.
//!
//! Each rule is a small scanner with the exact acceptance behavior of the
//! classic selector grammar: a simple selector is
//! `tag? (#id)? (.class)? ([attribute])? (:pseudo)?` in that fixed order,
//! an attribute clause is `key (operator value)?`, and a pseudo fragment is
//! `name (argument)?`.

use strum_macros::Display;

use crate::error::SelectorError;

/// Is `c` a word character (tag names, attribute keys)?
pub(crate) const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Is `c` a name character (ids, classes, pseudo names)? Words plus `-`.
pub(crate) const fn is_name_char(c: char) -> bool {
    is_word_char(c) || c == '-'
}

/// Attribute comparison operators.
///
/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AttrOperator {
    /// `[attr=value]` — value is exactly `value`.
    #[strum(serialize = "=")]
    Equals,
    /// `[attr!=value]` — attribute absent, or value not equal.
    #[strum(serialize = "!=")]
    NotEquals,
    /// `[attr*=value]` — value contains the substring.
    #[strum(serialize = "*=")]
    Contains,
    /// `[attr^=value]` — value begins with the prefix.
    #[strum(serialize = "^=")]
    Prefix,
    /// `[attr$=value]` — value ends with the suffix.
    #[strum(serialize = "$=")]
    Suffix,
    /// `[attr~=value]` — value contains it as a space-delimited token.
    #[strum(serialize = "~=")]
    Includes,
}

/// A parsed attribute clause.
///
/// `operator` and `value` are present together; their absence means a bare
/// "has attribute" test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeClause {
    /// Attribute name.
    pub key: String,
    /// Comparison operator, if any.
    pub operator: Option<AttrOperator>,
    /// Comparison value, if any.
    pub value: Option<String>,
}

/// Parse the raw text between `[` and `]`.
///
/// Grammar: `key ( op ["']? value ["']? )?` where `op` is one of
/// `=`, `!=`, `*=`, `^=`, `$=`, `~=`. An operator with an empty value
/// degrades to a bare existence test (a quirk preserved from the source
/// grammar, where `[href=]` tests for presence of `href`).
///
/// # Errors
///
/// [`SelectorError::BadAttributeSelector`] when the clause does not follow
/// the grammar.
pub fn parse_attribute_clause(raw: &str) -> Result<AttributeClause, SelectorError> {
    let bad = || SelectorError::BadAttributeSelector(raw.to_string());

    let key_end = raw.find(|c| !is_word_char(c)).unwrap_or(raw.len());
    if key_end == 0 {
        return Err(bad());
    }
    let key = raw[..key_end].to_string();
    let mut rest = &raw[key_end..];

    if rest.is_empty() {
        return Ok(AttributeClause {
            key,
            operator: None,
            value: None,
        });
    }

    let operator = if let Some(stripped) = rest.strip_prefix('=') {
        rest = stripped;
        AttrOperator::Equals
    } else {
        let op = match rest.chars().next() {
            Some('!') => AttrOperator::NotEquals,
            Some('*') => AttrOperator::Contains,
            Some('^') => AttrOperator::Prefix,
            Some('$') => AttrOperator::Suffix,
            Some('~') => AttrOperator::Includes,
            _ => return Err(bad()),
        };
        rest = rest.get(1..).ok_or_else(bad)?;
        rest = rest.strip_prefix('=').ok_or_else(bad)?;
        op
    };

    // Optional single/double quotes around the value; the value itself may
    // not contain quotes or ']'.
    if let Some(stripped) = rest.strip_prefix(['"', '\'']) {
        rest = stripped;
    }
    let value_end = rest
        .find(|c| c == '"' || c == '\'' || c == ']')
        .unwrap_or(rest.len());
    let value = rest[..value_end].to_string();
    rest = &rest[value_end..];
    if let Some(stripped) = rest.strip_prefix(['"', '\'']) {
        rest = stripped;
    }
    if !rest.is_empty() {
        return Err(bad());
    }

    if value.is_empty() {
        // `[key=]` and `[key=""]` degrade to existence.
        return Ok(AttributeClause {
            key,
            operator: None,
            value: None,
        });
    }

    Ok(AttributeClause {
        key,
        operator: Some(operator),
        value: Some(value),
    })
}

/// Split a pseudo fragment into its name and optional raw argument.
///
/// Grammar: `name ( "(" argument ")" )?` — the name is one or more name
/// characters; the argument is everything up to the final `)`, which must
/// close the fragment.
///
/// # Errors
///
/// [`SelectorError::BadPseudoSelector`] when the fragment does not follow
/// the grammar.
pub fn split_pseudo(raw: &str) -> Result<(&str, Option<&str>), SelectorError> {
    let bad = || SelectorError::BadPseudoSelector(raw.to_string());

    let name_end = raw.find(|c| !is_name_char(c)).unwrap_or(raw.len());
    if name_end == 0 {
        return Err(bad());
    }
    let name = &raw[..name_end];
    let rest = &raw[name_end..];

    if rest.is_empty() {
        return Ok((name, None));
    }
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(bad)?;
    Ok((name, Some(inner)))
}

/// Split a selector string into fragments at combinator boundaries.
///
/// A boundary is `>`, `+`, `~`, or bare whitespace; whitespace adjacent to
/// an explicit symbol collapses into the symbol. Separators inside
/// `[...]` or `(...)` never split. Returns `(combinator char, fragment)`
/// pairs; the first fragment has no combinator.
///
/// The input is expected to be trimmed; a leading or trailing combinator
/// produces an empty fragment, rejected downstream by decomposition.
pub(crate) fn split_fragments(selector: &str) -> Vec<(Option<char>, String)> {
    let mut fragments: Vec<(Option<char>, String)> = Vec::new();
    let mut current = String::new();
    let mut separator: Option<char> = None;
    let mut depth = 0u32;

    let mut chars = selector.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '>' | '+' | '~' if depth == 0 => {
                fragments.push((separator, std::mem::take(&mut current)));
                separator = Some(c);
                while chars.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
            }
            c if c.is_ascii_whitespace() && depth == 0 => {
                while chars.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                // Whitespace before an explicit symbol is not a descendant
                // boundary; the symbol itself is handled next iteration.
                match chars.peek() {
                    Some('>' | '+' | '~') | None => {}
                    Some(_) => {
                        fragments.push((separator, std::mem::take(&mut current)));
                        separator = Some(' ');
                    }
                }
            }
            _ => current.push(c),
        }
    }
    fragments.push((separator, current));
    fragments
}
