//! Path expression tokens.
//!
//! The dialect is a subset of [XPath 1.0](https://www.w3.org/TR/xpath-10/):
//! location steps along three axes, bracketed predicates, and a small
//! expression language (string and node-set functions, `=`/`!=`, `+`/`-`,
//! `mod`, `or`/`and`).

use crate::QueryError;

/// A single lexical token of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `/` — child step separator.
    Slash,
    /// `//` — descendant step separator.
    /// [§ 2.5 Abbreviated Syntax](https://www.w3.org/TR/xpath-10/#path-abbrev)
    /// "`//` is short for `/descendant-or-self::node()/`"
    DoubleSlash,
    /// `::` — axis specifier separator.
    AxisSep,
    /// `.` — the context node.
    Dot,
    /// `*` — any element name.
    Star,
    /// A name: tag, axis, or function identifier (letters, digits, `-`, `_`).
    Ident(String),
    /// `@` — attribute access.
    At,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// An unsigned integer literal.
    Number(i64),
    /// A quoted string literal (either quote style).
    Literal(String),
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
}

/// Is `c` part of a name token?
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Tokenize a path expression string.
///
/// # Errors
///
/// Returns [`QueryError::Syntax`] on an unterminated string literal or a
/// character with no meaning in the dialect.
pub fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_ascii_whitespace() => pos += 1,
            '/' => {
                if chars.get(pos + 1) == Some(&'/') {
                    tokens.push(Token::DoubleSlash);
                    pos += 2;
                } else {
                    tokens.push(Token::Slash);
                    pos += 1;
                }
            }
            ':' => {
                if chars.get(pos + 1) == Some(&':') {
                    tokens.push(Token::AxisSep);
                    pos += 2;
                } else {
                    return Err(QueryError::Syntax {
                        pos,
                        message: "expected '::'".to_string(),
                    });
                }
            }
            '!' => {
                if chars.get(pos + 1) == Some(&'=') {
                    tokens.push(Token::NotEq);
                    pos += 2;
                } else {
                    return Err(QueryError::Syntax {
                        pos,
                        message: "expected '!='".to_string(),
                    });
                }
            }
            '.' => {
                tokens.push(Token::Dot);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '@' => {
                tokens.push(Token::At);
                pos += 1;
            }
            '[' => {
                tokens.push(Token::LBracket);
                pos += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                pos += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            q @ ('"' | '\'') => {
                let start = pos;
                pos += 1;
                let mut value = String::new();
                loop {
                    match chars.get(pos) {
                        Some(&ch) if ch == q => {
                            pos += 1;
                            break;
                        }
                        Some(&ch) => {
                            value.push(ch);
                            pos += 1;
                        }
                        None => {
                            return Err(QueryError::Syntax {
                                pos: start,
                                message: "unterminated string literal".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Token::Literal(value));
            }
            c if c.is_ascii_digit() => {
                let mut value: i64 = 0;
                while let Some(d) = chars.get(pos).and_then(|ch| ch.to_digit(10)) {
                    value = value * 10 + i64::from(d);
                    pos += 1;
                }
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while chars.get(pos).is_some_and(|&ch| is_name_char(ch)) {
                    name.push(chars[pos]);
                    pos += 1;
                }
                tokens.push(Token::Ident(name));
            }
            other => {
                return Err(QueryError::Syntax {
                    pos,
                    message: format!("unexpected character '{other}'"),
                });
            }
        }
    }

    Ok(tokens)
}
