//! Path expression parsing.
//!
//! A path is an optional leading `.` (the context node) followed by location
//! steps, per the abbreviated syntax of
//! [§ 2.5 XPath 1.0](https://www.w3.org/TR/xpath-10/#path-abbrev):
//!
//! ```text
//! .//div/li[3]/following-sibling::p[contains(text(), "x")]
//! ```
//!
//! Each step is an axis, a node test (tag name or `*`), and zero or more
//! bracketed predicates.

use crate::QueryError;
use crate::token::{Token, tokenize};

/// The traversal axis of one location step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `//name` — all descendants.
    Descendant,
    /// `/name` — direct children.
    Child,
    /// `/following-sibling::name` — following siblings.
    FollowingSibling,
}

/// Sibling axes usable inside predicate expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingAxis {
    /// `preceding-sibling::*`
    Preceding,
    /// `following-sibling::*`
    Following,
}

/// Built-in functions of the expression language.
///
/// [§ 4 Core Function Library](https://www.w3.org/TR/xpath-10/#corelib)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// `count(node-set)` — number of nodes.
    Count,
    /// `last()` — context size.
    Last,
    /// `position()` — context position.
    Position,
    /// `not(boolean)`
    Not,
    /// `contains(string, string)`
    Contains,
    /// `starts-with(string, string)`
    StartsWith,
    /// `concat(string, string, ...)`
    Concat,
    /// `substring(string, start[, length])` — `start` is 1-based.
    Substring,
    /// `string-length(string)`
    StringLength,
    /// `text()` — the context node's text content (dialect deviation from
    /// XPath's text-node set; see crate docs).
    Text,
    /// `node()` — all child nodes of the context node.
    Node,
}

/// Binary operators, loosest-binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `mod`
    Mod,
}

/// A predicate expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Number(i64),
    /// String literal.
    Literal(String),
    /// `@name` — attribute of the context node.
    Attr(String),
    /// A sibling axis node-set.
    Siblings(SiblingAxis),
    /// Function call.
    Call(Func, Vec<Expr>),
    /// Binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// One location step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Traversal axis.
    pub axis: Axis,
    /// Node test: a tag name, or `*` for any element.
    pub tag: String,
    /// Predicates, applied in sequence.
    pub predicates: Vec<Expr>,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    /// The location steps, left to right.
    pub steps: Vec<Step>,
}

impl PathExpr {
    /// Parse a path expression string.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Syntax`] when the input does not follow the
    /// dialect grammar, or [`QueryError::UnknownFunction`] for a function
    /// name outside the core library.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let path = parser.parse_path()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.error("trailing input after path"));
        }
        Ok(path)
    }
}

/// Recursive-descent parser over the token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn error(&self, message: &str) -> QueryError {
        QueryError::Syntax {
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), QueryError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected {expected:?}")))
        }
    }

    fn parse_path(&mut self) -> Result<PathExpr, QueryError> {
        // Optional leading context dot, as in ".//div".
        if self.peek() == Some(&Token::Dot) {
            self.pos += 1;
        }

        let mut steps = Vec::new();
        while let Some(token) = self.peek() {
            let axis = match token {
                Token::DoubleSlash => {
                    self.pos += 1;
                    Axis::Descendant
                }
                Token::Slash => {
                    self.pos += 1;
                    self.parse_slash_axis()?
                }
                _ => return Err(self.error("expected step separator")),
            };
            let tag = self.parse_node_test()?;
            let mut predicates = Vec::new();
            while self.peek() == Some(&Token::LBracket) {
                self.pos += 1;
                let expr = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                predicates.push(expr);
            }
            steps.push(Step {
                axis,
                tag,
                predicates,
            });
        }

        if steps.is_empty() {
            return Err(self.error("empty path"));
        }
        Ok(PathExpr { steps })
    }

    /// After a single `/`: either a plain child step or an explicit
    /// `following-sibling::` axis.
    fn parse_slash_axis(&mut self) -> Result<Axis, QueryError> {
        if let Some(Token::Ident(name)) = self.peek()
            && name == "following-sibling"
            && self.tokens.get(self.pos + 1) == Some(&Token::AxisSep)
        {
            self.pos += 2;
            return Ok(Axis::FollowingSibling);
        }
        Ok(Axis::Child)
    }

    fn parse_node_test(&mut self) -> Result<String, QueryError> {
        match self.next() {
            Some(Token::Star) => Ok("*".to_string()),
            Some(Token::Ident(name)) => Ok(name),
            _ => Err(self.error("expected tag name or '*'")),
        }
    }

    // Expression grammar, loosest binding first:
    //   expr    := and ('or' and)*
    //   and     := cmp ('and' cmp)*
    //   cmp     := add (('=' | '!=') add)?
    //   add     := mul (('+' | '-') mul)*
    //   mul     := primary ('mod' primary)*
    fn parse_expr(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_and()?;
        while self.peek_keyword("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_cmp()?;
        while self.peek_keyword("and") {
            self.pos += 1;
            let right = self.parse_cmp()?;
            left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_cmp(&mut self) -> Result<Expr, QueryError> {
        let left = self.parse_add()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::NotEq,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_add()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn parse_add(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_mul()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_mul(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_primary()?;
        while self.peek_keyword("mod") {
            self.pos += 1;
            let right = self.parse_primary()?;
            left = Expr::Binary(BinOp::Mod, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// Is the next token the given keyword identifier?
    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(name)) if name == keyword)
    }

    fn parse_primary(&mut self) -> Result<Expr, QueryError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Literal(s)) => Ok(Expr::Literal(s)),
            Some(Token::At) => match self.next() {
                Some(Token::Ident(name)) => Ok(Expr::Attr(name)),
                _ => Err(self.error("expected attribute name after '@'")),
            },
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => self.parse_ident_primary(&name),
            _ => Err(self.error("expected expression")),
        }
    }

    /// An identifier primary: a sibling axis node-set or a function call.
    fn parse_ident_primary(&mut self, name: &str) -> Result<Expr, QueryError> {
        if self.peek() == Some(&Token::AxisSep) {
            let axis = match name {
                "preceding-sibling" => SiblingAxis::Preceding,
                "following-sibling" => SiblingAxis::Following,
                _ => return Err(self.error("unknown axis")),
            };
            self.pos += 1;
            self.expect(&Token::Star)?;
            return Ok(Expr::Siblings(axis));
        }

        let func = match name {
            "count" => Func::Count,
            "last" => Func::Last,
            "position" => Func::Position,
            "not" => Func::Not,
            "contains" => Func::Contains,
            "starts-with" => Func::StartsWith,
            "concat" => Func::Concat,
            "substring" => Func::Substring,
            "string-length" => Func::StringLength,
            "text" => Func::Text,
            "node" => Func::Node,
            other => return Err(QueryError::UnknownFunction(other.to_string())),
        };

        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            args.push(self.parse_expr()?);
            while self.peek() == Some(&Token::Comma) {
                self.pos += 1;
                args.push(self.parse_expr()?);
            }
        }
        self.expect(&Token::RParen)?;
        Ok(Expr::Call(func, args))
    }
}
