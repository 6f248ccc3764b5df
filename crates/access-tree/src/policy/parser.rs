//! Human-readable policy language
//!
//! ```text
//! expr  := and ("or" and)*
//! and   := atom ("and" atom)*
//! atom  := IDENT
//!        | "(" expr ")"
//!        | "not" atom
//!        | INT "of" "(" expr ("," expr)* ")"
//! ```
//!
//! Keywords are case-insensitive. Identifiers start with a letter or `_` and
//! continue with letters, digits and `_ : . -`.
//!
//! ```
//! use access_tree::Policy;
//!
//! let policy: Policy<String> = "(admin or auditor) and 2 of (eu, us, apac)".parse().unwrap();
//! assert_eq!(policy.to_string(), "(admin or auditor) and 2 of (eu, us, apac)");
//! ```

use std::str::FromStr;

use super::{BooleanOp, Policy};
use crate::error::{Error, Result};

/// Deepest nesting of parentheses, `not` and thresholds accepted
pub const MAX_NESTING: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(usize),
    LParen,
    RParen,
    Comma,
    And,
    Or,
    Not,
    Of,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')
}

/// Tokens with their byte offset in the input
fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let single = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            chars.next();
            tokens.push((pos, token));
            continue;
        }

        if c.is_ascii_digit() {
            let mut end = pos;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + d.len_utf8();
                chars.next();
            }
            if let Some(&(i, next)) = chars.peek() {
                if is_ident_continue(next) {
                    return Err(Error::parse(i, "identifiers cannot start with a digit"));
                }
            }
            let value = input[pos..end]
                .parse::<usize>()
                .map_err(|_| Error::parse(pos, "threshold out of range"))?;
            tokens.push((pos, Token::Int(value)));
            continue;
        }

        if is_ident_start(c) {
            let mut end = pos;
            while let Some(&(i, d)) = chars.peek() {
                if !is_ident_continue(d) {
                    break;
                }
                end = i + d.len_utf8();
                chars.next();
            }
            let word = &input[pos..end];
            let token = match word.to_ascii_lowercase().as_str() {
                "and" => Token::And,
                "or" => Token::Or,
                "not" => Token::Not,
                "of" => Token::Of,
                _ => Token::Ident(word.to_string()),
            };
            tokens.push((pos, token));
            continue;
        }

        return Err(Error::parse(pos, format!("unexpected character '{}'", c)));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.end, |(pos, _)| *pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).map(|(_, t)| t.clone());
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        let position = self.position();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            _ => Err(Error::parse(position, format!("expected {}", what))),
        }
    }

    fn expr(&mut self) -> Result<Policy<String>> {
        let mut children = vec![self.conjunction()?];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            children.push(self.conjunction()?);
        }
        Ok(flatten(BooleanOp::Or, children))
    }

    fn conjunction(&mut self) -> Result<Policy<String>> {
        let mut children = vec![self.atom()?];
        while self.peek() == Some(&Token::And) {
            self.advance();
            children.push(self.atom()?);
        }
        Ok(flatten(BooleanOp::And, children))
    }

    fn atom(&mut self) -> Result<Policy<String>> {
        if self.depth == MAX_NESTING {
            return Err(Error::parse(self.position(), "policy nested too deeply"));
        }
        self.depth += 1;
        let atom = self.atom_inner();
        self.depth -= 1;
        atom
    }

    fn atom_inner(&mut self) -> Result<Policy<String>> {
        let position = self.position();
        match self.advance() {
            Some(Token::Ident(name)) => Ok(Policy::Fact(name)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Not) => Ok(Policy::Not(Box::new(self.atom()?))),
            Some(Token::Int(threshold)) => {
                self.expect(Token::Of, "'of'")?;
                self.expect(Token::LParen, "'('")?;
                let mut children = vec![self.expr()?];
                while self.peek() == Some(&Token::Comma) {
                    self.advance();
                    children.push(self.expr()?);
                }
                self.expect(Token::RParen, "')'")?;
                Ok(Policy::Threshold {
                    threshold,
                    children,
                })
            }
            Some(_) => Err(Error::parse(position, "expected a fact, '(', 'not' or a threshold")),
            None => Err(Error::parse(position, "unexpected end of policy")),
        }
    }
}

fn flatten(op: BooleanOp, mut children: Vec<Policy<String>>) -> Policy<String> {
    if children.len() == 1 {
        return children.remove(0);
    }
    Policy::Boolean { op, children }
}

impl FromStr for Policy<String> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser {
            tokens: tokenize(s)?,
            cursor: 0,
            end: s.len(),
            depth: 0,
        };
        let policy = parser.expr()?;
        if parser.peek().is_some() {
            return Err(Error::parse(parser.position(), "trailing input"));
        }
        Ok(policy)
    }
}
