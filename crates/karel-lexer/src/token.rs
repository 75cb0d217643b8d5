//! Token types for the Karel lexer.

use karel_types::Span;
use std::fmt;

/// Reserved words. Built-in action and predicate names are ordinary
/// identifiers and are resolved by the compiler.
pub const KEYWORDS: &[&str] = &["function", "if", "else", "while", "do", "repeat"];

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // ── Literals & names ──
    /// Non-negative integer literal: `5`
    Integer(u64),
    /// `move`, `turnRight`, `climbStairs`
    Identifier(String),

    // ── Keywords ──
    Function,
    If,
    Else,
    While,
    Do,
    Repeat,

    // ── Operators ──
    /// `!`
    Bang,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,

    // ── Punctuation ──
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,

    Eof,
}

impl TokenKind {
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "repeat" => TokenKind::Repeat,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Repeat
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Function => f.write_str("function"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::While => f.write_str("while"),
            TokenKind::Do => f.write_str("do"),
            TokenKind::Repeat => f.write_str("repeat"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::AndAnd => f.write_str("&&"),
            TokenKind::OrOr => f.write_str("||"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_is_recognised() {
        for &kw in KEYWORDS {
            let kind = TokenKind::from_keyword(kw).expect(kw);
            assert!(kind.is_keyword());
            assert_eq!(kind.to_string(), kw);
        }
    }

    #[test]
    fn builtins_are_not_keywords() {
        for name in ["move", "turnLeft", "frontIsClear", "main"] {
            assert_eq!(TokenKind::from_keyword(name), None);
        }
    }
}
