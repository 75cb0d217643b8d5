//! Karel lexer: converts source text to a token stream.
//!
//! - `//` line comments and `/* */` block comments are skipped
//! - Whitespace, including newlines, is insignificant
//! - Error recovery: bad characters are reported and skipped, so one typo
//!   does not hide the rest of the diagnostics

use karel_types::{CompileError, CompileErrors, ErrorCode, SourceFile, Span};

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    text: &'src str,
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    line: u32,
    col: u32,
    errors: CompileErrors,
}

/// Tokens (always ending in [`TokenKind::Eof`]) plus lexical errors.
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            text: &source_file.source,
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            if self.errors.is_full() {
                break;
            }
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// Consume one character (not byte) and return its first byte.
    fn advance(&mut self) -> Option<u8> {
        let ch = self.text[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(self.source[self.pos - ch.len_utf8()])
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(start_line, start_col, self.line, self.col.saturating_sub(1).max(1))
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = CompileError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = CompileError::new(&self.source_file.name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Trivia
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and comments. Unterminated block comments are
    /// reported once and run to end of file.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b' ' | b'\t' | b'\r' | b'\n'), _) => {
                    self.advance();
                }
                (Some(b'/'), Some(b'/')) => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.advance();
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let (start_line, start_col) = (self.line, self.col);
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (None, _) => {
                                let span = Span::point(start_line, start_col);
                                self.emit_error_with_suggestion(
                                    ErrorCode::UNTERMINATED_COMMENT,
                                    "block comment is never closed",
                                    span,
                                    "close the comment with */",
                                );
                                return;
                            }
                            (Some(b'*'), Some(b'/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let (start_line, start_col) = (self.line, self.col);
            let start_pos = self.pos;
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, self.current_span());
            };

            let kind = match ch {
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b';' => TokenKind::Semicolon,
                b',' => TokenKind::Comma,
                b'!' => TokenKind::Bang,
                b'&' | b'|' if self.peek() == Some(ch) => {
                    self.advance();
                    if ch == b'&' {
                        TokenKind::AndAnd
                    } else {
                        TokenKind::OrOr
                    }
                }
                b'&' | b'|' => {
                    let op = if ch == b'&' { "&&" } else { "||" };
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{}'", ch as char),
                        span,
                        format!("use '{op}' to combine conditions"),
                    );
                    continue;
                }
                b'0'..=b'9' => return self.scan_integer(start_pos, start_line, start_col),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    return self.scan_identifier(start_pos, start_line, start_col)
                }
                _ => {
                    let span = self.span_from(start_line, start_col);
                    let shown = &self.text[start_pos..self.pos];
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{shown}'"),
                        span,
                    );
                    if self.errors.is_full() {
                        return Token::new(TokenKind::Eof, self.current_span());
                    }
                    continue;
                }
            };
            return Token::new(kind, self.span_from(start_line, start_col));
        }
    }

    fn scan_integer(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        let span = self.span_from(start_line, start_col);
        let text = &self.text[start_pos..self.pos];
        let value = match text.parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                self.emit_error(
                    ErrorCode::INVALID_REPEAT_COUNT,
                    format!("number '{text}' is too large"),
                    span,
                );
                u64::MAX
            }
        };
        Token::new(TokenKind::Integer(value), span)
    }

    fn scan_identifier(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let span = self.span_from(start_line, start_col);
        let text = &self.text[start_pos..self.pos];
        let kind =
            TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        Token::new(kind, span)
    }
}
