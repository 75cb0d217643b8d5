//! Core parser infrastructure: token cursor, error reporting, helpers.

use karel_lexer::token::{Token, TokenKind};
use karel_types::ast::{Ident, SourceProgram};
use karel_types::{CompileError, CompileErrors, ErrorCode, SourceFile, Span};

/// Deepest allowed nesting of blocks and parenthesised conditions.
pub const MAX_NESTING: u32 = 64;

/// Most `&&`/`||` operators allowed in one `if`/`while` condition.
pub const MAX_CONDITION_OPERATORS: u32 = 64;

/// The Karel parser.
///
/// Builds a [`SourceProgram`] from the lexer's tokens, collecting errors
/// and resynchronising at statement boundaries.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source_file: &'src SourceFile,
    errors: CompileErrors,
    /// Current block/condition nesting.
    pub(crate) depth: u32,
    /// Set once the nesting limit is hit; the rest of the file is skipped.
    pub(crate) abandoned: bool,
    /// `&&`/`||` operators seen in the condition being parsed.
    pub(crate) operators: u32,
}

pub struct ParseResult {
    pub program: SourceProgram,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::point(1, 1));
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            depth: 0,
            abandoned: false,
            operators: 0,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, and the cursor never passes it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn previous_span(&self) -> Span {
        match self.pos {
            0 => Span::point(1, 1),
            n => self.tokens[n - 1].span,
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Jump to end of file. Used when continuing would only produce noise.
    pub(crate) fn skip_to_end(&mut self) {
        self.pos = self.tokens.len() - 1;
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            kind if kind.is_keyword() => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("'{kind}' is a reserved word and cannot be used as a name"),
                );
                None
            }
            kind => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a name, got '{kind}'"),
                );
                None
            }
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.push(self.make_error(code, message, span));
    }

    pub(crate) fn make_error(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> CompileError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        CompileError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn push(&mut self, error: CompileError) {
        self.errors.push_error(error);
    }

    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip to the next statement boundary after an error, stepping over
    /// any braced block the broken statement owns. Always consumes at
    /// least one token when nothing was consumed since `start`.
    pub(crate) fn synchronize(&mut self, start: usize) {
        if self.pos == start && !self.at_end() && !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::LBrace) {
                return self.skip_braced();
            }
            self.advance();
        }
        while !self.at_end() {
            match self.peek_kind() {
                TokenKind::LBrace => return self.skip_braced(),
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Repeat => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a `{ ... }` group, including nested groups.
    fn skip_braced(&mut self) {
        let mut depth = 0u32;
        while !self.at_end() {
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}
