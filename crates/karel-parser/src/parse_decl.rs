//! Top-level parsing: procedure definitions and entry statements.

use karel_lexer::token::TokenKind;
use karel_types::ast::*;
use karel_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a whole file: `{ function_def | statement }`.
    pub(crate) fn parse_program(&mut self) -> SourceProgram {
        let start = self.current_span();
        let mut program = SourceProgram::default();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.position();
            match self.peek_kind() {
                TokenKind::Function => {
                    if let Some(def) = self.parse_function_def() {
                        program.functions.push(def);
                    } else {
                        self.synchronize(before);
                    }
                }
                TokenKind::RBrace => {
                    self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "unmatched '}'");
                    self.advance();
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                _ => {
                    if let Some(stmt) = self.parse_statement() {
                        program.statements.push(stmt);
                    } else {
                        self.synchronize(before);
                    }
                }
            }
        }

        program.span = start.merge(self.previous_span());
        program
    }

    /// `function name(params) { body }`
    pub(crate) fn parse_function_def(&mut self) -> Option<FunctionDef> {
        let start = self.advance().span; // eat `function`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            params.push(self.expect_identifier()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(FunctionDef {
            name,
            params,
            body,
            span,
        })
    }
}
