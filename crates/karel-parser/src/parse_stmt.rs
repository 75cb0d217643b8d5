//! Statement, block and condition parsing.

use karel_lexer::token::TokenKind;
use karel_types::ast::*;
use karel_types::ErrorCode;

use crate::parser::{Parser, MAX_CONDITION_OPERATORS, MAX_NESTING};

/// Largest accepted `repeat` count.
const MAX_REPEAT: u64 = 1_000_000;

impl<'src> Parser<'src> {
    /// Enter one nesting level; reports and abandons the parse past
    /// [`MAX_NESTING`].
    fn enter(&mut self) -> Option<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            self.error_at_current(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("code is nested more than {MAX_NESTING} levels deep"),
            );
            self.depth -= 1;
            self.abandoned = true;
            self.skip_to_end();
            return None;
        }
        Some(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Count one `&&`/`||`; reports and abandons the parse past
    /// [`MAX_CONDITION_OPERATORS`].
    fn note_operator(&mut self) -> Option<()> {
        self.operators += 1;
        if self.operators > MAX_CONDITION_OPERATORS {
            self.error_at(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("condition has more than {MAX_CONDITION_OPERATORS} '&&'/'||' operators"),
                self.previous_span(),
            );
            self.abandoned = true;
            self.skip_to_end();
            return None;
        }
        Some(())
    }

    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let open = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        self.enter()?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.position();
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            if self.check(&TokenKind::Function) {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "functions must be defined at the top level, not inside a block",
                );
                self.synchronize(before);
                continue;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(before),
            }
        }
        self.leave();
        if self.abandoned {
            return None;
        }
        if self.at_end() {
            let err = self
                .make_error(ErrorCode::UNCLOSED_BLOCK, "this '{' is never closed", open)
                .with_suggestion("add a matching '}'");
            self.push(err);
            return None;
        }
        self.advance(); // eat `}`
        Some(Block {
            stmts,
            span: open.merge(self.previous_span()),
        })
    }

    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::Identifier(_) => {
                let call = self.parse_call()?;
                self.eat(&TokenKind::Semicolon);
                Some(Stmt::Call(call))
            }
            TokenKind::Else => {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "'else' without a matching 'if'");
                None
            }
            other => {
                let message = format!("expected a statement, got '{other}'");
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                None
            }
        }
    }

    /// `name`, `name()` or `name(args)`.
    pub(crate) fn parse_call(&mut self) -> Option<CallStmt> {
        let name = self.expect_identifier()?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) && !self.at_end() {
                let arg = match self.peek_kind().clone() {
                    TokenKind::Integer(n) => Arg::Number(n, self.advance().span),
                    TokenKind::Identifier(_) => Arg::Name(self.expect_identifier()?),
                    other => {
                        let message = format!("expected ')' or an argument, got '{other}'");
                        self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                        return None;
                    }
                };
                args.push(arg);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
        }
        let span = name.span.merge(self.previous_span());
        Some(CallStmt { name, args, span })
    }

    /// `if (cond) { } [else { } | else if ...]`
    fn parse_if(&mut self) -> Option<IfStmt> {
        let start = self.advance().span; // eat `if`
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                self.enter()?;
                let nested = self.parse_if();
                self.leave();
                Some(ElseBranch::If(Box::new(nested?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };
        Some(IfStmt {
            condition,
            then_block,
            else_branch,
            span: start.merge(self.previous_span()),
        })
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `while`
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span: start.merge(self.previous_span()),
        }))
    }

    /// `do { } while (cond);`
    fn parse_do_while(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `do`
        let body = self.parse_block()?;
        self.expect(&TokenKind::While)?;
        let condition = self.parse_condition()?;
        let span = start.merge(self.previous_span());
        self.eat(&TokenKind::Semicolon);
        Some(Stmt::DoWhile(DoWhileStmt {
            body,
            condition,
            span,
        }))
    }

    /// `repeat (n) { }`
    fn parse_repeat(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `repeat`
        self.expect(&TokenKind::LParen)?;
        let count = match self.peek_kind().clone() {
            TokenKind::Integer(n) if n <= MAX_REPEAT => {
                self.advance();
                n as u32
            }
            TokenKind::Integer(_) => {
                let span = self.advance().span;
                self.error_at(
                    ErrorCode::INVALID_REPEAT_COUNT,
                    format!("repeat count must be at most {MAX_REPEAT}"),
                    span,
                );
                0
            }
            other => {
                let err = self
                    .make_error(
                        ErrorCode::INVALID_REPEAT_COUNT,
                        format!("repeat needs a whole number, got '{other}'"),
                        self.current_span(),
                    )
                    .with_suggestion("write the count as a number, e.g. repeat (4) { ... }");
                self.push(err);
                return None;
            }
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Some(Stmt::Repeat(RepeatStmt {
            count,
            body,
            span: start.merge(self.previous_span()),
        }))
    }

    // ── Conditions ────────────────────────────────────────────────────────────

    /// The parenthesised condition of an `if`, `while` or `do ... while`.
    fn parse_condition(&mut self) -> Option<Cond> {
        self.operators = 0;
        self.parse_paren_condition()
    }

    fn parse_paren_condition(&mut self) -> Option<Cond> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_or()?;
        self.expect(&TokenKind::RParen)?;
        Some(cond)
    }

    fn parse_or(&mut self) -> Option<Cond> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            self.note_operator()?;
            let right = self.parse_and()?;
            left = Cond::Or(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Cond> {
        let mut left = self.parse_unary()?;
        while self.eat(&TokenKind::AndAnd) {
            self.note_operator()?;
            let right = self.parse_unary()?;
            left = Cond::And(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Cond> {
        match self.peek_kind() {
            TokenKind::Bang => {
                let start = self.advance().span;
                self.enter()?;
                let inner = self.parse_unary();
                self.leave();
                let inner = inner?;
                let span = start.merge(inner.span());
                Some(Cond::Not(Box::new(inner), span))
            }
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.parse_paren_condition();
                self.leave();
                inner
            }
            TokenKind::Identifier(_) => self.parse_call().map(Cond::Query),
            other => {
                let message = format!("expected a condition such as frontIsClear(), got '{other}'");
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                None
            }
        }
    }
}
