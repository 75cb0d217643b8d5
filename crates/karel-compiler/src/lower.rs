//! Name resolution, validation and lowering of the syntax tree into a
//! [`Program`].
//!
//! Error codes emitted:
//! - K200: unknown procedure
//! - K201: unknown condition
//! - K300: arguments passed to a procedure or condition
//! - K400: no entry point
//! - K502: condition used as a statement
//! - K503: action or procedure used as a condition
//! - K510: procedure never called (warning)

use std::collections::HashSet;

use karel_types::ast::*;
use karel_types::program::{
    BlockId, CondId, Condition, Instruction, Op, ProcId, Program, ProgramBuilder,
};
use karel_types::{
    Builtin, CompileError, CompileErrors, ErrorCode, Predicate, Primitive, SourceFile, Span,
};

use crate::suggest;
use crate::symbols::{ProcSource, SymbolTable, MAIN};

// ══════════════════════════════════════════════════════════════════════════════
// Diagnostics
// ══════════════════════════════════════════════════════════════════════════════

/// Builds [`CompileError`]s against one source file.
pub(crate) struct Diagnostics<'a> {
    source: &'a SourceFile,
    pub(crate) errors: &'a mut CompileErrors,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(source: &'a SourceFile, errors: &'a mut CompileErrors) -> Self {
        Self { source, errors }
    }

    fn make(&self, code: ErrorCode, message: String, span: Span) -> CompileError {
        let source_line = self.source.line(span.start_line).unwrap_or("").to_string();
        CompileError::new(&self.source.name, code, message, span, source_line)
    }

    pub(crate) fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        let err = self.make(code, message, span);
        self.errors.push_error(err);
    }

    pub(crate) fn error_with(
        &mut self,
        code: ErrorCode,
        message: String,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let err = self.make(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    fn error_maybe(
        &mut self,
        code: ErrorCode,
        message: String,
        span: Span,
        suggestion: Option<String>,
    ) {
        match suggestion {
            Some(s) => self.error_with(code, message, span, s),
            None => self.error(code, message, span),
        }
    }

    fn warning(&mut self, code: ErrorCode, message: String, span: Span, suggestion: &str) {
        let warning = self.make(code, message, span).with_suggestion(suggestion);
        self.errors.push_warning(warning);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Lowerer
// ══════════════════════════════════════════════════════════════════════════════

pub(crate) struct Lowerer<'a, 'ast> {
    diag: Diagnostics<'a>,
    symbols: SymbolTable<'ast>,
    builder: ProgramBuilder,
    /// Procedures referenced by at least one call.
    called: HashSet<ProcId>,
    depth: usize,
}

impl<'a, 'ast> Lowerer<'a, 'ast> {
    /// Validate and lower `program`. Returns `None` when any error was
    /// reported; warnings alone do not prevent lowering.
    pub(crate) fn lower(
        program: &'ast SourceProgram,
        source: &'a SourceFile,
        errors: &'a mut CompileErrors,
    ) -> Option<Program> {
        let mut diag = Diagnostics::new(source, errors);
        let symbols = SymbolTable::collect(program, &mut diag);
        let mut lowerer = Lowerer {
            diag,
            symbols,
            builder: ProgramBuilder::new(),
            called: HashSet::new(),
            depth: 0,
        };

        let procs: Vec<(ProcId, ProcSource<'ast>)> = lowerer.symbols.iter().collect();
        for (id, source) in procs {
            let body = match source {
                ProcSource::TopLevel(_) => lowerer.lower_stmts(&program.statements),
                ProcSource::Function(def) => lowerer.lower_block(&def.body),
            };
            let added = lowerer.builder.add_procedure(source.name(), body, source.span());
            debug_assert_eq!(added, id);
        }

        let Some(entry) = lowerer.symbols.entry else {
            lowerer.diag.error_with(
                ErrorCode::MISSING_ENTRY_PROCEDURE,
                "program has nothing to run".to_string(),
                Span::point(1, 1),
                "write commands at the top level, or define function main() { ... }",
            );
            return None;
        };
        lowerer.report_unused(entry);

        if lowerer.diag.errors.has_errors() {
            return None;
        }
        Some(lowerer.builder.finish(entry))
    }

    fn report_unused(&mut self, entry: ProcId) {
        let implicit_entry = matches!(self.symbols.source(entry), ProcSource::TopLevel(_));
        let unused: Vec<&'ast FunctionDef> = self
            .symbols
            .iter()
            .filter(|(id, _)| *id != entry && !self.called.contains(id))
            .filter_map(|(_, source)| match source {
                ProcSource::Function(def) => Some(def),
                ProcSource::TopLevel(_) => None,
            })
            .collect();
        for def in unused {
            let name = def.name.name.as_str();
            if name == MAIN && implicit_entry {
                self.diag.warning(
                    ErrorCode::UNUSED_PROCEDURE,
                    "function 'main' is never called; the top-level commands run instead".to_string(),
                    def.name.span,
                    "call main() at the top level, or move the top-level commands into main",
                );
            } else {
                self.diag.warning(
                    ErrorCode::UNUSED_PROCEDURE,
                    format!("function '{name}' is never called"),
                    def.name.span,
                    "call it from the program or remove it",
                );
            }
        }
    }

    // ── Blocks & statements ──────────────────────────────────────────────────

    fn lower_block(&mut self, block: &Block) -> BlockId {
        self.lower_stmts(&block.stmts)
    }

    fn lower_stmts(&mut self, stmts: &[Stmt]) -> BlockId {
        self.depth += 1;
        self.builder.note_nesting(self.depth);
        let instructions = stmts.iter().filter_map(|s| self.lower_stmt(s)).collect();
        self.depth -= 1;
        self.builder.add_block(instructions)
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Option<Instruction> {
        let op = match stmt {
            Stmt::Call(call) => self.lower_call(call)?,
            Stmt::If(if_stmt) => return self.lower_if(if_stmt),
            Stmt::While(w) => {
                let cond = self.lower_cond(&w.condition);
                let body = self.lower_block(&w.body);
                Op::While { cond: cond?, body }
            }
            Stmt::DoWhile(d) => {
                let body = self.lower_block(&d.body);
                let cond = self.lower_cond(&d.condition);
                Op::DoWhile { body, cond: cond? }
            }
            Stmt::Repeat(r) => Op::Repeat {
                count: r.count,
                body: self.lower_block(&r.body),
            },
        };
        Some(Instruction {
            op,
            span: stmt.span(),
        })
    }

    fn lower_if(&mut self, stmt: &IfStmt) -> Option<Instruction> {
        let cond = self.lower_cond(&stmt.condition);
        let then_block = self.lower_block(&stmt.then_block);
        let else_block = match &stmt.else_branch {
            None => None,
            Some(ElseBranch::Block(block)) => Some(self.lower_block(block)),
            Some(ElseBranch::If(nested)) => {
                // `else if` becomes an else block holding a single `if`.
                self.depth += 1;
                self.builder.note_nesting(self.depth);
                let inner = self.lower_if(nested);
                self.depth -= 1;
                Some(self.builder.add_block(inner.into_iter().collect()))
            }
        };
        Some(Instruction {
            op: Op::If {
                cond: cond?,
                then_block,
                else_block,
            },
            span: stmt.span,
        })
    }

    fn lower_call(&mut self, call: &CallStmt) -> Option<Op> {
        let name = call.name.name.as_str();
        match Builtin::lookup(name) {
            Some(Builtin::Action(primitive)) => {
                self.check_no_args(call, name);
                Some(Op::Action(primitive))
            }
            Some(Builtin::Predicate(_)) => {
                self.diag.error_with(
                    ErrorCode::PREDICATE_AS_STATEMENT,
                    format!("'{name}' is a condition and cannot be used as a command"),
                    call.span,
                    format!("test it instead, e.g. if ({name}()) {{ ... }}"),
                );
                None
            }
            None => match self.symbols.lookup(name) {
                Some(id) => {
                    self.check_no_args(call, name);
                    self.called.insert(id);
                    Some(Op::Call(id))
                }
                None => {
                    let candidates = Primitive::ALL
                        .iter()
                        .map(|p| p.name())
                        .chain(self.symbols.user_names());
                    let hint = suggest::closest(name, candidates).map(|c| format!("did you mean '{c}'?"));
                    self.diag.error_maybe(
                        ErrorCode::UNKNOWN_PROCEDURE,
                        format!("unknown command '{name}'"),
                        call.name.span,
                        hint,
                    );
                    None
                }
            },
        }
    }

    fn check_no_args(&mut self, call: &CallStmt, name: &str) {
        if let (Some(first), Some(last)) = (call.args.first(), call.args.last()) {
            let count = call.args.len();
            self.diag.error_with(
                ErrorCode::WRONG_ARG_COUNT,
                format!("'{name}' takes no arguments (got {count})"),
                first.span().merge(last.span()),
                format!("write {name}() with empty parentheses"),
            );
        }
    }

    // ── Conditions ───────────────────────────────────────────────────────────

    fn lower_cond(&mut self, cond: &Cond) -> Option<CondId> {
        let condition = match cond {
            Cond::Query(call) => Condition::Predicate(self.resolve_predicate(call)?),
            Cond::Not(inner, _) => Condition::Not(self.lower_cond(inner)?),
            Cond::And(a, b) => {
                let a = self.lower_cond(a);
                let b = self.lower_cond(b);
                Condition::And(a?, b?)
            }
            Cond::Or(a, b) => {
                let a = self.lower_cond(a);
                let b = self.lower_cond(b);
                Condition::Or(a?, b?)
            }
        };
        Some(self.builder.add_condition(condition))
    }

    fn resolve_predicate(&mut self, call: &CallStmt) -> Option<Predicate> {
        let name = call.name.name.as_str();
        match Builtin::lookup(name) {
            Some(Builtin::Predicate(predicate)) => {
                self.check_no_args(call, name);
                Some(predicate)
            }
            Some(Builtin::Action(_)) => {
                self.diag.error_with(
                    ErrorCode::ACTION_AS_CONDITION,
                    format!("'{name}' is an action and cannot be used as a condition"),
                    call.span,
                    "conditions ask about the world, e.g. frontIsClear() or beepersPresent()",
                );
                None
            }
            None if self.symbols.lookup(name).is_some() => {
                self.diag.error_with(
                    ErrorCode::ACTION_AS_CONDITION,
                    format!("function '{name}' cannot be used as a condition"),
                    call.span,
                    "functions run commands; they do not produce true or false",
                );
                None
            }
            None => {
                let hint = suggest::closest(name, Predicate::ALL.iter().map(|p| p.name()))
                    .map(|c| format!("did you mean '{c}'?"));
                self.diag.error_maybe(
                    ErrorCode::UNKNOWN_PREDICATE,
                    format!("unknown condition '{name}'"),
                    call.name.span,
                    hint,
                );
                None
            }
        }
    }
}
