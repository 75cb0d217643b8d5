//! Procedure registration and entry-point selection.
//!
//! Procedure ids are assigned in declaration order. When the file has
//! top-level statements they form the implicit entry procedure, which
//! always takes id 0; otherwise the entry is the user's `main`.

use std::collections::HashMap;

use karel_types::ast::{FunctionDef, SourceProgram};
use karel_types::program::{ProcId, IMPLICIT_ENTRY};
use karel_types::{Builtin, ErrorCode, Span};

use crate::lower::Diagnostics;

/// Name a program may define to serve as its entry point.
pub const MAIN: &str = "main";

/// What a procedure id refers to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProcSource<'ast> {
    TopLevel(Span),
    Function(&'ast FunctionDef),
}

impl ProcSource<'_> {
    pub(crate) fn name(&self) -> &str {
        match self {
            ProcSource::TopLevel(_) => IMPLICIT_ENTRY,
            ProcSource::Function(def) => &def.name.name,
        }
    }

    pub(crate) fn span(&self) -> Span {
        match self {
            ProcSource::TopLevel(span) => *span,
            ProcSource::Function(def) => def.span,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SymbolTable<'ast> {
    by_name: HashMap<String, ProcId>,
    procs: Vec<ProcSource<'ast>>,
    pub(crate) entry: Option<ProcId>,
}

impl<'ast> SymbolTable<'ast> {
    /// Register every procedure of `program`, reporting duplicates and
    /// definitions that reuse a built-in name.
    pub(crate) fn collect(program: &'ast SourceProgram, diag: &mut Diagnostics<'_>) -> Self {
        let mut table = SymbolTable::default();

        if let (Some(first), Some(last)) = (program.statements.first(), program.statements.last()) {
            let id = table.push(ProcSource::TopLevel(first.span().merge(last.span())));
            table.entry = Some(id);
        }

        for def in &program.functions {
            let name = def.name.name.as_str();
            if let Some(builtin) = Builtin::lookup(name) {
                let what = match builtin {
                    Builtin::Action(_) => "action",
                    Builtin::Predicate(_) => "condition",
                };
                diag.error_with(
                    ErrorCode::REDEFINED_BUILTIN,
                    format!("'{name}' is a built-in {what} and cannot be redefined"),
                    def.name.span,
                    "choose a different name for this function",
                );
                continue;
            }
            if let Some(&existing) = table.by_name.get(name) {
                let line = table.source(existing).span().start_line;
                diag.error_with(
                    ErrorCode::DUPLICATE_PROCEDURE,
                    format!("function '{name}' is already defined on line {line}"),
                    def.name.span,
                    "rename or remove one of the definitions",
                );
                continue;
            }
            if let (Some(first), Some(last)) = (def.params.first(), def.params.last()) {
                diag.error_with(
                    ErrorCode::PARAMETERS_NOT_ALLOWED,
                    format!("function '{name}' cannot take parameters"),
                    first.span.merge(last.span),
                    format!("write it as function {name}() {{ ... }}"),
                );
            }
            let id = table.push(ProcSource::Function(def));
            table.by_name.insert(name.to_string(), id);
        }

        if table.entry.is_none() {
            table.entry = table.by_name.get(MAIN).copied();
        }
        table
    }

    fn push(&mut self, source: ProcSource<'ast>) -> ProcId {
        self.procs.push(source);
        ProcId(self.procs.len() as u32 - 1)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<ProcId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn source(&self, id: ProcId) -> ProcSource<'ast> {
        self.procs[id.0 as usize]
    }

    /// All procedures in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ProcId, ProcSource<'ast>)> + '_ {
        self.procs
            .iter()
            .enumerate()
            .map(|(i, p)| (ProcId(i as u32), *p))
    }

    pub(crate) fn user_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}
