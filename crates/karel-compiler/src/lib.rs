//! Karel compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! Karel Source → Lexer → Parser → Name Resolution & Checks → Lowering → Program
//! ```
//!
//! Diagnostics from every stage are collected into one [`CompileErrors`];
//! lowering is skipped once the source has syntax errors.

mod lower;
mod suggest;
mod symbols;

use karel_lexer::Lexer;
use karel_parser::Parser;
use karel_types::ast::SourceProgram;
use karel_types::{CompileErrors, Program, SourceFile};
use serde::Serialize;

pub use karel_types::CompileResult;
pub use symbols::MAIN;

/// Lex and parse `source`, returning the syntax tree with any syntax errors.
pub fn parse(source: &str, filename: &str) -> (SourceProgram, CompileErrors) {
    let source_file = SourceFile::new(filename, source);
    parse_file(&source_file)
}

fn parse_file(source_file: &SourceFile) -> (SourceProgram, CompileErrors) {
    let lexed = Lexer::new(source_file).lex();
    let mut errors = lexed.errors;
    let parsed = Parser::new(lexed.tokens, source_file).parse();
    errors.extend(parsed.errors);
    (parsed.program, errors)
}

/// Run the whole pipeline, returning the program (when there were no
/// errors) together with every diagnostic, warnings included.
pub fn compile_with_diagnostics(source: &str, filename: &str) -> (Option<Program>, CompileErrors) {
    let source_file = SourceFile::new(filename, source);
    let (ast, mut errors) = parse_file(&source_file);
    if errors.has_errors() {
        tracing::debug!(file = filename, errors = errors.total_errors, "syntax errors");
        return (None, errors);
    }
    let program = lower::Lowerer::lower(&ast, &source_file, &mut errors);
    match &program {
        Some(p) => tracing::debug!(
            file = filename,
            procedures = p.procedures().len(),
            actions = p.static_action_count(),
            warnings = errors.total_warnings,
            "compiled"
        ),
        None => tracing::debug!(file = filename, errors = errors.total_errors, "compile failed"),
    }
    (program, errors)
}

/// Compile `source` into an executable [`Program`].
///
/// Warnings are dropped; use [`compile_with_diagnostics`] or
/// [`compile_to_result`] to see them.
pub fn compile(source: &str, filename: &str) -> CompileResult {
    match compile_with_diagnostics(source, filename) {
        (Some(program), _) => Ok(program),
        (None, errors) => Err(errors),
    }
}

/// Serializable summary of one compilation, for front-ends that talk JSON.
#[derive(Debug, Clone, Serialize)]
pub struct CompileOutcome {
    pub success: bool,
    /// Procedure names in id order; empty on failure.
    pub procedures: Vec<String>,
    pub entry: Option<String>,
    /// Primitive actions written in the source.
    pub actions: usize,
    pub errors: CompileErrors,
}

impl CompileOutcome {
    /// Summarise a compilation that produced `program` (if any) and `errors`.
    pub fn new(program: Option<&Program>, errors: CompileErrors) -> Self {
        match program {
            Some(program) => Self {
                success: true,
                procedures: program.procedures().iter().map(|p| p.name.clone()).collect(),
                entry: Some(program.entry_procedure().name.clone()),
                actions: program.static_action_count(),
                errors,
            },
            None => Self {
                success: false,
                procedures: Vec::new(),
                entry: None,
                actions: 0,
                errors,
            },
        }
    }
}

/// Compile and summarise; never fails.
pub fn compile_to_result(source: &str, filename: &str) -> CompileOutcome {
    let (program, errors) = compile_with_diagnostics(source, filename);
    CompileOutcome::new(program.as_ref(), errors)
}
