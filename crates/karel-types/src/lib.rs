//! Shared types for the Karel toolchain.
//!
//! This crate defines source spans, the two error taxonomies (compile
//! errors and runtime faults), the parsed AST, the compiled [`Program`]
//! and the table of built-in actions and sensing predicates.

mod builtins;
mod error;
mod span;
pub mod ast;
pub mod program;

pub use builtins::{Builtin, Predicate, Primitive};
pub use error::{
    CompileError, CompileErrorKind, CompileErrors, ErrorCode, RuntimeFault, Severity, MAX_ERRORS,
};
pub use program::Program;
pub use span::{SourceFile, Span};

/// Result of compiling a Karel source file.
pub type CompileResult = std::result::Result<Program, CompileErrors>;
