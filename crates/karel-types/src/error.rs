use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before the rest are only counted.
pub const MAX_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What went wrong at compile time, derived from the error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompileErrorKind {
    SyntaxError,
    UnknownIdentifier,
    ArityMismatch,
    MissingEntryProcedure,
    Structure,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SyntaxError => "syntax",
            Self::UnknownIdentifier => "unknown-identifier",
            Self::ArityMismatch => "arity",
            Self::MissingEntryProcedure => "missing-entry",
            Self::Structure => "structure",
        })
    }
}

/// Numeric diagnostic code (K100–K599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax (K100–K199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_BLOCK: Self = Self(101);
    pub const UNEXPECTED_CHARACTER: Self = Self(102);
    pub const UNTERMINATED_COMMENT: Self = Self(103);
    pub const INVALID_REPEAT_COUNT: Self = Self(104);

    // ── Unknown identifiers (K200–K299) ──
    pub const UNKNOWN_PROCEDURE: Self = Self(200);
    pub const UNKNOWN_PREDICATE: Self = Self(201);

    // ── Arity (K300–K399) ──
    pub const WRONG_ARG_COUNT: Self = Self(300);
    pub const PARAMETERS_NOT_ALLOWED: Self = Self(301);

    // ── Entry point (K400) ──
    pub const MISSING_ENTRY_PROCEDURE: Self = Self(400);

    // ── Structure (K500–K599) ──
    pub const DUPLICATE_PROCEDURE: Self = Self(500);
    pub const REDEFINED_BUILTIN: Self = Self(501);
    pub const PREDICATE_AS_STATEMENT: Self = Self(502);
    pub const ACTION_AS_CONDITION: Self = Self(503);
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(504);
    pub const UNUSED_PROCEDURE: Self = Self(510);

    pub fn kind(self) -> CompileErrorKind {
        match self.0 {
            100..=199 => CompileErrorKind::SyntaxError,
            200..=299 => CompileErrorKind::UnknownIdentifier,
            300..=399 => CompileErrorKind::ArityMismatch,
            400..=499 => CompileErrorKind::MissingEntryProcedure,
            _ => CompileErrorKind::Structure,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{}", self.0)
    }
}

/// A structured compile diagnostic.
///
/// Front-ends render these directly; they never parse the message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileError {
    pub file: String,
    pub code: ErrorCode,
    pub kind: CompileErrorKind,
    pub severity: Severity,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, verbatim.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
}

impl CompileError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            kind: code.kind(),
            severity: Severity::Error,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}] {}", self.span, self.code, self.kind, self.message)
    }
}

impl std::error::Error for CompileError {}

/// Diagnostics collected over one compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<CompileError>,
    pub warnings: Vec<CompileError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once [`MAX_ERRORS`] errors have been recorded.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Record an error; only the first [`MAX_ERRORS`] are stored.
    pub fn push_error(&mut self, error: CompileError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn push_warning(&mut self, warning: CompileError) {
        self.warnings.push(warning.as_warning());
        self.total_warnings += 1;
    }

    /// Move every diagnostic of `other` into `self`.
    pub fn extend(&mut self, other: CompileErrors) {
        let hidden = other.total_errors - other.errors.len();
        for e in other.errors {
            self.push_error(e);
        }
        self.total_errors += hidden;
        for w in other.warnings {
            self.push_warning(w);
        }
    }

    /// The first stored error, if any.
    pub fn first(&self) -> Option<&CompileError> {
        self.errors.first()
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        let hidden = self.total_errors - self.errors.len();
        if hidden > 0 {
            write!(f, "\n... and {hidden} more")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

/// A terminal runtime error that halts the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "fault", rename_all = "camelCase")]
pub enum RuntimeFault {
    #[error("Karel is blocked by a wall")]
    BlockedByWall,
    #[error("there is no beeper here to pick up")]
    NoBeeperToPickUp,
    #[error("Karel has no beepers left to put down")]
    NoBeeperToPutDown,
    #[error("this corner cannot hold any more beepers")]
    CellFull,
    #[error("stack overflow: more than {depth} nested procedure calls")]
    StackOverflow { depth: usize },
    #[error("this run has already ended")]
    AlreadyTerminated,
    #[error("no action taken after {limit} control steps (is a loop body empty?)")]
    GasExhausted { limit: u64 },
}
