//! Parsed syntax tree of a Karel source file.
//!
//! Names are still unresolved here: a call to `foo` may refer to a
//! built-in action, a user procedure, or nothing at all. The compiler
//! resolves them and lowers the tree into a [`crate::Program`].

use crate::Span;

/// A whole source file: procedure definitions interleaved with top-level
/// statements, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceProgram {
    pub functions: Vec<FunctionDef>,
    /// Top-level statements; together they form the implicit entry procedure.
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `function name(params) { body }`
///
/// Karel procedures take no parameters; any that were written are kept
/// so the compiler can report them.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Call(CallStmt),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Repeat(RepeatStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Call(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::Repeat(s) => s.span,
        }
    }
}

/// A call argument; only kept for arity diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number(u64, Span),
    Name(Ident),
}

impl Arg {
    pub fn span(&self) -> Span {
        match self {
            Arg::Number(_, span) => *span,
            Arg::Name(ident) => ident.span,
        }
    }
}

/// `name`, `name()` or `name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub name: Ident,
    pub args: Vec<Arg>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(Block),
    If(Box<IfStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Cond,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Cond,
    pub body: Block,
    pub span: Span,
}

/// `do { body } while (cond)`
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Block,
    pub condition: Cond,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub count: u32,
    pub body: Block,
    pub span: Span,
}

/// Boolean condition over sensing predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    Query(CallStmt),
    Not(Box<Cond>, Span),
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
}

impl Cond {
    pub fn span(&self) -> Span {
        match self {
            Cond::Query(call) => call.span,
            Cond::Not(_, span) => *span,
            Cond::And(a, b) | Cond::Or(a, b) => a.span().merge(b.span()),
        }
    }
}
