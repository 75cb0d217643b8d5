//! Karel parser: converts a token stream into an AST.

mod parse_decl;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser, MAX_CONDITION_OPERATORS, MAX_NESTING};
