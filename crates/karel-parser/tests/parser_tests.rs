//! Parser tests: top-level layout, statements, conditions, error
//! recovery and nesting limits.

use karel_lexer::Lexer;
use karel_parser::{ParseResult, Parser, MAX_CONDITION_OPERATORS, MAX_NESTING};
use karel_types::ast::*;
use karel_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.k", source);
    let lex = Lexer::new(&sf).lex();
    assert!(!lex.errors.has_errors(), "lex errors: {}", lex.errors);
    Parser::new(lex.tokens, &sf).parse()
}

fn parse_ok(source: &str) -> SourceProgram {
    let result = parse(source);
    if result.errors.has_errors() {
        panic!("unexpected parse errors:\n{}", result.errors);
    }
    result.program
}

fn codes(source: &str) -> Vec<ErrorCode> {
    parse(source).errors.errors.iter().map(|e| e.code).collect()
}

fn call_name(stmt: &Stmt) -> &str {
    match stmt {
        Stmt::Call(c) => &c.name.name,
        other => panic!("expected call, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────

#[test]
fn bare_calls_with_semicolons() {
    let prog = parse_ok("move; move; turnLeft; move");
    let names: Vec<_> = prog.statements.iter().map(call_name).collect();
    assert_eq!(names, ["move", "move", "turnLeft", "move"]);
    assert!(prog.functions.is_empty());
}

#[test]
fn calls_with_parens_and_no_semicolons() {
    let prog = parse_ok("move()\nturnLeft()\n");
    assert_eq!(prog.statements.len(), 2);
}

#[test]
fn function_definitions_and_top_level_statements_mix() {
    let prog = parse_ok(
        r#"
function turnAround() {
    turnLeft();
    turnLeft();
}

turnAround();

function main() {
    move();
}
"#,
    );
    assert_eq!(prog.functions.len(), 2);
    assert_eq!(prog.functions[0].name.name, "turnAround");
    assert_eq!(prog.functions[0].body.stmts.len(), 2);
    assert_eq!(prog.functions[1].name.name, "main");
    assert_eq!(prog.statements.len(), 1);
}

#[test]
fn function_parameters_are_kept_for_diagnostics() {
    let prog = parse_ok("function walk(steps, speed) { move(); }");
    let names: Vec<_> = prog.functions[0].params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["steps", "speed"]);
}

#[test]
fn call_arguments_are_kept_for_diagnostics() {
    let prog = parse_ok("move(3, fast);");
    let Stmt::Call(call) = &prog.statements[0] else {
        panic!("expected call");
    };
    assert!(matches!(call.args[0], Arg::Number(3, _)));
    assert!(matches!(&call.args[1], Arg::Name(id) if id.name == "fast"));
}

// ─────────────────────────────────────────────────────────────────────
// Control flow
// ─────────────────────────────────────────────────────────────────────

#[test]
fn if_else_if_chain() {
    let prog = parse_ok(
        r#"
if (frontIsClear()) {
    move();
} else if (leftIsClear()) {
    turnLeft();
} else {
    turnRight();
}
"#,
    );
    let Stmt::If(outer) = &prog.statements[0] else {
        panic!("expected if");
    };
    let Some(ElseBranch::If(inner)) = &outer.else_branch else {
        panic!("expected else-if");
    };
    assert!(matches!(inner.else_branch, Some(ElseBranch::Block(_))));
}

#[test]
fn while_do_while_and_repeat() {
    let prog = parse_ok(
        r#"
while (frontIsClear()) { move(); }
do { putBeeper(); } while (noBeepersPresent());
repeat (4) { turnLeft(); }
"#,
    );
    assert!(matches!(prog.statements[0], Stmt::While(_)));
    assert!(matches!(prog.statements[1], Stmt::DoWhile(_)));
    let Stmt::Repeat(rep) = &prog.statements[2] else {
        panic!("expected repeat");
    };
    assert_eq!(rep.count, 4);
    assert_eq!(rep.body.stmts.len(), 1);
}

#[test]
fn and_binds_tighter_than_or() {
    let prog = parse_ok("if (a || b && !c) { }");
    let Stmt::If(stmt) = &prog.statements[0] else {
        panic!("expected if");
    };
    let Cond::Or(left, right) = &stmt.condition else {
        panic!("expected ||, got {:?}", stmt.condition);
    };
    assert!(matches!(**left, Cond::Query(_)));
    let Cond::And(_, negated) = &**right else {
        panic!("expected &&");
    };
    assert!(matches!(**negated, Cond::Not(..)));
}

#[test]
fn parenthesised_conditions() {
    let prog = parse_ok("while ((a || b) && c) { }");
    let Stmt::While(stmt) = &prog.statements[0] else {
        panic!("expected while");
    };
    assert!(matches!(stmt.condition, Cond::And(..)));
}

#[test]
fn empty_blocks_are_allowed() {
    let prog = parse_ok("function idle() { } repeat (0) { }");
    assert!(prog.functions[0].body.stmts.is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// Errors & recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn unclosed_block_points_at_opening_brace() {
    let result = parse("function main() {\n  move();\n");
    let err = result.errors.first().unwrap();
    assert_eq!(err.code, ErrorCode::UNCLOSED_BLOCK);
    assert_eq!(err.span.start_line, 1);
    assert_eq!(err.span.start_col, 17);
}

#[test]
fn recovery_reports_several_errors() {
    let result = parse("move(;\nif frontIsClear() { }\nturnLeft();");
    assert!(result.errors.total_errors >= 2, "{}", result.errors);
    // the statement after the errors still parses
    assert!(result.program.statements.iter().any(|s| matches!(s, Stmt::Call(c) if c.name.name == "turnLeft")));
}

#[test]
fn stray_closing_brace() {
    assert_eq!(codes("move(); }"), vec![ErrorCode::UNEXPECTED_TOKEN]);
}

#[test]
fn else_without_if() {
    assert_eq!(codes("else { move(); }")[0], ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn nested_function_definition_is_rejected() {
    let result = parse("function a() { function b() { } }");
    assert_eq!(result.errors.first().unwrap().code, ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn keyword_as_function_name() {
    let result = parse("function repeat() { }");
    let err = result.errors.first().unwrap();
    assert!(err.message.contains("reserved word"), "{}", err.message);
}

#[test]
fn repeat_count_must_be_a_number() {
    assert_eq!(codes("repeat (n) { move(); }"), vec![ErrorCode::INVALID_REPEAT_COUNT]);
    assert_eq!(
        codes("repeat (2000000) { move(); }"),
        vec![ErrorCode::INVALID_REPEAT_COUNT]
    );
}

#[test]
fn missing_condition_parentheses() {
    assert_eq!(codes("while frontIsClear() { move(); }")[0], ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn nesting_limit_is_enforced_once() {
    let depth = MAX_NESTING as usize + 1;
    let source = format!("{}{}", "repeat (1) { ".repeat(depth), "}".repeat(depth));
    assert_eq!(codes(&source), vec![ErrorCode::NESTING_LIMIT_EXCEEDED]);
}

#[test]
fn nesting_at_the_limit_is_fine() {
    let depth = MAX_NESTING as usize;
    let source = format!("{}move();{}", "repeat (1) { ".repeat(depth), "}".repeat(depth));
    parse_ok(&source);
}

#[test]
fn deeply_negated_condition_is_bounded() {
    let source = format!("if ({}frontIsClear()) {{ }}", "!".repeat(1000));
    assert_eq!(codes(&source), vec![ErrorCode::NESTING_LIMIT_EXCEEDED]);
}

fn chain(operands: usize, op: &str) -> String {
    vec!["frontIsClear()"; operands].join(op)
}

#[test]
fn condition_chain_at_the_limit_is_fine() {
    let operands = MAX_CONDITION_OPERATORS as usize + 1;
    parse_ok(&format!("if ({}) {{ move(); }}", chain(operands, " && ")));
    parse_ok(&format!("while ({}) {{ move(); }}", chain(operands, " || ")));
}

#[test]
fn long_condition_chain_is_bounded() {
    let operands = MAX_CONDITION_OPERATORS as usize + 2;
    let source = format!("if ({}) {{ move(); }}", chain(operands, " && "));
    assert_eq!(codes(&source), vec![ErrorCode::NESTING_LIMIT_EXCEEDED]);
}

#[test]
fn huge_condition_chain_is_an_error_not_a_crash() {
    let source = format!("do {{ move(); }} while ({});", chain(20_000, " || "));
    let result = parse(&source);
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.errors.errors[0].code, ErrorCode::NESTING_LIMIT_EXCEEDED);
}

#[test]
fn operators_count_across_parenthesised_groups() {
    let half = MAX_CONDITION_OPERATORS as usize / 2 + 1;
    let group = format!("({})", chain(half, " && "));
    let source = format!("if ({group} || {group}) {{ }}");
    assert_eq!(codes(&source), vec![ErrorCode::NESTING_LIMIT_EXCEEDED]);
}

#[test]
fn each_condition_gets_its_own_operator_budget() {
    let cond = chain(MAX_CONDITION_OPERATORS as usize + 1, " && ");
    parse_ok(&format!("if ({cond}) {{ }} else if ({cond}) {{ }}\nwhile ({cond}) {{ }}"));
}

#[test]
fn parsing_is_deterministic() {
    let source = "function main() { while (frontIsClear()) { move(); } }";
    let first = parse_ok(source);
    for i in 0..50 {
        assert_eq!(parse_ok(source), first, "iteration {i}");
    }
}
