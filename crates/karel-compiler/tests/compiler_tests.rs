//! Compiler tests: entry selection, name resolution, diagnostics and the
//! shape of the lowered program.

use karel_compiler::{compile, compile_to_result, compile_with_diagnostics, parse};
use karel_types::program::{Condition, Op, ProcId, Program};
use karel_types::{CompileErrors, ErrorCode, Predicate, Primitive};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn ok(source: &str) -> Program {
    compile(source, "test.k").unwrap_or_else(|e| panic!("expected success, got:\n{e}"))
}

fn errors(source: &str) -> CompileErrors {
    match compile(source, "test.k") {
        Ok(_) => panic!("expected errors for:\n{source}"),
        Err(e) => e,
    }
}

fn codes(source: &str) -> Vec<ErrorCode> {
    errors(source).errors.iter().map(|e| e.code).collect()
}

fn warning_codes(source: &str) -> Vec<ErrorCode> {
    let (program, diags) = compile_with_diagnostics(source, "test.k");
    assert!(program.is_some(), "expected success, got:\n{diags}");
    diags.warnings.iter().map(|w| w.code).collect()
}

fn entry_ops(program: &Program) -> Vec<Op> {
    program
        .block(program.entry_procedure().body)
        .iter()
        .map(|i| i.op.clone())
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Entry point
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn top_level_statements_form_the_entry() {
    let program = ok("move();\nmove();\nturnLeft();\nmove();");
    assert_eq!(program.entry(), ProcId(0));
    assert_eq!(program.entry_procedure().name, "<main>");
    assert_eq!(
        entry_ops(&program),
        vec![
            Op::Action(Primitive::Move),
            Op::Action(Primitive::Move),
            Op::Action(Primitive::TurnLeft),
            Op::Action(Primitive::Move),
        ]
    );
}

#[test]
fn main_function_is_the_entry_without_top_level_statements() {
    let program = ok("function turnAround() { turnLeft(); turnLeft(); }\n\
                      function main() { turnAround(); move(); }");
    let names: Vec<&str> = program.procedures().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["turnAround", "main"]);
    assert_eq!(program.entry(), ProcId(1));
    assert_eq!(
        entry_ops(&program),
        vec![Op::Call(ProcId(0)), Op::Action(Primitive::Move)]
    );
}

#[test]
fn implicit_entry_comes_before_functions() {
    let program = ok("function stepTwice() { move(); move(); }\nstepTwice();");
    let names: Vec<&str> = program.procedures().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["<main>", "stepTwice"]);
    assert_eq!(entry_ops(&program), vec![Op::Call(ProcId(1))]);
}

#[test]
fn calls_may_refer_to_later_functions() {
    let program = ok("function main() { helper(); }\nfunction helper() { move(); }");
    assert_eq!(entry_ops(&program), vec![Op::Call(ProcId(1))]);
}

#[test]
fn recursion_compiles() {
    ok("function spin() { turnLeft(); spin(); }\nspin();");
}

#[test]
fn calls_without_parentheses_are_accepted() {
    let program = ok("move\nturnLeft;\nputBeeper()");
    assert_eq!(entry_ops(&program).len(), 3);
}

#[test]
fn missing_entry_is_reported() {
    assert_eq!(
        codes("function helper() { move(); }"),
        vec![ErrorCode::MISSING_ENTRY_PROCEDURE]
    );
}

#[test]
fn empty_source_has_no_entry() {
    assert_eq!(codes(""), vec![ErrorCode::MISSING_ENTRY_PROCEDURE]);
    assert_eq!(codes("// nothing here\n"), vec![ErrorCode::MISSING_ENTRY_PROCEDURE]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Name resolution
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn unknown_procedure_suggests_a_close_name() {
    let errs = errors("mvoe();");
    assert_eq!(errs.errors.len(), 1);
    let err = &errs.errors[0];
    assert_eq!(err.code, ErrorCode::UNKNOWN_PROCEDURE);
    assert_eq!(err.suggestion.as_deref(), Some("did you mean 'move'?"));
    assert_eq!(err.span.start_line, 1);
    assert_eq!(err.span.start_col, 1);
    assert_eq!(err.source_line, "mvoe();");
}

#[test]
fn unknown_procedure_suggests_user_functions() {
    let errs = errors("function climbStair() { move(); }\nclimbStairs();");
    assert_eq!(errs.errors[0].code, ErrorCode::UNKNOWN_PROCEDURE);
    assert_eq!(
        errs.errors[0].suggestion.as_deref(),
        Some("did you mean 'climbStair'?")
    );
}

#[test]
fn unknown_name_without_close_match_has_no_suggestion() {
    let errs = errors("jump();");
    assert_eq!(errs.errors[0].code, ErrorCode::UNKNOWN_PROCEDURE);
    assert_eq!(errs.errors[0].suggestion, None);
}

#[test]
fn unknown_predicate_suggests_a_close_name() {
    let errs = errors("if (frontIsClar()) { move(); }");
    assert_eq!(errs.errors[0].code, ErrorCode::UNKNOWN_PREDICATE);
    assert_eq!(
        errs.errors[0].suggestion.as_deref(),
        Some("did you mean 'frontIsClear'?")
    );
}

#[test]
fn predicate_used_as_statement() {
    assert_eq!(codes("frontIsClear();"), vec![ErrorCode::PREDICATE_AS_STATEMENT]);
}

#[test]
fn action_used_as_condition() {
    assert_eq!(codes("while (move()) { }"), vec![ErrorCode::ACTION_AS_CONDITION]);
}

#[test]
fn user_function_used_as_condition() {
    assert_eq!(
        codes("function f() { move(); }\nif (f()) { move(); }"),
        vec![ErrorCode::ACTION_AS_CONDITION]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Arity & definitions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn arguments_to_actions_are_rejected() {
    let errs = errors("move(3);");
    assert_eq!(errs.errors[0].code, ErrorCode::WRONG_ARG_COUNT);
    assert!(errs.errors[0].message.contains("got 1"));
}

#[test]
fn arguments_to_predicates_are_rejected() {
    assert_eq!(
        codes("if (frontIsClear(1, 2)) { move(); }"),
        vec![ErrorCode::WRONG_ARG_COUNT]
    );
}

#[test]
fn arguments_to_user_functions_are_rejected() {
    assert_eq!(
        codes("function go() { move(); }\ngo(x);"),
        vec![ErrorCode::WRONG_ARG_COUNT]
    );
}

#[test]
fn parameters_are_rejected() {
    assert_eq!(
        codes("function go(n) { move(); }\ngo();"),
        vec![ErrorCode::PARAMETERS_NOT_ALLOWED]
    );
}

#[test]
fn duplicate_function_is_reported_with_first_line() {
    let errs = errors("function a() { move(); }\nfunction a() { turnLeft(); }\na();");
    assert_eq!(errs.errors.len(), 1);
    assert_eq!(errs.errors[0].code, ErrorCode::DUPLICATE_PROCEDURE);
    assert_eq!(errs.errors[0].span.start_line, 2);
    assert!(errs.errors[0].message.contains("line 1"));
}

#[test]
fn builtin_names_cannot_be_redefined() {
    assert_eq!(
        codes("function move() { turnLeft(); }\nmove();"),
        vec![ErrorCode::REDEFINED_BUILTIN]
    );
    assert_eq!(
        codes("function frontIsClear() { move(); }\nmove();"),
        vec![ErrorCode::REDEFINED_BUILTIN]
    );
}

#[test]
fn errors_are_collected_across_the_file() {
    assert_eq!(
        codes("mvoe();\nturnLft();\nfrontIsClear();"),
        vec![
            ErrorCode::UNKNOWN_PROCEDURE,
            ErrorCode::UNKNOWN_PROCEDURE,
            ErrorCode::PREDICATE_AS_STATEMENT,
        ]
    );
}

#[test]
fn syntax_errors_skip_name_resolution() {
    let errs = errors("move(;\nmvoe();");
    assert!(!errs.errors.is_empty());
    assert!(errs
        .errors
        .iter()
        .all(|e| e.code.0 >= 100 && e.code.0 < 200));
}

// ══════════════════════════════════════════════════════════════════════════════
// Warnings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn unused_function_is_a_warning() {
    assert_eq!(
        warning_codes("function helper() { move(); }\nmove();"),
        vec![ErrorCode::UNUSED_PROCEDURE]
    );
}

#[test]
fn main_ignored_by_top_level_statements_is_explained() {
    let (_, diags) = compile_with_diagnostics("function main() { move(); }\nturnLeft();", "test.k");
    assert_eq!(diags.warnings.len(), 1);
    assert!(diags.warnings[0].message.contains("top-level"));
}

#[test]
fn called_functions_are_not_warned_about() {
    assert!(warning_codes("function a() { b(); }\nfunction b() { move(); }\na();").is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// Lowering
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn conditions_lower_to_a_tree() {
    let program = ok("while (frontIsClear() && !beepersPresent()) { move(); }");
    let ops = entry_ops(&program);
    let Op::While { cond, body } = ops[0] else {
        panic!("expected while, got {:?}", ops[0]);
    };
    assert_eq!(program.block(body).len(), 1);
    let Condition::And(a, b) = program.condition(cond) else {
        panic!("expected &&");
    };
    assert_eq!(
        program.condition(a),
        Condition::Predicate(Predicate::FrontIsClear)
    );
    let Condition::Not(inner) = program.condition(b) else {
        panic!("expected !");
    };
    assert_eq!(
        program.condition(inner),
        Condition::Predicate(Predicate::BeepersPresent)
    );
}

#[test]
fn else_if_chains_nest_in_else_blocks() {
    let program = ok("if (facingNorth()) { move(); }\n\
                      else if (facingSouth()) { turnLeft(); }\n\
                      else { turnRight(); }");
    let ops = entry_ops(&program);
    let Op::If {
        else_block: Some(outer_else),
        ..
    } = ops[0]
    else {
        panic!("expected if/else, got {:?}", ops[0]);
    };
    let nested = program.block(outer_else);
    assert_eq!(nested.len(), 1);
    assert!(matches!(
        nested[0].op,
        Op::If {
            else_block: Some(_),
            ..
        }
    ));
}

#[test]
fn repeat_and_do_while_lower() {
    let program = ok("repeat (4) { move(); turnLeft(); }\ndo { move(); } while (frontIsClear());");
    let ops = entry_ops(&program);
    assert!(matches!(ops[0], Op::Repeat { count: 4, .. }));
    assert!(matches!(ops[1], Op::DoWhile { .. }));
    assert_eq!(program.static_action_count(), 3);
}

#[test]
fn nesting_depth_is_recorded() {
    let program = ok("repeat (2) { repeat (3) { move(); } }");
    assert_eq!(program.max_nesting(), 3);
}

#[test]
fn overlong_condition_chain_is_a_compile_error() {
    let chain = vec!["frontIsClear()"; 20_000].join(" && ");
    let errors = errors(&format!("if ({chain}) {{ move(); }}"));
    assert_eq!(errors.total_errors, 1);
    assert_eq!(errors.errors[0].code, ErrorCode::NESTING_LIMIT_EXCEEDED);
    assert!(errors.errors[0].message.contains("'&&'/'||'"));
}

#[test]
fn condition_chain_at_the_limit_compiles() {
    let chain = vec!["beepersPresent()"; 65].join(" || ");
    let program = ok(&format!("while ({chain}) {{ pickBeeper(); }}"));
    assert_eq!(program.static_action_count(), 1);
}

#[test]
fn instructions_carry_source_spans() {
    let program = ok("move();\n  turnLeft();");
    let block = program.block(program.entry_procedure().body);
    assert_eq!(block[1].span.start_line, 2);
    assert_eq!(block[1].span.start_col, 3);
}

#[test]
fn compilation_is_deterministic() {
    let source = "function a() { repeat (3) { b(); } }\nfunction b() { if (frontIsClear()) { move(); } else { turnLeft(); } }\na();";
    let first = ok(source);
    for _ in 0..20 {
        assert_eq!(ok(source), first);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Front-end API
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn compile_to_result_reports_success() {
    let outcome = compile_to_result("function helper() { move(); }\nhelper();\nputBeeper();", "ok.k");
    assert!(outcome.success);
    assert_eq!(outcome.entry.as_deref(), Some("<main>"));
    assert_eq!(outcome.procedures, vec!["<main>", "helper"]);
    assert_eq!(outcome.actions, 2);
    assert!(!outcome.errors.has_errors());
}

#[test]
fn compile_to_result_serializes_errors() {
    let outcome = compile_to_result("mvoe();", "bad.k");
    assert!(!outcome.success);
    let json = serde_json::to_value(&outcome).expect("serializable");
    assert_eq!(json["success"], false);
    let first = &json["errors"]["errors"][0];
    assert_eq!(first["file"], "bad.k");
    assert_eq!(first["code"], 200);
    assert_eq!(first["line"], 1);
    assert_eq!(first["suggestion"], "did you mean 'move'?");
}

#[test]
fn parse_returns_the_syntax_tree() {
    let (ast, errs) = parse("function f() { move(); }\nf();", "test.k");
    assert!(!errs.has_errors());
    assert_eq!(ast.functions.len(), 1);
    assert_eq!(ast.statements.len(), 1);
}
