//! Evaluator tests exercising the tree-walking `eval_expression`/`execute`
//! dispatch against a real `Environment`, rather than stubbed state.
//! Covers the language's worked example programs and boundary behaviors
//! at the unit level; grounded on `omg_runtime::vm::tests`'s plain
//! `assert_eq!` style (no `rstest`/`proptest`).

use super::*;
use crate::env::{Environment, Printer, Reader, StdinReader, StdoutPrinter};
use crate::value::Value;

fn run_src(src: &str) -> Value {
    let statements = crate::parser::parse(src).unwrap_or_else(|e| panic!("{}", e));
    let mut environment = Environment::new(
        statements,
        Box::new(StdoutPrinter),
        Box::new(StdinReader),
        1_000_000,
    );
    run(&mut environment).unwrap_or_else(|e| panic!("{}", e))
}

fn env_for(src: &str) -> Environment {
    let statements = crate::parser::parse(src).unwrap_or_else(|e| panic!("{}", e));
    Environment::new(
        statements,
        Box::new(StdoutPrinter),
        Box::new(StdinReader),
        1_000_000,
    )
}

#[test]
fn scenario_1_simple_addition() {
    let result = run_src("(2 3 .+);");
    assert_eq!(result, Value::Integer(5));
}

#[test]
fn scenario_2_nested_stack_arithmetic() {
    let result = run_src("x = 10; y = ((x 1 .-) (x 1 .+) .*); y;");
    assert_eq!(result, Value::Integer(99));
}

#[test]
fn scenario_3_while_loop_factorial() {
    let result = run_src(
        "n = 5; i = 1; acc = 1; \
         while i <= n => { acc = (acc i .*); i = (i 1 .+) }; \
         acc;",
    );
    assert_eq!(result, Value::Integer(120));
}

#[test]
fn scenario_4_grab_then_bloat_round_trips_the_stack() {
    let mut environment = env_for("(1 2 3) .grab;");
    let grabbed = run(&mut environment).unwrap();
    match &grabbed {
        Value::List(l) => {
            let items = l.borrow();
            assert_eq!(items.len(), 3);
            assert_eq!(items[0], Value::Integer(3));
            assert_eq!(items[1], Value::Integer(2));
            assert_eq!(items[2], Value::Integer(1));
        }
        _ => panic!("expected a list"),
    }

    environment.push(grabbed);
    environment.program = crate::parser::parse(".bloat;").unwrap();
    run(&mut environment).unwrap();
    assert_eq!(environment.stack.len(), 4);
    assert!(environment.stack[0].is_n());
    assert_eq!(environment.stack[1], Value::Integer(1));
    assert_eq!(environment.stack[2], Value::Integer(2));
    assert_eq!(environment.stack[3], Value::Integer(3));
}

#[test]
fn scenario_5_if_else_branches_on_truthiness() {
    let pos = run_src("x = 1; (x => \"pos\" else \"nonpos\");");
    assert_eq!(pos, Value::str_("pos"));
    let nonpos = run_src("x = 0; (x => \"pos\" else \"nonpos\");");
    assert_eq!(nonpos, Value::str_("nonpos"));
}

#[test]
fn scenario_6_concat_across_types() {
    assert_eq!(run_src("(\"a\" \"b\" .++);"), Value::str_("ab"));

    match run_src("([1,2] [3] .++);") {
        Value::List(l) => {
            let items = l.borrow();
            assert_eq!(*items, vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        }
        other => panic!("expected a list, got {}", other),
    }

    match run_src("({a=1} {b=2} .++);") {
        Value::CodeBlock(b) => assert_eq!(b.borrow().stmts.len(), 2),
        other => panic!("expected a code block, got {}", other),
    }
}

#[test]
fn boundary_missing_operand_pads_with_n_and_surfaces_t() {
    let result = run_src("(5 .+);");
    assert_eq!(result, Value::t());
}

#[test]
fn boundary_integer_division_by_zero_surfaces_t() {
    let result = run_src("(5 0 ./i);");
    assert_eq!(result, Value::t());
}

#[test]
fn boundary_float_division_by_zero_is_infinite() {
    match run_src("(5.0 0.0 ./f);") {
        Value::Float(f) => assert!(f.is_infinite()),
        other => panic!("expected a float, got {}", other),
    }
}

#[test]
fn boundary_while_requires_strict_equality_to_one() {
    let result = run_src("while 2 => 99; $N;");
    assert!(result.is_n());
}

#[test]
fn boundary_empty_stack_form_is_n() {
    let result = run_src("();");
    assert!(result.is_n());
}

#[test]
fn boundary_exceeding_op_limit_is_fatal_but_stack_stays_inspectable() {
    let statements = crate::parser::parse("x = 0; while 1 => { x = 1 };").unwrap();
    let mut environment =
        Environment::new(statements, Box::new(StdoutPrinter), Box::new(StdinReader), 20);
    let result = run(&mut environment);
    assert_eq!(result, Err(crate::error::RuntimeError::OpLimitExceeded));
    assert!(environment.op_count > environment.op_limit);
}

#[test]
fn indexing_reads_list_and_string_with_negative_wraparound() {
    assert_eq!(run_src("[10,20,30][-1];"), Value::Integer(30));
    assert_eq!(run_src("\"abc\"[-1];"), Value::str_("c"));
}

#[test]
fn const_literal_bypasses_name_lookup() {
    let result = run_src("cat = 1; $cat;");
    match result {
        Value::Const(name) => assert_eq!(&*name, "cat"),
        other => panic!("expected a Const, got {}", other),
    }
}

#[test]
fn region_expansion_is_inclusive_on_both_ends() {
    match run_src("@[(1..2, 5..5)];") {
        Value::List(l) => {
            let items = l.borrow();
            assert_eq!(
                *items,
                vec![
                    Value::tuple(vec![Value::Integer(1), Value::Integer(5)]),
                    Value::tuple(vec![Value::Integer(2), Value::Integer(5)]),
                ]
            );
        }
        other => panic!("expected a list, got {}", other),
    }
}

#[test]
fn concat_then_negative_index_reads_off_the_combined_end() {
    let result = run_src("xs = ([1,2] [3,4] .++); xs[-1];");
    assert_eq!(result, Value::Integer(4));
}

#[test]
fn undefined_name_is_a_reported_fatal_error() {
    let statements = crate::parser::parse("nope;").unwrap();
    let mut environment = Environment::new(
        statements,
        Box::new(StdoutPrinter),
        Box::new(StdinReader),
        1_000_000,
    );
    let err = run(&mut environment).unwrap_err();
    assert_eq!(err, crate::error::RuntimeError::UndefinedName("nope".to_string()));
}

#[test]
fn malformed_source_is_a_syntax_error_before_any_running() {
    let err = crate::parser::parse("x = (1 2;").unwrap_err();
    assert!(err.to_string().contains("SyntaxError"));
}

/// A scripted `Reader` so the `read` built-in can be exercised without
/// touching real stdin.
struct ScriptedReader {
    lines: std::vec::IntoIter<String>,
}

impl Reader for ScriptedReader {
    fn read_line(&mut self) -> Option<String> {
        self.lines.next()
    }
}

/// A `Printer` that records output instead of writing to stdout, so
/// `print`/`println` can be asserted on directly.
#[derive(Default)]
struct CapturingPrinter {
    lines: Vec<String>,
}

impl Printer for CapturingPrinter {
    fn print(&mut self, s: &str) {
        self.lines.push(s.to_string());
    }

    fn println(&mut self, s: &str) {
        self.lines.push(format!("{}\n", s));
    }
}

#[test]
fn read_and_println_round_trip_through_injected_io() {
    let statements = crate::parser::parse("line = (.read); line .println; line;").unwrap();
    let reader = ScriptedReader {
        lines: vec!["hello".to_string()].into_iter(),
    };
    let mut environment = Environment::new(
        statements,
        Box::new(CapturingPrinter::default()),
        Box::new(reader),
        1_000_000,
    );
    let result = run(&mut environment).unwrap();
    assert_eq!(result, Value::str_("hello"));
}

#[test]
fn op_limit_zero_rejects_even_a_single_statement() {
    let statements = crate::parser::parse("1;").unwrap();
    let mut environment = Environment::new(
        statements,
        Box::new(StdoutPrinter),
        Box::new(StdinReader),
        0,
    );
    let result = run(&mut environment);
    assert_eq!(result, Err(crate::error::RuntimeError::OpLimitExceeded));
}
