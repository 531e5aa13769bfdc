// tests/integration_tests.rs
//
// End-to-end evaluation tests against a small YAML document, covering
// navigation, pipes, arithmetic, assignment, and failure behavior.

use y_lang::{document, EvalError, Evaluator, Expr, Lexer, Parser, Value};

const SAMPLE: &str = "\
a:
  b:
    c:
      - 99
      - swallow
";

fn parse(input: &str) -> Expr {
    let mut parser = Parser::new(Lexer::new(input)).unwrap();
    parser.parse().unwrap()
}

fn sample_evaluator() -> Evaluator {
    let mut evaluator = Evaluator::new();
    evaluator.load(document::load_str(SAMPLE).unwrap());
    evaluator
}

fn eval(evaluator: &mut Evaluator, input: &str) -> Value {
    let (value, _) = evaluator.eval_expression(&parse(input)).unwrap();
    value
}

fn eval_err(evaluator: &mut Evaluator, input: &str) -> EvalError {
    evaluator.eval_expression(&parse(input)).unwrap_err()
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_read_nested_paths() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, ".a.b.c[0]"), Value::Number(99.0));
    assert_eq!(
        eval(&mut evaluator, ".a.b.c[1]"),
        Value::String("swallow".to_string())
    );
}

#[test]
fn test_read_is_idempotent() {
    let mut evaluator = sample_evaluator();
    let first = eval(&mut evaluator, ".a.b");
    let second = eval(&mut evaluator, ".a.b");
    assert_eq!(first, second);
}

#[test]
fn test_root_reference_returns_whole_document() {
    let mut evaluator = sample_evaluator();
    let root = evaluator.root().clone();
    assert_eq!(eval(&mut evaluator, "$"), root);
    assert_eq!(eval(&mut evaluator, "."), root);
}

#[test]
fn test_pipe_navigation_equals_direct_path() {
    let mut evaluator = sample_evaluator();
    let piped = eval(&mut evaluator, ".a | .b | .c | [0]");
    let direct = eval(&mut evaluator, ".a.b.c[0]");
    assert_eq!(piped, direct);
}

#[test]
fn test_root_escapes_pipe_context() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, ".a.b | $.a.b.c[0]"), Value::Number(99.0));
}

#[test]
fn test_missing_path_reads_as_null() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, ".missing"), Value::Null);
    assert_eq!(eval(&mut evaluator, ".missing.deeper[3]"), Value::Null);
}

#[test]
fn test_array_marker_is_identity() {
    let mut evaluator = sample_evaluator();
    assert_eq!(
        eval(&mut evaluator, ".a.b.c[]"),
        eval(&mut evaluator, ".a.b.c")
    );
    assert_eq!(eval(&mut evaluator, ".a.b.c[][0]"), Value::Number(99.0));
}

#[test]
fn test_descent_type_mismatches() {
    let mut evaluator = sample_evaluator();
    // key step into a sequence
    assert!(matches!(
        eval_err(&mut evaluator, ".a.b.c.x"),
        EvalError::TypeError(_)
    ));
    // index step into a mapping
    assert!(matches!(
        eval_err(&mut evaluator, ".a[0]"),
        EvalError::TypeError(_)
    ));
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_constants() {
    let mut evaluator = sample_evaluator();
    assert_eq!(
        eval(&mut evaluator, r#""abcdefg""#),
        Value::String("abcdefg".to_string())
    );
    assert_eq!(eval(&mut evaluator, "true"), Value::Boolean(true));
    assert_eq!(eval(&mut evaluator, "false"), Value::Boolean(false));
    assert_eq!(eval(&mut evaluator, "null"), Value::Null);
}

#[test]
fn test_string_constant_is_not_unescaped() {
    let mut evaluator = sample_evaluator();
    assert_eq!(
        eval(&mut evaluator, r#""a\"b""#),
        Value::String(r#"a\"b"#.to_string())
    );
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_operator_precedence_chain() {
    let mut evaluator = sample_evaluator();
    let expected = 1.0 + 2.0 - 3.0 * 4.0 / 5.0 % 6.0_f64.powf(7.0);
    assert_eq!(
        eval(&mut evaluator, "1 + 2 - 3 * 4 / 5 % 6 ^ 7"),
        Value::Number(expected)
    );
}

#[test]
fn test_power_right_associativity() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, "2 ^ 3 ^ 2"), Value::Number(512.0));
}

#[test]
fn test_math_over_references() {
    let mut evaluator = sample_evaluator();
    assert_eq!(
        eval(&mut evaluator, ".a.b.c[0] + 1"),
        Value::Number(100.0)
    );
}

#[test]
fn test_division_by_zero() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval_err(&mut evaluator, "1 / 0"), EvalError::DivisionByZero);
    assert_eq!(eval_err(&mut evaluator, "1 % 0"), EvalError::DivisionByZero);
}

#[test]
fn test_math_rejects_non_numbers() {
    let mut evaluator = sample_evaluator();
    assert!(matches!(
        eval_err(&mut evaluator, r#""a" + 1"#),
        EvalError::TypeError(_)
    ));
    // An absent operand dereferences to null, which is not a number
    assert!(matches!(
        eval_err(&mut evaluator, ".missing + 1"),
        EvalError::TypeError(_)
    ));
}

// ============================================================================
// Pipes
// ============================================================================

#[test]
fn test_pipe_threads_context() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, "2 * 2 | . * 2"), Value::Number(8.0));
}

#[test]
fn test_pipe_context_does_not_leak() {
    let mut evaluator = sample_evaluator();
    let _ = eval(&mut evaluator, ".a.b | .c");
    // The next expression starts from the document root again
    assert_eq!(eval(&mut evaluator, ".a.b.c[0]"), Value::Number(99.0));
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_assign_and_read_back() {
    let mut evaluator = sample_evaluator();
    let (value, wrote) = evaluator
        .eval_expression(&parse(".a.b.c[0] = 123"))
        .unwrap();
    assert_eq!(value, Value::Number(123.0));
    assert!(wrote);
    assert_eq!(eval(&mut evaluator, ".a.b.c[0]"), Value::Number(123.0));
}

#[test]
fn test_interpret_substitutes_root_after_write() {
    let mut evaluator = sample_evaluator();
    let result = evaluator.interpret(&parse(".d = 2")).unwrap();
    assert_eq!(result, evaluator.root().clone());
    assert_eq!(eval(&mut evaluator, ".d"), Value::Number(2.0));
}

#[test]
fn test_interpret_returns_plain_value_for_reads() {
    let mut evaluator = sample_evaluator();
    let result = evaluator.interpret(&parse(".a.b.c[1]")).unwrap();
    assert_eq!(result, Value::String("swallow".to_string()));
}

#[test]
fn test_assign_reference_source() {
    let mut evaluator = sample_evaluator();
    let b = eval(&mut evaluator, ".a.b");
    let (value, _) = evaluator.eval_expression(&parse(".a = .a.b")).unwrap();
    assert_eq!(value, b);
    assert_eq!(eval(&mut evaluator, ".a.c[0]"), Value::Number(99.0));
}

#[test]
fn test_assignment_value_flows_through_pipe() {
    let mut evaluator = sample_evaluator();
    // The stage after the assignment sees the assigned value, not the root
    assert_eq!(eval(&mut evaluator, ".d = 2 | . * 2"), Value::Number(4.0));
    assert_eq!(eval(&mut evaluator, ".d"), Value::Number(2.0));
}

#[test]
fn test_parenthesized_assignment_is_transparent() {
    let mut evaluator = sample_evaluator();
    assert_eq!(eval(&mut evaluator, "(.e = 2) | . * 2"), Value::Number(4.0));
    assert_eq!(eval(&mut evaluator, ".e"), Value::Number(2.0));
}

#[test]
fn test_piped_source_assigns_final_value() {
    let mut evaluator = sample_evaluator();
    let (value, wrote) = evaluator
        .eval_expression(&parse(".f = (2 | . * 2)"))
        .unwrap();
    assert_eq!(value, Value::Number(4.0));
    assert!(wrote);
    assert_eq!(eval(&mut evaluator, ".f"), Value::Number(4.0));
}

#[test]
fn test_pipe_reports_last_stage_write_flag() {
    let mut evaluator = sample_evaluator();
    let (_, wrote) = evaluator.eval_expression(&parse("$ | .g = 3")).unwrap();
    assert!(wrote);
    assert_eq!(eval(&mut evaluator, ".g"), Value::Number(3.0));

    let (_, wrote) = evaluator.eval_expression(&parse(".g = 4 | . + 1")).unwrap();
    assert!(!wrote);
}

#[test]
fn test_source_sees_ambient_context() {
    let mut evaluator = sample_evaluator();
    // The source is evaluated against the context as it was before the
    // assignment began, not against the target's location
    let _ = eval(&mut evaluator, ".a.b = .a.b.c[0]");
    assert_eq!(eval(&mut evaluator, ".a.b"), Value::Number(99.0));
}

// ============================================================================
// Materialization
// ============================================================================

#[test]
fn test_write_materializes_missing_ancestors() {
    let mut evaluator = Evaluator::new();
    let _ = evaluator.interpret(&parse(".a.b.c[0] = 123")).unwrap();

    assert_eq!(eval(&mut evaluator, ".a.b.c[0]"), Value::Number(123.0));
    assert!(matches!(eval(&mut evaluator, ".a"), Value::Mapping(_)));
    assert!(matches!(eval(&mut evaluator, ".a.b"), Value::Mapping(_)));
    assert!(matches!(eval(&mut evaluator, ".a.b.c"), Value::Sequence(_)));
}

#[test]
fn test_reads_do_not_materialize() {
    let mut evaluator = Evaluator::new();
    let before = evaluator.root().clone();
    assert_eq!(eval(&mut evaluator, ".a.b.c"), Value::Null);
    assert_eq!(*evaluator.root(), before);
}

#[test]
fn test_wrong_kind_ancestor_fails_without_mutation() {
    let mut evaluator = sample_evaluator();
    let before = evaluator.root().clone();
    assert!(matches!(
        eval_err(&mut evaluator, ".a[0] = 5"),
        EvalError::TypeError(_)
    ));
    assert_eq!(*evaluator.root(), before);
}

#[test]
fn test_failing_source_does_not_mutate() {
    let mut evaluator = sample_evaluator();
    let before = evaluator.root().clone();
    assert_eq!(
        eval_err(&mut evaluator, ".new = 1 / 0"),
        EvalError::DivisionByZero
    );
    assert_eq!(*evaluator.root(), before);
}

// ============================================================================
// Invalid Targets
// ============================================================================

#[test]
fn test_assignment_target_must_be_reference() {
    let mut evaluator = sample_evaluator();
    assert!(matches!(
        eval_err(&mut evaluator, "1 = 2"),
        EvalError::InvalidAssignmentTarget(_)
    ));
    assert!(matches!(
        eval_err(&mut evaluator, r#""x" = 2"#),
        EvalError::InvalidAssignmentTarget(_)
    ));
}

#[test]
fn test_whole_document_replacement_is_unsupported() {
    let mut evaluator = sample_evaluator();
    assert!(matches!(
        eval_err(&mut evaluator, ". = 5"),
        EvalError::UnsupportedAssignment(_)
    ));
    assert!(matches!(
        eval_err(&mut evaluator, "$ = 5"),
        EvalError::UnsupportedAssignment(_)
    ));
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_call_produces_null() {
    let mut evaluator = sample_evaluator();
    let (value, wrote) = evaluator
        .eval_expression(&parse("custom_fn(1 + 2, 3, 4 + 5)"))
        .unwrap();
    assert_eq!(value, Value::Null);
    assert!(!wrote);
}

#[test]
fn test_call_argument_failures_propagate() {
    let mut evaluator = sample_evaluator();
    assert_eq!(
        eval_err(&mut evaluator, "custom_fn(1 / 0)"),
        EvalError::DivisionByZero
    );
}
