//! Interpreter tests

use minipas::diagnostics::{CompileError, ErrorCode};
use minipas::interp::{Interpreter, Value, evaluate_expression};
use minipas::parser::parse;
use pretty_assertions::assert_eq;

fn run(source: &str) -> Result<Interpreter, CompileError> {
    let program = parse(source)?;
    let mut interpreter = Interpreter::new();
    interpreter.interpret(&program)?;
    Ok(interpreter)
}

fn eval(source: &str) -> Value {
    evaluate_expression(source).expect("evaluation failed")
}

fn eval_real(source: &str) -> f64 {
    match eval(source) {
        Value::Real(r) => r,
        other => panic!("Expected a real, got {:?}", other),
    }
}

#[test]
fn test_simple_assignments() {
    let interpreter = run("program Main; var a, b : integer; begin a := 10; b := a + 5 end.").unwrap();
    let store = interpreter.store();
    assert_eq!(store.get("a"), Some(Value::Integer(10)));
    assert_eq!(store.get("b"), Some(Value::Integer(15)));
    assert_eq!(store.len(), 2);
    assert_eq!(interpreter.get_output(), ["MAIN:".to_string()]);
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("2 + 7 * 4"), Value::Integer(30));
    assert_eq!(eval("7 - 8 div 4"), Value::Integer(5));
    assert_eq!(eval("14 + 2 * 3 - 6 div 2"), Value::Integer(17));
    assert_eq!(eval("7 + 3 * (10 div (12 div (3 + 1) - 1))"), Value::Integer(22));
    assert_eq!(
        eval("7 + (((3 + 2)))"),
        Value::Integer(12)
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(eval("- 3"), Value::Integer(-3));
    assert_eq!(eval("+ 3"), Value::Integer(3));
    assert_eq!(eval("5 - - - + - 3"), Value::Integer(8));
    assert_eq!(eval("5 - - - + - (3 + 4) - +2"), Value::Integer(10));
}

#[test]
fn test_int_div_truncates() {
    assert_eq!(eval("10 div 4"), Value::Integer(2));
    assert_eq!(eval("-7 div 2"), Value::Integer(-3));
    assert_eq!(eval("7.5 div 2"), Value::Integer(3));
}

#[test]
fn test_float_div() {
    assert!((eval_real("20 / 7") - 2.857142857142857).abs() < 1e-12);
    assert!((eval_real("20 / 7 + 3.14") - 5.997142857142857).abs() < 1e-12);
    assert_eq!(eval("10 / 4"), Value::Real(2.5));
}

#[test]
fn test_real_promotion() {
    assert_eq!(eval("1 + 0.5"), Value::Real(1.5));
    assert_eq!(eval("2.0 * 3"), Value::Real(6.0));
}

#[test]
fn test_part10_program() {
    let interpreter = run(r#"
PROGRAM Part10;
VAR
   number     : INTEGER;
   a, b, c, x : INTEGER;
   y          : REAL;

BEGIN {Part10}
   BEGIN
      number := 2;
      a := number;
      b := 10 * a + 10 * number DIV 4;
      c := a - - b
   END;
   x := 11;
   y := 20 / 7 + 3.14;
END.  {Part10}
"#)
    .unwrap();
    let store = interpreter.store();
    assert_eq!(store.get("NUMBER"), Some(Value::Integer(2)));
    assert_eq!(store.get("a"), Some(Value::Integer(2)));
    assert_eq!(store.get("b"), Some(Value::Integer(25)));
    assert_eq!(store.get("c"), Some(Value::Integer(27)));
    assert_eq!(store.get("x"), Some(Value::Integer(11)));
    let y = store.get("y").unwrap().as_f64();
    assert!((y - 5.997142857142857).abs() < 1e-12);
}

#[test]
fn test_store_display_in_assignment_order() {
    let interpreter = run("program P; var b, a : integer; begin a := 1; b := a * 2; a := 3 end.").unwrap();
    assert_eq!(interpreter.store().to_string(), "A: 3\nB: 2");
}

#[test]
fn test_procedure_bodies_not_executed() {
    let interpreter = run(
        "program P; var a : integer;
         procedure Q; var hidden : integer; begin hidden := 99 end;
         begin a := 1 end.",
    )
    .unwrap();
    assert!(!interpreter.store().contains("hidden"));
    assert_eq!(interpreter.store().len(), 1);
}

#[test]
fn test_undefined_variable() {
    let err = run("program P; var a, b : integer; begin a := b end.").unwrap_err();
    match err {
        CompileError::UndefinedVariable { name, .. } => assert_eq!(name, "B"),
        other => panic!("Expected an undefined variable error, got {:?}", other),
    }
}

#[test]
fn test_division_by_zero() {
    let err = evaluate_expression("1 div (2 - 2)").unwrap_err();
    assert!(matches!(err, CompileError::DivisionByZero { .. }));
    assert!(err.is_runtime());
    assert_eq!(eval_real("1 / 0"), f64::INFINITY);
}

#[test]
fn test_incomplete_expression() {
    let err = evaluate_expression("1 +").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::UnexpectedToken));
}
