use abacus::{
    error::{Error, RuntimeError},
    interpreter::{Interpreter, value::core::Value},
};
use pretty_assertions::assert_eq;

#[test]
fn redefinition_reuses_the_slot() {
    let mut interpreter = Interpreter::new();
    let first = interpreter.define_function("f", &["x"], "x + 1").unwrap();
    let caller = interpreter.parse("f(1)").unwrap();
    assert_eq!(interpreter.evaluate(&caller).unwrap(), Value::from(2.0));

    let second = interpreter.define_function("f", &["x"], "x * 10").unwrap();
    assert_eq!(first, second);
    assert_eq!(interpreter.evaluate(&caller).unwrap(), Value::from(10.0));
}

#[test]
fn deleted_functions_leave_a_tombstone() {
    let mut interpreter = Interpreter::new();
    let old = interpreter.define_function("f", &["x"], "x").unwrap();
    let caller = interpreter.parse("f(1)").unwrap();
    interpreter.delete_function("f").unwrap();

    assert_eq!(interpreter.function_id("f"), None);
    assert_eq!(interpreter.function(old), None);
    assert!(matches!(interpreter.evaluate(&caller),
                     Err(Error::Runtime(RuntimeError::DeletedFunction { .. }))));

    let new = interpreter.define_function("f", &["x"], "x").unwrap();
    assert_ne!(old, new);
    assert!(matches!(interpreter.evaluate(&caller),
                     Err(Error::Runtime(RuntimeError::DeletedFunction { .. }))));
}

#[test]
fn functions_may_recurse_and_call_each_other() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("fib", &["n"], "{if(n<2){return n};return fib(n-1)+fib(n-2)}")
               .unwrap();
    assert_eq!(interpreter.evaluate_str("fib(10)").unwrap(), Value::from(55.0));

    interpreter.define_function("twice", &["x"], "2 * fib(x)").unwrap();
    assert_eq!(interpreter.evaluate_str("twice(6)").unwrap(), Value::from(16.0));
}

#[test]
fn zero_arity_functions_read_like_names() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("answer", &[], "42").unwrap();
    assert_eq!(interpreter.evaluate_str("answer + 1").unwrap(), Value::from(43.0));
    assert_eq!(interpreter.evaluate_str("answer()").unwrap(), Value::from(42.0));
}

#[test]
fn globals_are_bound_by_slot() {
    let mut interpreter = Interpreter::new();
    let slot = interpreter.set_variable("x", Value::from(3.0)).unwrap();
    let tree = interpreter.parse("x + 1").unwrap();
    assert_eq!(interpreter.evaluate(&tree).unwrap(), Value::from(4.0));

    assert_eq!(interpreter.set_variable("x", Value::from(5.0)).unwrap(), slot);
    assert_eq!(interpreter.evaluate(&tree).unwrap(), Value::from(6.0));
    assert_eq!(interpreter.variable("x"), Some(&Value::from(5.0)));
}

#[test]
fn deleted_globals_fail_at_evaluation() {
    let mut interpreter = Interpreter::new();
    let old = interpreter.set_variable("x", Value::from(3.0)).unwrap();
    let tree = interpreter.parse("x + 1").unwrap();
    assert_eq!(interpreter.delete_variable("x").unwrap(), Value::from(3.0));

    assert_eq!(interpreter.variable("x"), None);
    assert!(matches!(interpreter.evaluate(&tree),
                     Err(Error::Runtime(RuntimeError::DeletedVariable { .. }))));

    let new = interpreter.set_variable("x", Value::from(1.0)).unwrap();
    assert_ne!(old, new);
    assert!(interpreter.delete_variable("missing").is_err());
}

#[test]
fn globals_hold_closures() {
    let mut interpreter = Interpreter::new();
    interpreter.execute("double = n => 2 * n").unwrap();
    assert_eq!(interpreter.evaluate_str("double(21)").unwrap(), Value::from(42.0));
}

#[test]
fn reserved_names_are_rejected() {
    let mut interpreter = Interpreter::new();
    assert!(interpreter.define_function("sin", &["x"], "x").is_err());
    assert!(interpreter.define_function("if", &["x"], "x").is_err());
    assert!(interpreter.define_function("f", &["while"], "1").is_err());
    assert!(interpreter.define_function("f", &["x", "x"], "x").is_err());
    assert!(interpreter.set_variable("pi", Value::from(3.0)).is_err());
}

#[test]
fn execute_dispatches_on_line_shape() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.execute("# comment").unwrap(), None);
    assert_eq!(interpreter.execute("   ").unwrap(), None);
    assert_eq!(interpreter.execute("area(w, h) = w * h").unwrap(), None);
    assert_eq!(interpreter.execute("side = 4").unwrap(), Some(Value::from(4.0)));
    assert_eq!(interpreter.execute("area(side, 2)").unwrap(), Some(Value::from(8.0)));
    assert_eq!(interpreter.execute("delete side").unwrap(), None);
    assert_eq!(interpreter.execute("delete area").unwrap(), None);
    assert!(interpreter.execute("area(1, 2)").is_err());
    assert!(interpreter.execute("1 + 1 = 2").is_err());
}
