use abacus::{
    ast::Action,
    error::{Error, ParseError, RuntimeError},
    interpreter::{Interpreter, value::core::Value},
};
use pretty_assertions::assert_eq;

fn call(params: &[&str], body: &str, call: &str) -> Value {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("f", params, body)
               .unwrap_or_else(|e| panic!("'{body}' failed to parse: {e}"));
    interpreter.evaluate_str(call)
               .unwrap_or_else(|e| panic!("'{call}' failed: {e}"))
}

fn definition_error(params: &[&str], body: &str) -> Error {
    let mut interpreter = Interpreter::new();
    match interpreter.define_function("f", params, body) {
        Ok(_) => panic!("'{body}' was expected to be rejected"),
        Err(e) => e,
    }
}

#[test]
fn falling_through_returns_zero() {
    assert_eq!(call(&["x"], "{y = x * 2}", "f(3)"), Value::from(0.0));
}

#[test]
fn arguments_can_be_assigned() {
    assert_eq!(call(&["x"], "{x = x + 1; return x}", "f(1)"), Value::from(2.0));
}

#[test]
fn break_leaves_the_innermost_loop() {
    let body = "{i = 0; total = 0; while (i < n) { j = 0; while (1) { j = j + 1; if (j >= i) break; }; total = total + j; i = i + 1 }; return total}";
    // 1 + 1 + 2 + 3 + 4
    assert_eq!(call(&["n"], body, "f(5)"), Value::from(11.0));
}

#[test]
fn continue_rechecks_the_condition() {
    let body = "{i = 0; t = 0; while (i < n) { i = i + 1; if (i % 2 == 0) continue; t = t + i }; return t}";
    assert_eq!(call(&["n"], body, "f(5)"), Value::from(9.0));
}

#[test]
fn else_if_chains() {
    let body = "{if (x < 0) { return -1 } else if (x == 0) { return 0 } else { return 1 }}";
    assert_eq!(call(&["x"], body, "f(-3)"), Value::from(-1.0));
    assert_eq!(call(&["x"], body, "f(0)"), Value::from(0.0));
    assert_eq!(call(&["x"], body, "f(8)"), Value::from(1.0));
}

#[test]
fn else_after_separator() {
    let body = "{if (x) { y = 1 }; else { y = 2 }; return 0}";
    assert_eq!(call(&["x"], body, "f(0)"), Value::from(0.0));
}

#[test]
fn return_inside_a_loop_leaves_the_function() {
    let body = "{i = 0; while (1) { i = i + 1; if (i * i > n) { return i } }}";
    assert_eq!(call(&["n"], body, "f(10)"), Value::from(4.0));
}

#[test]
fn nested_blocks_share_the_frame() {
    let body = "{t = 1; if (x > 0) { t = t + x; u = 2; t = t * u }; return t}";
    assert_eq!(call(&["x"], body, "f(4)"), Value::from(10.0));
}

#[test]
fn locals_are_scoped_to_their_block() {
    let error = definition_error(&["x"], "{if (x > 0) { y = 1 }; return y}");
    assert!(matches!(error, Error::Parse(ParseError::UnknownName { ref name, .. }) if name == "y"));

    let error = definition_error(&["x"], "{while (x > 0) { z = x; x = x - 1 }; return z}");
    assert!(matches!(error, Error::Parse(ParseError::UnknownName { .. })));
}

#[test]
fn sibling_blocks_reuse_released_slots() {
    let mut interpreter = Interpreter::new();
    let body = "{t = 0; if (x > 0) { a = x; t = a }; if (x > 1) { b = 2 * x; t = t + b }; return t}";
    let id = interpreter.define_function("f", &["x"], body).unwrap();
    let function = interpreter.function(id).unwrap();

    let blocks = function.body
                         .actions
                         .iter()
                         .filter_map(|action| match action {
                             Action::If { body, .. } => Some((body.first_slot, body.locals.clone())),
                             _ => None,
                         })
                         .collect::<Vec<_>>();
    assert_eq!(blocks, vec![(1, vec!["a".to_string()]), (1, vec!["b".to_string()])]);
    assert_eq!(function.body.frame_size, 2);

    assert_eq!(interpreter.evaluate_str("f(3)").unwrap(), Value::from(9.0));
    assert_eq!(interpreter.evaluate_str("f(1)").unwrap(), Value::from(1.0));
}

#[test]
fn structural_errors() {
    assert!(matches!(definition_error(&["x"], "{else { return 1 }}"),
                     Error::Parse(ParseError::DanglingElse { .. })));
    assert!(matches!(definition_error(&["x"], "{x = 1; else { x = 2 }}"),
                     Error::Parse(ParseError::DanglingElse { .. })));
    assert!(matches!(definition_error(&["x"], "{break}"), Error::Parse(ParseError::IllegalBreak { .. })));
    assert!(matches!(definition_error(&["x"], "{if (x) { continue }}"),
                     Error::Parse(ParseError::IllegalContinue { .. })));
    assert!(matches!(definition_error(&["x"], "{return x; x = 2}"),
                     Error::Parse(ParseError::StatementAfterReturn { .. })));
    assert!(matches!(definition_error(&["while"], "1"),
                     Error::Parse(ParseError::ReservedName { .. })));
}

#[test]
fn loops_inside_closures() {
    let interpreter = Interpreter::new();
    let value = interpreter.evaluate_str("run(n=>{out=0;while(n>0){out=out+1;n=n-1};return out;},3)")
                           .unwrap();
    assert_eq!(value, Value::from(3.0));
}

#[test]
fn closures_capture_locals() {
    let body = "{k = x + 1; g = n => n * k; return run(g, 2)}";
    assert_eq!(call(&["x"], body, "f(4)"), Value::from(10.0));
}

#[test]
fn runaway_loops_are_runtime_errors() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("spin", &[], "{while (1) {}}").unwrap();
    assert!(matches!(interpreter.evaluate_str("spin()"),
                     Err(Error::Runtime(RuntimeError::InfiniteLoop { limit: 100_000 }))));
}
