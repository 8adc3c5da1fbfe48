use abacus::{
    error::{Error, RuntimeError},
    interpreter::{Interpreter, value::core::Value},
};
use pretty_assertions::assert_eq;

/// Defines `f(x) = body`, registers its derivative as `df` and evaluates
/// `df(at)`.
fn derivative_at(body: &str, at: f64) -> Value {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("f", &["x"], body).unwrap();
    interpreter.define_derivative("f", "df").unwrap();
    interpreter.call_function("df", vec![Value::from(at)]).unwrap()
}

fn assert_close(value: &Value, expected: f64) {
    let n = value.as_number()
                 .unwrap_or_else(|| panic!("{value} is not a number"));
    assert!((n.real - expected).abs() < 1e-9 && n.imag.abs() < 1e-9,
            "{value} is not close to {expected}");
}

#[test]
fn square() {
    assert_eq!(derivative_at("x^2", 3.0), Value::from(6.0));
}

#[test]
fn sine() {
    assert_eq!(derivative_at("sin(x)", 0.0), Value::from(1.0));
}

#[test]
fn polynomial() {
    // 3x^2 + 4x - 1
    assert_close(&derivative_at("x^3 + 2*x^2 - x + 7", 2.0), 19.0);
}

#[test]
fn product_and_quotient_rules() {
    assert_close(&derivative_at("x * exp(x)", 0.0), 1.0);
    assert_close(&derivative_at("1 / x", 2.0), -0.25);
    assert_close(&derivative_at("ln(x) / x", 1.0), 1.0);
}

#[test]
fn chain_rule() {
    // 2x cos(x^2)
    assert_close(&derivative_at("sin(x^2)", 1.0), 2.0 * 1.0_f64.cos());
    assert_close(&derivative_at("sqrt(x)", 4.0), 0.25);
    assert_close(&derivative_at("log(x)", 10.0), 1.0 / (10.0 * std::f64::consts::LN_10));
}

#[test]
fn general_power_rule() {
    // d(2^x) = 2^x ln 2
    assert_close(&derivative_at("2^x", 3.0), 8.0 * 2.0_f64.ln());
    // d(x^x) = x^x (ln x + 1)
    assert_close(&derivative_at("x^x", 2.0), 4.0 * (2.0_f64.ln() + 1.0));
}

#[test]
fn rounding_functions_are_flat() {
    assert_eq!(derivative_at("floor(x) + round(x)", 2.4), Value::from(0.0));
}

#[test]
fn other_arguments_are_constants() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("g", &["x", "a"], "a * x^2").unwrap();
    interpreter.define_derivative("g", "dg").unwrap();
    let value = interpreter.evaluate_str("dg(3, 5)").unwrap();
    assert_eq!(value, Value::from(30.0));
}

#[test]
fn derivative_is_simplified() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("f", &["x"], "x * 3 + 0 * x").unwrap();
    let tree = interpreter.derive("f").unwrap();
    assert_eq!(interpreter.render(&tree), "3");
}

#[test]
fn closures_are_not_differentiable() {
    let interpreter = Interpreter::new();
    let tree = interpreter.parse("x => x^2").unwrap();
    assert!(matches!(interpreter.differentiate(&tree),
                     Err(Error::Runtime(RuntimeError::NotDifferentiable { .. }))));
}

#[test]
fn modulo_and_code_blocks_are_not_differentiable() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("m", &["x"], "x % 2").unwrap();
    interpreter.define_function("b", &["x"], "{y = x; return y}").unwrap();
    for name in ["m", "b"] {
        assert!(matches!(interpreter.derive(name),
                         Err(Error::Runtime(RuntimeError::NotDifferentiable { .. }))),
                "{name}");
    }
}

#[test]
fn custom_calls_are_not_differentiable() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("sq", &["x"], "x^2").unwrap();
    interpreter.define_function("f", &["x"], "sq(x) + 1").unwrap();
    assert!(matches!(interpreter.define_derivative("f", "df"),
                     Err(Error::Runtime(RuntimeError::NotDifferentiable { .. }))));
}
