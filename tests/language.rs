use abacus::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{Interpreter, config::Config, value::unit_table::UnitTable},
};
use pretty_assertions::assert_eq;

fn assert_value(src: &str, expected: &str) {
    let interpreter = Interpreter::new();
    let value = interpreter.evaluate_str(src)
                           .unwrap_or_else(|e| panic!("'{src}' failed: {e}"));
    let expected = interpreter.evaluate_str(expected)
                              .unwrap_or_else(|e| panic!("expected value '{expected}' failed: {e}"));
    assert_eq!(value, expected, "'{src}'");
}

fn assert_failure(src: &str) -> Error {
    match Interpreter::new().evaluate_str(src) {
        Ok(value) => panic!("'{src}' succeeded with {value} but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn basic_arithmetic() {
    assert_value("1+4", "5");
    assert_value("3^4", "81");
    assert_value("3**4", "81");
    assert_value("7 % 3", "1");
    assert_value("10 / 4", "2.5");
    assert_value("2(3+4)", "14");
}

#[test]
fn precedence_and_negation() {
    assert_value("-2^2", "0-4");
    assert_value("-2+3", "0-5");
    assert_value("-(2)+3", "0-5");
    assert_value("-2*3+1", "0-7");
    assert_value("-1 < 2", "0-1");
    assert_value("(-2)+3", "1");
    assert_value("2*-3", "0-6");
    assert_value("1+-2*3", "0-5");
    assert_value("2^-1", "0.5");
    assert_value("1 + 2 * 3 ^ 2", "19");
    assert_value("1 + 2 < 4", "1");
}

#[test]
fn operator_errors() {
    assert!(matches!(assert_failure("*2"), Error::Parse(ParseError::MissingOperand { .. })));
    assert!(matches!(assert_failure("2+"), Error::Parse(ParseError::MissingOperand { .. })));
    assert!(matches!(assert_failure("2 +* 3"), Error::Parse(ParseError::InvalidOperator { .. })));
    assert!(matches!(assert_failure(""), Error::Parse(ParseError::EmptyExpression { .. })));
    assert!(matches!(assert_failure("(1+2"), Error::Parse(ParseError::BracketMismatch { .. })));
}

#[test]
fn complex_numbers() {
    assert_value("i^2", "0-1");
    assert_value("(1+2i)*(1-2i)", "5");
    assert_value("re(3+4i) + im(3+4i)", "7");
    assert_value("abs(3+4i)", "5");
}

#[test]
fn number_bases() {
    assert_value("0x1f", "31");
    assert_value("0b101", "5");
    assert_value("[11]_2", "3");
    assert_value("[1f]_16", "31");
    assert_value("2e3", "2000");
}

#[test]
fn invalid_bases() {
    assert!(matches!(assert_failure("[11]_1"), Error::Parse(ParseError::InvalidBase { .. })));
    assert!(matches!(assert_failure("[11]_37"), Error::Parse(ParseError::InvalidBase { .. })));
}

#[test]
fn base_may_not_reference_the_frame() {
    let mut interpreter = Interpreter::new();
    let error = interpreter.define_function("f", &["b"], "[11]_b").unwrap_err();
    assert!(matches!(error, Error::Parse(ParseError::BaseReferencesFrame { .. })));
}

#[test]
fn vectors() {
    assert_value("transpose(<1,2;3,4>)", "<1,3;2,4>");
    assert_value("<1,2;3,4> * 2", "<2,4;6,8>");
    assert_value("<1,2> + <10>", "<11,2>");
    assert_value("<1,2,3> * <2,2>", "<2,4>");
    assert_value("1 + <1,2>", "<2,2>");
    assert_value("<1,,3>", "<1,0,3>");
    assert_value("<1,2;3>", "<1,2;3,0>");
    assert_value("<1;2,3,4>", "<1,0,0;2,3,4>");
    assert_value("sum(<1,2;3,4>)", "10");
    assert_value("width(<1,2,3>) + height(<1;2>)", "5");
    assert_value("get(<1,2;3,4>, 0, 1)", "3");
    assert_value("fill(7, 2, 2)", "<7,7;7,7>");
    assert_value("ident(2)", "<1,0;0,1>");
    assert_value("mmul(<1,2;3,4>, <5;6>)", "<17;39>");
    assert_value("det(<2,0;0,3>)", "6");
}

#[test]
fn vector_shape() {
    let value = Interpreter::new().evaluate_str("<1,2,3;4,5,6>").unwrap();
    let vector = value.as_vector().unwrap();
    assert_eq!((vector.width(), vector.height()), (3, 2));
}

#[test]
fn vector_errors() {
    assert!(matches!(assert_failure("get(<1,2>, 5, 0)"),
                     Error::Runtime(RuntimeError::IndexOutOfBounds { .. })));
    assert!(matches!(assert_failure("det(<1,2,3>)"), Error::Runtime(RuntimeError::ShapeMismatch { .. })));
    assert!(matches!(assert_failure("mmul(<1,2>, <1,2>)"),
                     Error::Runtime(RuntimeError::ShapeMismatch { .. })));
}

#[test]
fn comparisons() {
    assert_value("2 == 2", "1");
    assert_value("2 != 2", "0");
    assert_value("3 >= 4", "0");
    assert_value("\"abc\" == \"abc\"", "1");
    assert_value("\"abc\" < \"abcd\"", "1");

    // Ordering compares flattened sums, equality compares structure.
    assert_value("<1,2> == 3", "0");
    assert_value("<1,2> <= 3", "1");
    assert_value("<1,2> >= 3", "1");
    assert_value("<1,2> < 3", "0");
}

#[test]
fn strings() {
    assert_value("\"ab\" + \"cd\"", "\"abcd\"");
    assert_value("substr(\"abacus\", 1, 3)", "\"bac\"");
    assert_value("length(\"abacus\")", "6");
    assert_value("str(42) + \"!\"", "\"42!\"");
    assert_value("num(\" 2.5 \") * 2", "5");

    let error = assert_failure("substr(\"abc\", 5, 2)");
    assert!(matches!(error, Error::Runtime(RuntimeError::IndexOutOfBounds { max: 3, found: 5 })));
    let error = assert_failure("substr(\"abc\", 2, 5)");
    assert!(matches!(error, Error::Runtime(RuntimeError::InvalidArgument { .. })));
    assert!(error.to_string().contains("5 characters from offset 2"), "{error}");
    assert_value("substr(\"abc\", 3, 0)", "\"\"");
}

#[test]
fn min_max_and_math() {
    assert_value("max(3, 9, 4)", "9");
    assert_value("min(3, 9, 4)", "3");
    assert_value("floor(2.7) + ceil(2.2) + round(2.5) + trunc(-2.7)", "6");
    assert_value("sqrt(16) + cbrt(27)", "7");
    assert_value("and(12, 10) + or(12, 10) + xor(12, 10)", "28");
    assert_value("sin(0) + cos(0)", "1");
}

#[test]
fn bignums() {
    let interpreter = Interpreter::new();
    let value = interpreter.evaluate_str("big(2)^100").unwrap();
    assert_eq!(interpreter.format_value(&value), "1267650600228229401496703205376");

    let value = interpreter.evaluate_str("big(\"12345678901234567890\") + 1").unwrap();
    assert_eq!(interpreter.format_value(&value), "12345678901234567891");

    assert_value("num(big(3) * 4)", "12");
    assert!(matches!(assert_failure("big(2) ^ 0.5"), Error::Runtime(_)));
}

#[test]
fn closures() {
    assert_value("run(n=>n+1, 4)", "5");
    assert_value("run((a, b)=>a*b, 3, 4)", "12");
    assert_value("run(n=>{out=0;while(n>0){out=out+1;n=n-1};return out;},3)", "3");
    assert_value("run(\"max\", 2, 9, 4)", "9");
}

#[test]
fn closures_capture_the_frame() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("adder", &["k"], "n => n + k").unwrap();
    assert_eq!(interpreter.evaluate_str("run(adder(2), 5)").unwrap(),
               interpreter.evaluate_str("7").unwrap());
}

#[test]
fn closures_check_their_argument_count() {
    assert!(matches!(assert_failure("run(n=>n, 1, 2)"),
                     Error::Runtime(RuntimeError::ArgumentCountMismatch { .. })));
    assert!(matches!(assert_failure("run(\"nothing\", 1)"),
                     Error::Runtime(RuntimeError::UnknownFunction { .. })));
}

#[test]
fn wrong_builtin_arity_fails_at_parse_time() {
    let interpreter = Interpreter::new();
    for src in ["sin(1, 2)", "transpose()", "get(<1>, 0)", "min()"] {
        let error = interpreter.parse(src).unwrap_err();
        assert!(matches!(error, Error::Parse(ParseError::ArityMismatch { .. })),
                "'{src}' gave {error:?}");
    }
}

#[test]
fn wrong_argument_kind_is_a_type_error() {
    assert!(matches!(assert_failure("sin(\"x\")"), Error::Runtime(RuntimeError::TypeError { .. })));
    assert!(matches!(assert_failure("det(\"ab\")"), Error::Runtime(RuntimeError::TypeError { .. })));
}

#[test]
fn unknown_names() {
    assert!(matches!(assert_failure("y + 1"), Error::Parse(ParseError::UnknownName { .. })));
    assert!(matches!(assert_failure("nope(1)"), Error::Parse(ParseError::UnknownFunction { .. })));
}

#[test]
fn unknown_unit_is_named() {
    let interpreter = Interpreter::new().with_units(UnitTable::empty());
    let error = interpreter.evaluate_str("[10kg]").unwrap_err();
    match &error {
        Error::Parse(ParseError::UnknownUnit { name, .. }) => assert_eq!(name, "kg"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(error.to_string().contains("kg"));
}

#[test]
fn infinite_loops_are_stopped() {
    let config = Config { max_loop_iterations: 50,
                          ..Config::default() };
    let interpreter = Interpreter::new().with_config(config);
    let error = interpreter.evaluate_str("run(()=>{while(1){}})").unwrap_err();
    assert_eq!(error, Error::Runtime(RuntimeError::InfiniteLoop { limit: 50 }));
    assert!(error.to_string().starts_with("infinite loop detected"));
}

#[test]
fn loops_below_the_limit_complete() {
    let config = Config { max_loop_iterations: 10,
                          ..Config::default() };
    let mut interpreter = Interpreter::new().with_config(config);
    interpreter.define_function("count", &["n"], "{c=0;while(c<n){c=c+1};return c}")
               .unwrap();
    assert_eq!(interpreter.evaluate_str("count(10)").unwrap(),
               interpreter.evaluate_str("10").unwrap());
    assert!(matches!(interpreter.evaluate_str("count(11)"),
                     Err(Error::Runtime(RuntimeError::InfiniteLoop { .. }))));
}

#[test]
fn print_goes_to_the_sink() {
    use std::{cell::RefCell, rc::Rc};

    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    let interpreter = Interpreter::new().with_printer(move |text| sink.borrow_mut().push(text.to_string()));
    interpreter.evaluate_str("print(<1,2>) + 0").unwrap();
    interpreter.evaluate_str("print(\"done\")").unwrap();
    assert_eq!(*lines.borrow(), vec!["<1, 2>".to_string(), "done".to_string()]);
}

#[test]
fn try_parse_discards_errors() {
    let interpreter = Interpreter::new();
    assert!(interpreter.try_parse("1 +").is_none());
    assert!(interpreter.try_parse("1 + 1").is_some());
}
