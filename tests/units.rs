use abacus::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        Interpreter,
        value::{core::Value, unit::Unit, unit_table::UnitTable},
    },
};
use pretty_assertions::assert_eq;

fn show(src: &str) -> String {
    let interpreter = Interpreter::new();
    let value = interpreter.evaluate_str(src)
                           .unwrap_or_else(|e| panic!("'{src}' failed: {e}"));
    interpreter.format_value(&value)
}

#[test]
fn units_attach_to_numbers() {
    assert_eq!(show("[5m]"), "5 m");
    assert_eq!(show("[3m] / [2s]"), "1.5 m*s^-1");
    assert_eq!(show("[2kg] * [3m] / [1s]^2"), "6 m*kg*s^-2");
    assert_eq!(show("[4m]^2"), "16 m^2");
}

#[test]
fn exponent_lanes_wrap_around() {
    assert_eq!(show("[1m]^200"), "1 m^-56");
    assert_eq!(show("[1m]^127 * [1m]"), "1 m^-128");
    assert_eq!(show("[1m]^128 * [1m]^128"), "1");
}

#[test]
fn prefixes_scale_the_value() {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.evaluate_str("[1km] == [1000m]").unwrap(), Value::from(true));
    assert_eq!(interpreter.evaluate_str("[1kg] == [1000g]").unwrap(), Value::from(true));
    assert_eq!(show("[2min]"), "120 s");
}

#[test]
fn addition_requires_matching_units() {
    assert_eq!(show("[5m] + [3m]"), "8 m");
    let error = Interpreter::new().evaluate_str("[1m] + [1s]").unwrap_err();
    assert!(matches!(error, Error::Runtime(RuntimeError::UnitMismatch { .. })));
}

#[test]
fn dimensionless_operands_adopt_the_other_unit() {
    assert_eq!(show("[5m] + 1"), "6 m");
    assert_eq!(show("2 * [3s]"), "6 s");
}

#[test]
fn units_are_only_read_inside_square_groups() {
    let error = Interpreter::new().evaluate_str("5m").unwrap_err();
    assert!(matches!(error, Error::Parse(ParseError::UnknownName { .. })));
}

#[test]
fn custom_unit_tables() {
    let mut table = UnitTable::empty();
    table.insert("ft", 0.3048, Unit::base(0));
    let interpreter = Interpreter::new().with_units(table);
    assert_eq!(interpreter.evaluate_str("[10ft] == 10 * [ft]").unwrap(), Value::from(true));
    assert!(matches!(interpreter.evaluate_str("[1m]"),
                     Err(Error::Parse(ParseError::UnknownUnit { .. }))));
}

#[test]
fn unit_rendering_order_follows_the_lanes() {
    let table = UnitTable::si();
    let (_, joule) = table.lookup("J").unwrap();
    assert_eq!(joule.to_string(), "m^2*kg*s^-2");
    let (scale, _) = table.lookup("mJ").unwrap();
    assert_eq!(scale, 1e-3);
}
