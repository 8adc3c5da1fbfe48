use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{
        builtin::Builtin,
        evaluator::{core::EvalResult, utils::type_error},
        value::{
            bignum::Bignum,
            core::{KindSet, Value},
        },
    },
    util::num::f64_to_i64_checked,
};

const BIGNUM_OPERAND: KindSet = KindSet::NUMBER.union(KindSet::BIGNUM);

/// Arithmetic where at least one side is a bignum.
///
/// A number on the other side is converted exactly at the bignum's
/// precision. Powers need an integer exponent.
///
/// # Example
/// ```
/// use abacus::interpreter::Interpreter;
///
/// let interpreter = Interpreter::new();
/// let power = interpreter.evaluate_str("big(2) ^ 100").unwrap();
/// assert_eq!(interpreter.format_value(&power), "1267650600228229401496703205376");
/// ```
pub fn bignum_binary(op: Builtin, left: &Value, right: &Value) -> EvalResult<Value> {
    let a = promote(op, left, right, 1)?;
    if op == Builtin::Pow {
        let exponent = match right {
                           Value::Number(n) => Some(*n),
                           Value::Bignum(b) => Some(b.to_number()),
                           _ => None,
                       }.filter(|n| n.is_real() && n.real.fract() == 0.0)
                        .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("bignum powers need an integer exponent, found {right}") })?;
        return a.powi(f64_to_i64_checked(exponent.real)?).map(Value::Bignum);
    }

    let b = promote(op, right, left, 2)?;
    let result = match op {
        Builtin::Add => a.add(&b)?,
        Builtin::Sub => a.sub(&b)?,
        Builtin::Mul => a.mul(&b),
        Builtin::Div => a.div(&b)?,
        _ => {
            let found = if matches!(left, Value::Bignum(_)) { left } else { right };
            let position = if matches!(left, Value::Bignum(_)) { 1 } else { 2 };
            return Err(type_error(op.name(), position, KindSet::ELEMENTWISE, found));
        },
    };
    Ok(Value::Bignum(result))
}

/// The operand as a bignum, converting a number at the precision of the
/// other operand.
fn promote<'v>(op: Builtin, value: &'v Value, other: &Value, position: usize) -> EvalResult<Cow<'v, Bignum>> {
    match (value, other) {
        (Value::Bignum(b), _) => Ok(Cow::Borrowed(b)),
        (Value::Number(n), Value::Bignum(reference)) => {
            Bignum::from_number(*n, reference.precision())
                .map(Cow::Owned)
                .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("{n} has no exact bignum value") })
        },
        _ => Err(type_error(op.name(), position, BIGNUM_OPERAND, value)),
    }
}
