use std::borrow::Cow;

use crate::interpreter::{
    builtin::Builtin,
    evaluator::{core::EvalResult, utils::type_error},
    value::core::{KindSet, Value},
};

/// Arithmetic negation of a number, every cell of a vector, or a bignum.
///
/// An owned vector is negated in place.
///
/// # Example
/// ```
/// use std::borrow::Cow;
///
/// use abacus::interpreter::{evaluator::unary::negate, value::core::Value};
///
/// let v = negate(Cow::Owned(Value::from(5.0))).unwrap();
/// assert_eq!(v, Value::from(-5.0));
/// ```
pub fn negate(value: Cow<'_, Value>) -> EvalResult<Value> {
    match value.into_owned() {
        Value::Number(n) => Ok(Value::Number(-n)),
        Value::Vector(mut v) => {
            v.try_map_in_place(|cell| Ok(-cell))?;
            Ok(Value::Vector(v))
        },
        Value::Bignum(b) => Ok(Value::Bignum(b.neg())),
        other => Err(type_error(Builtin::Negate.name(), 1, KindSet::NUMERIC, &other)),
    }
}
