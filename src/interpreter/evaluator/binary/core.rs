use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{
        builtin::Builtin,
        evaluator::{
            binary::{bignum::bignum_binary, vector::vector_binary},
            core::EvalResult,
            utils::type_error,
        },
        value::{
            core::{Kind, KindSet, Value},
            number::Number,
        },
    },
};

/// Evaluates an arithmetic builtin on two values.
///
/// Numbers combine directly, vectors broadcast, bignums promote the other
/// side, and `+` on two strings concatenates. An owned left operand is
/// reused for the result where the shapes allow it.
///
/// # Example
/// ```
/// use std::borrow::Cow;
///
/// use abacus::interpreter::{
///     builtin::Builtin,
///     evaluator::binary::core::binary,
///     value::core::Value,
/// };
///
/// let sum = binary(Builtin::Add, Cow::Owned(Value::from(2.0)), Cow::Owned(Value::from(3.0)));
/// assert_eq!(sum.unwrap(), Value::from(5.0));
///
/// let text = binary(Builtin::Add,
///                   Cow::Owned(Value::String("ab".into())),
///                   Cow::Owned(Value::String("cd".into())));
/// assert_eq!(text.unwrap(), Value::String("abcd".into()));
/// ```
pub fn binary(op: Builtin, left: Cow<'_, Value>, right: Cow<'_, Value>) -> EvalResult<Value> {
    match (left.kind(), right.kind()) {
        (Kind::String, _) | (_, Kind::String) => concatenate(op, left, right),
        (Kind::Bignum, _) | (_, Kind::Bignum) => bignum_binary(op, &left, &right),
        _ => vector_binary(op, left, right),
    }
}

/// Applies an arithmetic builtin to two numbers.
pub fn number_binary(op: Builtin, left: Number, right: Number) -> EvalResult<Number> {
    match op {
        Builtin::Add => left.checked_add(right),
        Builtin::Sub => left.checked_sub(right),
        Builtin::Mul => Ok(left * right),
        Builtin::Div => left.checked_div(right),
        Builtin::Mod => left.checked_rem(right),
        Builtin::Pow => Ok(left.pow(right)),
        Builtin::Atan2 => Ok(left.atan2(right)),
        Builtin::And => Ok(left.bitwise(right, |a, b| a & b)),
        Builtin::Or => Ok(left.bitwise(right, |a, b| a | b)),
        Builtin::Xor => Ok(left.bitwise(right, |a, b| a ^ b)),
        other => Err(RuntimeError::InvalidArgument { details: format!("'{}' is not an arithmetic operator", other.name()) }),
    }
}

/// String concatenation; both sides must be strings.
fn concatenate(op: Builtin, left: Cow<'_, Value>, right: Cow<'_, Value>) -> EvalResult<Value> {
    if op != Builtin::Add {
        let (position, found) = if left.as_str().is_some() { (1, &left) } else { (2, &right) };
        return Err(type_error(op.name(), position, op.def().kinds[0], found));
    }
    let Some(suffix) = right.as_str() else {
        return Err(type_error(op.name(), 2, KindSet::STRING, &right));
    };
    match left.into_owned() {
        Value::String(mut text) => {
            text.push_str(suffix);
            Ok(Value::String(text))
        },
        other => Err(type_error(op.name(), 1, KindSet::STRING, &other)),
    }
}
