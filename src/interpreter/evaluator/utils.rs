use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{
        builtin::Builtin,
        evaluator::core::EvalResult,
        value::{
            core::{KindSet, Value},
            vector::Vector,
        },
    },
    util::num::f64_to_usize_checked,
};

/// A type error for argument `position` (one-based) of `function`.
#[must_use]
pub fn type_error(function: &str, position: usize, expected: KindSet, found: &Value) -> RuntimeError {
    RuntimeError::TypeError { function: function.to_string(),
                              position,
                              expected,
                              found: found.kind() }
}

/// Splits an argument list into exactly `N` values.
pub fn take_args<T, const N: usize>(op: Builtin, args: Vec<T>) -> EvalResult<[T; N]> {
    args.try_into().map_err(|args: Vec<T>| RuntimeError::ArgumentCountMismatch { name:     op.name().to_string(),
                                                                                 expected: N,
                                                                                 found:    args.len(), })
}

/// The value as a matrix; a number counts as `1 x 1`.
pub fn as_matrix<'v>(value: &'v Value, function: &str, position: usize) -> EvalResult<Cow<'v, Vector>> {
    match value {
        Value::Vector(v) => Ok(Cow::Borrowed(v)),
        Value::Number(n) => Ok(Cow::Owned(Vector::scalar(*n))),
        other => Err(type_error(function, position, KindSet::ELEMENTWISE, other)),
    }
}

/// Moves the vector out of a value.
pub fn into_vector(value: Cow<'_, Value>) -> Option<Cow<'_, Vector>> {
    match value {
        Cow::Owned(Value::Vector(v)) => Some(Cow::Owned(v)),
        Cow::Borrowed(Value::Vector(v)) => Some(Cow::Borrowed(v)),
        _ => None,
    }
}

/// Reads a non-negative integer argument, such as an index or a dimension.
pub fn index_arg(value: &Value, function: &str, position: usize) -> EvalResult<usize> {
    let number = value.as_number()
                      .ok_or_else(|| type_error(function, position, KindSet::NUMBER, value))?;
    if !number.is_real() || number.real.fract() != 0.0 || number.real < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("{function} expects a non-negative integer at position {position}, found {number}") });
    }
    f64_to_usize_checked(number.real)
}
