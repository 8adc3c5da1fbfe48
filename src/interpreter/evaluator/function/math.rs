use std::borrow::Cow;

use crate::interpreter::{
    builtin::Builtin,
    evaluator::{core::EvalResult, utils::type_error},
    value::{
        core::{KindSet, Value},
        number::Number,
    },
};

/// The numeric function behind a one-argument elementwise builtin.
///
/// `abs`, `re` and `im` keep the unit of their argument; the rounding
/// functions apply to both parts. Returns `None` for builtins that are not
/// elementwise.
///
/// # Example
/// ```
/// use abacus::interpreter::{
///     builtin::Builtin,
///     evaluator::function::math::unary_function,
///     value::number::Number,
/// };
///
/// let floor = unary_function(Builtin::Floor).unwrap();
/// assert_eq!(floor(Number::new(2.5, -1.5)), Number::new(2.0, -2.0));
/// assert!(unary_function(Builtin::Add).is_none());
/// ```
#[must_use]
pub fn unary_function(op: Builtin) -> Option<fn(Number) -> Number> {
    let f: fn(Number) -> Number = match op {
        Builtin::Sin => Number::sin,
        Builtin::Cos => Number::cos,
        Builtin::Tan => Number::tan,
        Builtin::Asin => Number::asin,
        Builtin::Acos => Number::acos,
        Builtin::Atan => Number::atan,
        Builtin::Sinh => Number::sinh,
        Builtin::Cosh => Number::cosh,
        Builtin::Tanh => Number::tanh,
        Builtin::Asinh => Number::asinh,
        Builtin::Acosh => Number::acosh,
        Builtin::Atanh => Number::atanh,
        Builtin::Ln => Number::ln,
        Builtin::Log => Number::log10,
        Builtin::Exp => Number::exp,
        Builtin::Sqrt => Number::sqrt,
        Builtin::Cbrt => Number::cbrt,
        Builtin::Abs => |n: Number| Number::real(n.abs()).with_unit(n.unit),
        Builtin::Floor => |n: Number| n.map_parts(f64::floor),
        Builtin::Ceil => |n: Number| n.map_parts(f64::ceil),
        Builtin::Round => |n: Number| n.map_parts(f64::round),
        Builtin::Trunc => |n: Number| n.map_parts(f64::trunc),
        Builtin::Sgn => Number::signum,
        Builtin::Re => |n: Number| Number::real(n.real).with_unit(n.unit),
        Builtin::Im => |n: Number| Number::real(n.imag).with_unit(n.unit),
        Builtin::Conj => Number::conj,
        Builtin::Arg => |n: Number| Number::real(n.arg()),
        _ => return None,
    };
    Some(f)
}

/// Applies a one-argument math builtin to a number or to every cell of a
/// vector.
pub fn elementwise(op: Builtin, value: Cow<'_, Value>) -> EvalResult<Value> {
    let Some(f) = unary_function(op) else {
        return Err(type_error(op.name(), 1, KindSet::ELEMENTWISE, &value));
    };
    match value.into_owned() {
        Value::Number(n) => Ok(Value::Number(f(n))),
        Value::Vector(mut v) => {
            v.try_map_in_place(|cell| Ok(f(cell)))?;
            Ok(Value::Vector(v))
        },
        other => Err(type_error(op.name(), 1, KindSet::ELEMENTWISE, &other)),
    }
}
