use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;
/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` if the value exceeds
/// `MAX_SAFE_U64_INT`.
///
/// ## Example
/// ```
/// use abacus::util::num::usize_to_f64_checked;
///
/// assert_eq!(usize_to_f64_checked(12).unwrap(), 12.0);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64_checked(value: usize) -> EvalResult<f64> {
    if !u64::try_from(value).is_ok_and(|v| v <= MAX_SAFE_U64_INT) {
        return Err(RuntimeError::InvalidArgument { details: format!("{value} is too large to represent exactly") });
    }
    Ok(value as f64)
}

/// Converts a count or index that is known to be small into an `f64`.
///
/// Vector shapes and string lengths never come near `2^53`, so the
/// conversion is exact in practice.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Safely converts an `f64` into an `i64`, rejecting fractional, non-finite
/// and out-of-range values.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` describing the rejected value.
///
/// ## Example
/// ```
/// use abacus::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(-7.0).unwrap(), -7);
/// assert!(f64_to_i64_checked(2.5).is_err());
/// assert!(f64_to_i64_checked(f64::NAN).is_err());
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64) -> EvalResult<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("expected an integer, found {value}") });
    }
    if value.abs() > MAX_SAFE_I64_INT as f64 {
        return Err(RuntimeError::InvalidArgument { details: format!("{value} is too large to be used as an integer") });
    }
    Ok(value as i64)
}

/// Safely converts an `f64` into a `usize` index or count.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` for negative, fractional or
/// non-finite values.
///
/// ## Example
/// ```
/// use abacus::util::num::f64_to_usize_checked;
///
/// assert_eq!(f64_to_usize_checked(3.0).unwrap(), 3);
/// assert!(f64_to_usize_checked(-1.0).is_err());
/// ```
pub fn f64_to_usize_checked(value: f64) -> EvalResult<usize> {
    let integer = f64_to_i64_checked(value)?;
    usize::try_from(integer).map_err(|_| RuntimeError::InvalidArgument { details: format!("expected a non-negative integer, found {value}") })
}

/// Converts an `i64` produced by a bitwise operation back to `f64`.
///
/// Results beyond `2^53` round to the nearest representable value, exactly as
/// any other large floating-point result would.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Truncates the integer part of an `f64` into an `i64` for bitwise
/// operations, saturating at the `i64` bounds and mapping NaN to zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn f64_to_i64_truncating(value: f64) -> i64 {
    value as i64
}
