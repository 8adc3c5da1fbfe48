/// Arbitrary-precision numbers.
///
/// Defines `Bignum`, a complex fixed-point number backed by `num-bigint`,
/// with parsing and rendering in any base from 2 to 36.
pub mod bignum;
/// The `Value` enum and the kind sets used in builtin signatures.
pub mod core;
/// Unit-aware complex numbers.
///
/// Defines `Number`, the scalar every arithmetic builtin works on. Real
/// inputs stay on the real axis wherever the result is real; everything else
/// uses the principal complex branch.
pub mod number;
/// Packed physical dimensions.
pub mod unit;
/// The unit name table consulted inside `[...]` groups.
pub mod unit_table;
/// Row-major matrices of numbers.
pub mod vector;
