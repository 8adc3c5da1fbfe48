/// Dispatch of arithmetic builtins by operand kinds.
pub mod core;

/// Broadcasting between numbers and vectors.
pub mod vector;

/// Arbitrary-precision arithmetic.
pub mod bignum;

/// Equality and ordering.
pub mod comparison;
