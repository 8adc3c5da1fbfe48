/// Builtin dispatch and argument checking.
pub mod core;

/// Elementwise mathematical functions.
pub mod math;

/// Shape queries, indexing and linear algebra.
pub mod vector;

/// `min` and `max`.
pub mod min_max;

/// `print`.
pub mod print;

/// String and numeric representation conversions.
pub mod string;

/// Late-bound calls through `run`.
pub mod run;
