/// Binary operator evaluation logic.
///
/// Handles arithmetic with broadcasting between numbers and vectors, bignum
/// arithmetic, string concatenation and comparisons.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the tree walker, call frames, custom function and closure calls.
pub mod core;

/// Code block execution.
///
/// Runs statement lists with conditionals, loops and early returns over a
/// shared local array.
pub mod block;

/// Utility functions for evaluation.
///
/// Provides helpers and reusable routines shared by evaluation logic.
pub mod utils;

/// Builtin function evaluation.
///
/// Dispatches builtin calls to their implementations after the arguments
/// have been evaluated and type checked.
pub mod function;
