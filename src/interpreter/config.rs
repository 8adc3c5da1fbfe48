use crate::interpreter::value::bignum::DISPLAY_DIGITS;

/// Limits and precisions of one interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Iterations a single `while` loop may run before it is reported as an
    /// infinite loop.
    pub max_loop_iterations: usize,
    /// Fractional bits of bignums created by `big`.
    pub bignum_precision:    u32,
    /// Fractional digits shown when a bignum is printed.
    pub bignum_digits:       usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_loop_iterations: 100_000,
               bignum_precision:    256,
               bignum_digits:       DISPLAY_DIGITS, }
    }
}
