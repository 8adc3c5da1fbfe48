/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types without risking silent data loss. Vector indices,
/// shapes and bitwise operands all pass through here on their way out of an
/// `f64`.
pub mod num;
