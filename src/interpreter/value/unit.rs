use std::{fmt, ops};

/// Number of dimension lanes packed into a [`Unit`].
pub const LANES: usize = 8;

/// Symbol of the base unit of each lane, in lane order.
pub const BASE_SYMBOLS: [&str; LANES] = ["m", "kg", "s", "A", "K", "mol", "cd", "bit"];

/// A physical dimension: one signed exponent per base quantity.
///
/// The eight lanes are length, mass, time, current, temperature, amount,
/// luminosity and information, packed as signed bytes into a single `u64`.
/// Lane arithmetic wraps modulo 256.
///
/// # Example
/// ```
/// use abacus::interpreter::value::unit::Unit;
///
/// let metre = Unit::base(0);
/// let second = Unit::base(2);
/// let speed = metre / second;
/// assert_eq!(speed.to_string(), "m*s^-1");
/// assert_eq!((speed * second), metre);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unit(u64);

impl Unit {
    /// The dimensionless unit.
    pub const NONE: Self = Self(0);

    /// Packs eight lane exponents into a unit.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_lanes(lanes: [i8; LANES]) -> Self {
        let mut packed = 0u64;
        let mut index = 0;
        while index < LANES {
            packed |= (lanes[index] as u8 as u64) << (index * 8);
            index += 1;
        }
        Self(packed)
    }

    /// The unit with exponent one in `lane` and zero elsewhere.
    #[must_use]
    pub const fn base(lane: usize) -> Self {
        let mut lanes = [0; LANES];
        lanes[lane] = 1;
        Self::from_lanes(lanes)
    }

    /// Exponent stored in one lane.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn lane(self, index: usize) -> i8 {
        (self.0 >> (index * 8)) as u8 as i8
    }

    /// All eight lane exponents.
    #[must_use]
    pub const fn lanes(self) -> [i8; LANES] {
        let mut lanes = [0; LANES];
        let mut index = 0;
        while index < LANES {
            lanes[index] = self.lane(index);
            index += 1;
        }
        lanes
    }

    #[must_use]
    pub const fn is_dimensionless(self) -> bool {
        self.0 == 0
    }

    /// Raises the unit to a real power: each lane is scaled and truncated
    /// toward zero, wrapping on overflow.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn powf(self, exponent: f64) -> Self {
        self.map(|lane| (f64::from(lane) * exponent).trunc() as i64 as i8)
    }

    /// Unit of a sum or difference: identical units pass through, and a
    /// dimensionless side adopts the other side's unit.
    ///
    /// Returns `None` when the units are incompatible.
    #[must_use]
    pub const fn additive(self, other: Self) -> Option<Self> {
        if self.0 == other.0 || other.is_dimensionless() {
            Some(self)
        } else if self.is_dimensionless() {
            Some(other)
        } else {
            None
        }
    }

    fn map(self, f: impl Fn(i8) -> i8) -> Self {
        Self::from_lanes(self.lanes().map(f))
    }

    fn zip(self, other: Self, f: impl Fn(i8, i8) -> i8) -> Self {
        let left = self.lanes();
        let right = other.lanes();
        Self::from_lanes(std::array::from_fn(|i| f(left[i], right[i])))
    }
}

impl ops::Mul for Unit {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.zip(rhs, i8::wrapping_add)
    }
}

impl ops::Div for Unit {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.zip(rhs, i8::wrapping_sub)
    }
}

/// Renders as `m^2*kg*s^-2`; the dimensionless unit renders as an empty
/// string.
impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (symbol, exponent) in BASE_SYMBOLS.iter().zip(self.lanes()) {
            if exponent == 0 {
                continue;
            }
            if !first {
                write!(f, "*")?;
            }
            first = false;
            if exponent == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}^{exponent}")?;
            }
        }
        Ok(())
    }
}
