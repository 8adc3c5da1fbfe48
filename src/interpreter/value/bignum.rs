use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Float, One, ToPrimitive, Zero};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{number::Number, unit::Unit},
    },
    util::num::i64_to_f64,
};

/// Number of fractional digits shown by [`Bignum`]'s `Display` impl.
pub const DISPLAY_DIGITS: usize = 40;

/// Largest exponent accepted by [`Bignum::powi`].
const MAX_EXPONENT: u64 = 1 << 16;

/// An arbitrary-precision complex number.
///
/// Both parts are fixed-point big integers: the stored integer `re` stands for
/// `re / 2^precision`. Operands of different precision are rescaled to the
/// larger one before they are combined.
///
/// # Example
/// ```
/// use abacus::interpreter::value::bignum::Bignum;
///
/// let third = Bignum::parse("1", 10, 256).unwrap()
///                                         .div(&Bignum::parse("3", 10, 256).unwrap())
///                                         .unwrap();
/// assert_eq!(third.to_string_radix(10, 10), "0.3333333333");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bignum {
    re:        BigInt,
    im:        BigInt,
    precision: u32,
    unit:      Unit,
}

impl Bignum {
    /// Parses a real number written in `base`, with an optional sign and
    /// fractional part, keeping `precision` fractional bits.
    ///
    /// Returns `None` for an invalid base, an empty mantissa or a digit that
    /// does not belong to the base.
    #[must_use]
    pub fn parse(text: &str, base: u32, precision: u32) -> Option<Self> {
        if !(2..=36).contains(&base) {
            return None;
        }
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        let mut mantissa = BigInt::zero();
        for c in integer.chars().chain(fraction.chars()) {
            mantissa = mantissa * base + c.to_digit(base)?;
        }
        let denominator = BigInt::from(base).pow(u32::try_from(fraction.len()).ok()?);
        let half = &denominator >> 1u32;
        let mut re = ((mantissa << precision) + half) / denominator;
        if negative {
            re = -re;
        }
        Some(Self { re,
                    im: BigInt::zero(),
                    precision,
                    unit: Unit::NONE })
    }

    /// Converts a floating-point number exactly (up to `precision`
    /// fractional bits).
    ///
    /// Returns `None` when either part is infinite or NaN.
    #[must_use]
    pub fn from_number(number: Number, precision: u32) -> Option<Self> {
        Some(Self { re: fixed_from_f64(number.real, precision)?,
                    im: fixed_from_f64(number.imag, precision)?,
                    precision,
                    unit: number.unit })
    }

    /// Rounds to the nearest floating-point number.
    #[must_use]
    pub fn to_number(&self) -> Number {
        Number::new(fixed_to_f64(&self.re, self.precision),
                    fixed_to_f64(&self.im, self.precision)).with_unit(self.unit)
    }

    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// Scalar reading used for ordering and truthiness.
    #[must_use]
    pub fn flatten(&self) -> f64 {
        self.to_number().flatten()
    }

    /// Renders the number in `base` with at most `digits` fractional digits,
    /// rounded to nearest and without trailing zeros.
    #[must_use]
    pub fn to_string_radix(&self, base: u32, digits: usize) -> String {
        let mut text = fixed_to_string(&self.re, self.precision, base, digits);
        if !self.im.is_zero() {
            let imag = fixed_to_string(&self.im, self.precision, base, digits);
            if !imag.starts_with('-') {
                text.push('+');
            }
            text.push_str(&imag);
            text.push('i');
        }
        if !self.unit.is_dimensionless() {
            text.push(' ');
            text.push_str(&self.unit.to_string());
        }
        text
    }

    /// Sum of two numbers whose units agree.
    pub fn add(&self, other: &Self) -> EvalResult<Self> {
        let unit = self.unit.additive(other.unit).ok_or(RuntimeError::UnitMismatch {
            operation: "add",
            left: self.unit,
            right: other.unit,
        })?;
        let precision = self.precision.max(other.precision);
        Ok(Self { re: self.rescaled(&self.re, precision) + other.rescaled(&other.re, precision),
                  im: self.rescaled(&self.im, precision) + other.rescaled(&other.im, precision),
                  precision,
                  unit })
    }

    /// Difference of two numbers whose units agree.
    pub fn sub(&self, other: &Self) -> EvalResult<Self> {
        self.add(&other.neg())
            .map_err(|_| RuntimeError::UnitMismatch { operation: "subtract",
                                                      left:      self.unit,
                                                      right:     other.unit, })
    }

    /// Product of two numbers.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let precision = self.precision.max(other.precision);
        let (a, b) = (self.rescaled(&self.re, precision), self.rescaled(&self.im, precision));
        let (c, d) = (other.rescaled(&other.re, precision), other.rescaled(&other.im, precision));
        Self { re: (&a * &c - &b * &d) >> precision,
               im: (&a * &d + &b * &c) >> precision,
               precision,
               unit: self.unit * other.unit }
    }

    /// Reciprocal `1 / self`.
    pub fn recip(&self) -> EvalResult<Self> {
        let norm = &self.re * &self.re + &self.im * &self.im;
        if norm.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        let shift = 2 * u64::from(self.precision);
        Ok(Self { re: (&self.re << shift) / &norm,
                  im: -((&self.im << shift) / &norm),
                  precision: self.precision,
                  unit: Unit::NONE / self.unit })
    }

    /// Quotient `self / other`.
    pub fn div(&self, other: &Self) -> EvalResult<Self> {
        Ok(self.mul(&other.recip()?))
    }

    /// Integer power by repeated squaring.
    pub fn powi(&self, exponent: i64) -> EvalResult<Self> {
        let magnitude = exponent.unsigned_abs();
        if magnitude > MAX_EXPONENT {
            return Err(RuntimeError::InvalidArgument { details: format!("exponent {exponent} is too large for a bignum") });
        }
        let mut result = Self { re: BigInt::one() << self.precision,
                                im: BigInt::zero(),
                                precision: self.precision,
                                unit: Unit::NONE };
        let mut base = self.clone();
        let mut n = magnitude;
        while n > 0 {
            if n % 2 == 1 {
                result = result.mul(&base);
            }
            n /= 2;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        if exponent < 0 {
            result = result.recip()?;
        }
        result.unit = self.unit.powf(i64_to_f64(exponent));
        Ok(result)
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self { re:        -&self.re,
               im:        -&self.im,
               precision: self.precision,
               unit:      self.unit, }
    }

    fn rescaled(&self, value: &BigInt, precision: u32) -> BigInt {
        value << (precision - self.precision)
    }
}

fn fixed_from_f64(value: f64, precision: u32) -> Option<BigInt> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some(BigInt::zero());
    }
    let (mantissa, exponent, sign) = Float::integer_decode(value);
    let shift = i64::from(exponent) + i64::from(precision);
    let magnitude = BigInt::from(mantissa);
    let fixed = if shift >= 0 {
        magnitude << shift.unsigned_abs()
    } else {
        magnitude >> shift.unsigned_abs()
    };
    Some(if sign < 0 { -fixed } else { fixed })
}

fn fixed_to_f64(value: &BigInt, precision: u32) -> f64 {
    let excess = value.bits().saturating_sub(64);
    let head = (value >> excess).to_f64().unwrap_or(f64::NAN);
    let scale = i64::try_from(excess).unwrap_or(i64::MAX) - i64::from(precision);
    let scale = i32::try_from(scale).unwrap_or(if scale < 0 { i32::MIN } else { i32::MAX });
    head * 2f64.powi(scale)
}

fn fixed_to_string(value: &BigInt, precision: u32, base: u32, digits: usize) -> String {
    let one = BigUint::one() << precision;
    let step = BigUint::from(base).pow(u32::try_from(digits).unwrap_or(u32::MAX));
    let rounding = &one / (step * 2u32);
    let magnitude = value.magnitude() + rounding;
    let integer = &magnitude >> precision;
    let mut fraction = magnitude - (&integer << precision);

    let mut text = String::new();
    if value.sign() == Sign::Minus {
        text.push('-');
    }
    text.push_str(&integer.to_str_radix(base));
    if digits == 0 || fraction.is_zero() {
        return text;
    }
    text.push('.');
    for _ in 0..digits {
        fraction *= base;
        let digit = &fraction >> precision;
        fraction -= &digit << precision;
        text.push(digit.to_u32()
                       .and_then(|d| char::from_digit(d, base))
                       .unwrap_or('0'));
        if fraction.is_zero() {
            break;
        }
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
    text.truncate(trimmed);
    text
}

impl fmt::Display for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_radix(10, DISPLAY_DIGITS))
    }
}
