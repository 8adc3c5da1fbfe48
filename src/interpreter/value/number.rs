use std::{fmt, ops};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::unit::Unit},
    util::num::{f64_to_i64_truncating, i64_to_f64},
};

/// The number zero, without a unit.
pub const ZERO: Number = Number::new(0.0, 0.0);
/// The number one, without a unit.
pub const ONE: Number = Number::new(1.0, 0.0);
/// The imaginary unit.
pub const I: Number = Number::new(0.0, 1.0);

/// A complex number carrying a physical unit.
///
/// The value is stored relative to the SI base units, so `[3km]` holds
/// `3000` with the unit `m`.
///
/// # Example
/// ```
/// use abacus::interpreter::value::number::Number;
///
/// let z = Number::new(3.0, 4.0);
/// assert_eq!(z.abs(), 5.0);
/// assert_eq!(z.conj(), Number::new(3.0, -4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    /// The real part.
    pub real: f64,
    /// The imaginary part.
    pub imag: f64,
    /// The physical dimension.
    pub unit: Unit,
}

/// Unit-free complex arithmetic used to implement the transcendental
/// functions.
#[derive(Debug, Clone, Copy)]
struct Complex {
    re: f64,
    im: f64,
}

impl Number {
    /// Creates a dimensionless complex number.
    #[must_use]
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real,
               imag,
               unit: Unit::NONE }
    }

    /// Creates a dimensionless real number.
    #[must_use]
    pub const fn real(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Returns the same value with `unit` attached.
    #[must_use]
    pub const fn with_unit(self, unit: Unit) -> Self {
        Self { unit, ..self }
    }

    #[must_use]
    pub const fn is_real(&self) -> bool {
        self.imag == 0.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.real == 0.0 && self.imag == 0.0
    }

    /// Scalar reading used for ordering and truthiness: `real + imag`.
    #[must_use]
    pub const fn flatten(&self) -> f64 {
        self.real + self.imag
    }

    /// Magnitude of the number.
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.real.hypot(self.imag)
    }

    /// Argument (phase angle) in radians.
    #[must_use]
    pub fn arg(&self) -> f64 {
        self.imag.atan2(self.real)
    }

    #[must_use]
    pub const fn conj(self) -> Self {
        Self { imag: -self.imag,
               ..self }
    }

    /// Adds two numbers whose units agree.
    pub fn checked_add(self, rhs: Self) -> EvalResult<Self> {
        let unit = additive_unit("add", self.unit, rhs.unit)?;
        Ok(Self { real: self.real + rhs.real,
                  imag: self.imag + rhs.imag,
                  unit })
    }

    /// Subtracts two numbers whose units agree.
    pub fn checked_sub(self, rhs: Self) -> EvalResult<Self> {
        let unit = additive_unit("subtract", self.unit, rhs.unit)?;
        Ok(Self { real: self.real - rhs.real,
                  imag: self.imag - rhs.imag,
                  unit })
    }

    /// Divides, failing on an exact zero divisor.
    pub fn checked_div(self, rhs: Self) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        let value = if rhs.is_real() {
            Complex { re: self.real / rhs.real,
                      im: self.imag / rhs.real }
        } else {
            self.complex() / rhs.complex()
        };
        Ok(value.with_unit(self.unit / rhs.unit))
    }

    /// Remainder with the sign of the dividend; complex operands use the
    /// component-wise truncated quotient.
    pub fn checked_rem(self, rhs: Self) -> EvalResult<Self> {
        let unit = additive_unit("take the remainder of", self.unit, rhs.unit)?;
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        if self.is_real() && rhs.is_real() {
            return Ok(Self::real(self.real % rhs.real).with_unit(unit));
        }
        let quotient = self.complex() / rhs.complex();
        let truncated = Complex { re: quotient.re.trunc(),
                                  im: quotient.im.trunc() };
        let value = self.complex() - truncated * rhs.complex();
        Ok(value.with_unit(unit))
    }

    /// Raises `self` to `exponent`.
    ///
    /// Real bases with real exponents stay real whenever the result is real;
    /// integral exponents use repeated squaring, everything else the
    /// principal branch `exp(exponent * ln(self))`. The unit is raised to the
    /// real part of the exponent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pow(self, exponent: Self) -> Self {
        let unit = self.unit.powf(exponent.real);
        let integral = exponent.is_real() && exponent.real.fract() == 0.0;
        let value = if self.is_real()
                       && exponent.is_real()
                       && (self.real >= 0.0 || integral || self.real.is_nan())
        {
            Complex { re: self.real.powf(exponent.real),
                      im: 0.0 }
        } else if integral && exponent.real.abs() <= f64::from(i32::MAX) {
            self.complex().powi(exponent.real as i32)
        } else if self.is_zero() {
            Complex { re: 0.0, im: 0.0 }
        } else {
            (exponent.complex() * self.complex().ln()).exp()
        };
        value.with_unit(unit)
    }

    /// Bitwise combination of the truncated integer real parts.
    #[must_use]
    pub fn bitwise(self, rhs: Self, op: impl Fn(i64, i64) -> i64) -> Self {
        let left = f64_to_i64_truncating(self.real.trunc());
        let right = f64_to_i64_truncating(rhs.real.trunc());
        Self::real(i64_to_f64(op(left, right))).with_unit(self.unit)
    }

    /// Four-quadrant arctangent of the real parts.
    #[must_use]
    pub fn atan2(self, rhs: Self) -> Self {
        Self::real(self.real.atan2(rhs.real))
    }

    /// Square root; the unit follows the `^0.5` rule.
    #[must_use]
    pub fn sqrt(self) -> Self {
        let unit = self.unit.powf(0.5);
        if self.is_real() && self.real >= 0.0 {
            return Self::real(self.real.sqrt()).with_unit(unit);
        }
        self.complex().sqrt().with_unit(unit)
    }

    /// Cube root; real inputs keep the real cube root.
    #[must_use]
    pub fn cbrt(self) -> Self {
        let unit = self.unit.powf(1.0 / 3.0);
        if self.is_real() {
            return Self::real(self.real.cbrt()).with_unit(unit);
        }
        self.complex().powc(Complex { re: 1.0 / 3.0,
                                      im: 0.0 })
            .with_unit(unit)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        self.real_or(true, f64::sin, Complex::sin)
    }

    #[must_use]
    pub fn cos(self) -> Self {
        self.real_or(true, f64::cos, Complex::cos)
    }

    #[must_use]
    pub fn tan(self) -> Self {
        self.real_or(true, f64::tan, |z| z.sin() / z.cos())
    }

    #[must_use]
    pub fn sinh(self) -> Self {
        self.real_or(true, f64::sinh, Complex::sinh)
    }

    #[must_use]
    pub fn cosh(self) -> Self {
        self.real_or(true, f64::cosh, Complex::cosh)
    }

    #[must_use]
    pub fn tanh(self) -> Self {
        self.real_or(true, f64::tanh, |z| z.sinh() / z.cosh())
    }

    #[must_use]
    pub fn asin(self) -> Self {
        // -i * ln(iz + sqrt(1 - z^2))
        self.real_or(self.real.abs() <= 1.0, f64::asin, |z| {
                let root = (Complex::ONE - z * z).sqrt();
                (Complex::I * z + root).ln() * Complex { re: 0.0, im: -1.0 }
            })
    }

    #[must_use]
    pub fn acos(self) -> Self {
        // -i * ln(z + i*sqrt(1 - z^2))
        self.real_or(self.real.abs() <= 1.0, f64::acos, |z| {
                let root = (Complex::ONE - z * z).sqrt();
                (z + Complex::I * root).ln() * Complex { re: 0.0, im: -1.0 }
            })
    }

    #[must_use]
    pub fn atan(self) -> Self {
        // i/2 * ln((i + z) / (i - z))
        self.real_or(true, f64::atan, |z| {
                let ratio = (Complex::I + z) / (Complex::I - z);
                ratio.ln() * Complex { re: 0.0, im: 0.5 }
            })
    }

    #[must_use]
    pub fn asinh(self) -> Self {
        self.real_or(true, f64::asinh, |z| (z + (z * z + Complex::ONE).sqrt()).ln())
    }

    #[must_use]
    pub fn acosh(self) -> Self {
        self.real_or(self.real >= 1.0, f64::acosh, |z| {
                (z + (z + Complex::ONE).sqrt() * (z - Complex::ONE).sqrt()).ln()
            })
    }

    #[must_use]
    pub fn atanh(self) -> Self {
        self.real_or(self.real.abs() < 1.0, f64::atanh, |z| {
                let half = Complex { re: 0.5, im: 0.0 };
                ((Complex::ONE + z).ln() - (Complex::ONE - z).ln()) * half
            })
    }

    /// Natural logarithm, principal branch.
    #[must_use]
    pub fn ln(self) -> Self {
        self.real_or(self.real >= 0.0, f64::ln, Complex::ln)
    }

    /// Base-10 logarithm, principal branch.
    #[must_use]
    pub fn log10(self) -> Self {
        self.real_or(self.real >= 0.0, f64::log10, |z| {
                let ln = z.ln();
                Complex { re: ln.re / std::f64::consts::LN_10,
                          im: ln.im / std::f64::consts::LN_10 }
            })
    }

    #[must_use]
    pub fn exp(self) -> Self {
        self.real_or(true, f64::exp, Complex::exp)
    }

    /// Applies `f` to both parts, keeping the unit.
    #[must_use]
    pub fn map_parts(self, f: impl Fn(f64) -> f64) -> Self {
        Self { real: f(self.real),
               imag: f(self.imag),
               unit: self.unit }
    }

    /// Sign of the number: `-1`, `0` or `1` for reals, `z / |z|` otherwise.
    #[must_use]
    pub fn signum(self) -> Self {
        if self.is_real() {
            let sign = if self.real == 0.0 || self.real.is_nan() {
                self.real
            } else {
                self.real.signum()
            };
            return Self::real(sign);
        }
        let magnitude = self.abs();
        Self::new(self.real / magnitude, self.imag / magnitude)
    }

    /// Evaluates a dimensionless function, using `real` when the number is
    /// real and inside the real domain (`in_domain`), `complex` otherwise.
    fn real_or(self,
               in_domain: bool,
               real: impl Fn(f64) -> f64,
               complex: impl Fn(Complex) -> Complex)
               -> Self {
        if self.is_real() && in_domain {
            Self::real(real(self.real))
        } else {
            complex(self.complex()).with_unit(Unit::NONE)
        }
    }

    const fn complex(self) -> Complex {
        Complex { re: self.real,
                  im: self.imag }
    }
}

fn additive_unit(operation: &'static str, left: Unit, right: Unit) -> EvalResult<Unit> {
    left.additive(right)
        .ok_or(RuntimeError::UnitMismatch { operation,
                                            left,
                                            right })
}

impl ops::Mul for Number {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let unit = self.unit * rhs.unit;
        if self.is_real() && rhs.is_real() {
            return Self::real(self.real * rhs.real).with_unit(unit);
        }
        if rhs.is_real() {
            return Self { real: self.real * rhs.real,
                          imag: self.imag * rhs.real,
                          unit };
        }
        if self.is_real() {
            return Self { real: self.real * rhs.real,
                          imag: self.real * rhs.imag,
                          unit };
        }
        (self.complex() * rhs.complex()).with_unit(unit)
    }
}

impl ops::Neg for Number {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { real: -self.real,
               imag: -self.imag,
               unit: self.unit }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::real(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.real, self.imag) {
            (real, 0.0) => write!(f, "{real}")?,
            (0.0, imag) => write!(f, "{imag}i")?,
            (real, imag) if imag > 0.0 => write!(f, "{real} + {imag}i")?,
            (real, imag) => write!(f, "{real} - {}i", -imag)?,
        }
        if !self.unit.is_dimensionless() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

impl Complex {
    const ONE: Self = Self { re: 1.0, im: 0.0 };
    const I: Self = Self { re: 0.0, im: 1.0 };

    const fn with_unit(self, unit: Unit) -> Number {
        Number { real: self.re,
                 imag: self.im,
                 unit }
    }

    fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    fn recip(self) -> Self {
        let norm = self.re.mul_add(self.re, self.im * self.im);
        Self { re: self.re / norm,
               im: -(self.im / norm) }
    }

    fn powi(self, exp: i32) -> Self {
        let mut base = self;
        let mut result = Self::ONE;
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n % 2 == 1 {
                result = result * base;
            }
            base = base * base;
            n /= 2;
        }
        if exp < 0 { result.recip() } else { result }
    }

    fn powc(self, exp: Self) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            return Self { re: 0.0, im: 0.0 };
        }
        (exp * self.ln()).exp()
    }

    fn sqrt(self) -> Self {
        let r = self.abs();
        let re = f64::midpoint(r, self.re).sqrt();
        let im = ((r - self.re) / 2.0).sqrt().copysign(self.im);
        Self { re, im }
    }

    fn sin(self) -> Self {
        Self { re: self.re.sin() * self.im.cosh(),
               im: self.re.cos() * self.im.sinh() }
    }

    fn cos(self) -> Self {
        Self { re: self.re.cos() * self.im.cosh(),
               im: -self.re.sin() * self.im.sinh() }
    }

    fn sinh(self) -> Self {
        Self { re: self.re.sinh() * self.im.cos(),
               im: self.re.cosh() * self.im.sin() }
    }

    fn cosh(self) -> Self {
        Self { re: self.re.cosh() * self.im.cos(),
               im: self.re.sinh() * self.im.sin() }
    }

    fn exp(self) -> Self {
        let scale = self.re.exp();
        Self { re: scale * self.im.cos(),
               im: scale * self.im.sin() }
    }

    fn ln(self) -> Self {
        Self { re: self.abs().ln(),
               im: self.arg() }
    }
}

impl ops::Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { re: self.re + rhs.re,
               im: self.im + rhs.im }
    }
}

impl ops::Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self { re: self.re - rhs.re,
               im: self.im - rhs.im }
    }
}

impl ops::Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { re: self.re.mul_add(rhs.re, -(self.im * rhs.im)),
               im: self.re.mul_add(rhs.im, self.im * rhs.re) }
    }
}

impl ops::Div for Complex {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let denom = rhs.re.mul_add(rhs.re, rhs.im * rhs.im);
        Self { re: self.re.mul_add(rhs.re, self.im * rhs.im) / denom,
               im: self.im.mul_add(rhs.re, -(self.re * rhs.im)) / denom }
    }
}
