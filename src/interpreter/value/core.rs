use std::{fmt, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    ast::CodeBlock,
    interpreter::value::{
        bignum::Bignum,
        number::{Number, ZERO},
        vector::Vector,
    },
};

/// A runtime value.
///
/// Every intermediate result, argument and local slot holds one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A complex number with a unit, such as `3`, `2i` or `[5kg]`.
    Number(Number),
    /// A matrix of numbers, such as `<1,2;3,4>`.
    Vector(Vector),
    /// An anonymous function together with the values it captured.
    Closure(Closure),
    /// An arbitrary-precision complex number produced by `big`.
    Bignum(Bignum),
    /// A string such as `"sin"`.
    String(String),
}

/// The value produced by evaluating an anonymous function.
///
/// The body is shared with the tree the closure was built from; `captured`
/// holds copies of the enclosing frame's arguments and visible locals, which
/// the body addresses as arguments following its own parameters.
#[derive(Debug, Clone)]
pub struct Closure {
    /// Parameter names.
    pub params:   Rc<[String]>,
    /// The shared body.
    pub body:     Rc<CodeBlock>,
    /// Values captured when the closure was constructed.
    pub captured: Rc<[Value]>,
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && self.captured == other.captured
    }
}

/// The kind of a [`Value`], used in type errors and builtin signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    Vector,
    Closure,
    Bignum,
    String,
}

impl Kind {
    const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Vector => "vector",
            Self::Closure => "function",
            Self::Bignum => "bignum",
            Self::String => "string",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A set of value kinds accepted at one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    pub const NUMBER: Self = Self(Kind::Number.bit());
    pub const VECTOR: Self = Self(Kind::Vector.bit());
    pub const CLOSURE: Self = Self(Kind::Closure.bit());
    pub const BIGNUM: Self = Self(Kind::Bignum.bit());
    pub const STRING: Self = Self(Kind::String.bit());
    /// Numbers and vectors.
    pub const ELEMENTWISE: Self = Self::NUMBER.union(Self::VECTOR);
    /// Numbers, vectors and bignums.
    pub const NUMERIC: Self = Self::ELEMENTWISE.union(Self::BIGNUM);
    pub const ANY: Self = Self::NUMERIC.union(Self::CLOSURE).union(Self::STRING);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = [Kind::Number, Kind::Vector, Kind::Closure, Kind::Bignum, Kind::String];
        let names: Vec<_> = kinds.into_iter()
                                 .filter(|kind| self.contains(*kind))
                                 .map(Kind::name)
                                 .collect();
        match names.split_last() {
            None => write!(f, "nothing"),
            Some((last, [])) => write!(f, "{last}"),
            Some((last, rest)) => write!(f, "{} or {last}", rest.join(", ")),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(Number::real(value))
    }
}

impl From<Vector> for Value {
    fn from(vector: Vector) -> Self {
        Self::Vector(vector)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::from(if value { 1.0 } else { 0.0 })
    }
}

impl Value {
    /// The value a function returns when its body falls through.
    #[must_use]
    pub const fn zero() -> Self {
        Self::Number(ZERO)
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Number(_) => Kind::Number,
            Self::Vector(_) => Kind::Vector,
            Self::Closure(_) => Kind::Closure,
            Self::Bignum(_) => Kind::Bignum,
            Self::String(_) => Kind::String,
        }
    }

    /// Reduces the value to one scalar: `real + imag` summed over all
    /// cells. Strings flatten to their length, closures to zero.
    #[must_use]
    pub fn flatten(&self) -> f64 {
        match self {
            Self::Number(n) => n.flatten(),
            Self::Vector(v) => v.flatten(),
            Self::Closure(_) => 0.0,
            Self::Bignum(b) => b.flatten(),
            Self::String(s) => crate::util::num::usize_to_f64(s.chars().count()),
        }
    }

    /// Truthiness used by `if` and `while` conditions.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Closure(_) => true,
            Self::String(s) => !s.is_empty(),
            Self::Bignum(b) => !b.is_zero(),
            _ => self.flatten() != 0.0,
        }
    }

    /// Total order on the flattened readings of two values.
    #[must_use]
    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        OrderedFloat(self.flatten()).cmp(&OrderedFloat(other.flatten()))
    }

    /// The number held by this value; a `1 x 1` vector counts as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Vector(v) if v.len() == 1 => v.cells().first().copied(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_vector(&self) -> Option<&Vector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Vector(v) => write!(f, "{v}"),
            Self::Closure(c) => write!(f, "<function of {}>", c.params.join(", ")),
            Self::Bignum(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}
