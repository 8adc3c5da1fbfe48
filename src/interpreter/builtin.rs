use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{KindSet, Value},
    },
};

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub const fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::AtLeast(m) => n >= m,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// How a builtin is written in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `a + b`; not callable by name.
    Infix,
    /// `name(args...)`.
    Call,
}

/// Static metadata of one builtin.
#[derive(Debug)]
pub struct BuiltinDef {
    pub op:    Builtin,
    /// Name used in calls, or the operator symbol for infix builtins.
    pub name:  &'static str,
    pub form:  Form,
    pub arity: Arity,
    /// Accepted kinds per argument position; positions past the end reuse
    /// the last entry.
    pub kinds: &'static [KindSet],
}

impl BuiltinDef {
    /// Checks the value at `position` (zero-based) against the signature.
    pub fn check_kind(&self, position: usize, value: &Value) -> EvalResult<()> {
        let Some(&expected) = self.kinds.get(position).or_else(|| self.kinds.last()) else {
            return Ok(());
        };
        if expected.contains(value.kind()) {
            Ok(())
        } else {
            Err(RuntimeError::TypeError { function: self.name.to_string(),
                                          position: position + 1,
                                          expected,
                                          found: value.kind() })
        }
    }
}

/// Defines the builtin enum together with its metadata table.
///
/// Each entry provides:
/// - the enum variant,
/// - a source name (or operator symbol),
/// - the written form,
/// - an arity specification,
/// - the accepted kinds per argument position.
///
/// The macro produces the `Builtin` enum and `BUILTIN_TABLE`, whose entries
/// appear in variant order so a variant's discriminant indexes its entry.
macro_rules! builtins {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => {
                name: $name:literal,
                form: $form:ident,
                arity: $arity:expr,
                kinds: $kinds:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// A builtin operator or function.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        /// Metadata of every builtin, in variant order.
        pub static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef {
                    op: Builtin::$variant,
                    name: $name,
                    form: Form::$form,
                    arity: $arity,
                    kinds: $kinds,
                },
            )*
        ];
    };
}

const ANY: &[KindSet] = &[KindSet::ANY];
const ELEMENTWISE: &[KindSet] = &[KindSet::ELEMENTWISE];
const NUMERIC: &[KindSet] = &[KindSet::NUMERIC];
const ADDITIVE: &[KindSet] = &[KindSet::NUMERIC.union(KindSet::STRING)];
const NUMBER: &[KindSet] = &[KindSet::NUMBER];

builtins! {
    /// `a + b`: addition, or string concatenation.
    Add => { name: "+", form: Infix, arity: Arity::Exact(2), kinds: ADDITIVE },
    Sub => { name: "-", form: Infix, arity: Arity::Exact(2), kinds: NUMERIC },
    Mul => { name: "*", form: Infix, arity: Arity::Exact(2), kinds: NUMERIC },
    Div => { name: "/", form: Infix, arity: Arity::Exact(2), kinds: NUMERIC },
    Mod => { name: "%", form: Infix, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    Pow => { name: "^", form: Infix, arity: Arity::Exact(2), kinds: NUMERIC },
    /// Unary minus; written `-x`, callable as `neg(x)`.
    Negate => { name: "neg", form: Call, arity: Arity::Exact(1), kinds: NUMERIC },
    Equal => { name: "==", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    NotEqual => { name: "!=", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    Less => { name: "<", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    Greater => { name: ">", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    LessEqual => { name: "<=", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    GreaterEqual => { name: ">=", form: Infix, arity: Arity::Exact(2), kinds: ANY },
    Sin => { name: "sin", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Cos => { name: "cos", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Tan => { name: "tan", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Asin => { name: "asin", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Acos => { name: "acos", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Atan => { name: "atan", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Sinh => { name: "sinh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Cosh => { name: "cosh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Tanh => { name: "tanh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Asinh => { name: "asinh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Acosh => { name: "acosh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Atanh => { name: "atanh", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Ln => { name: "ln", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    /// Base-10 logarithm.
    Log => { name: "log", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Exp => { name: "exp", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Sqrt => { name: "sqrt", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Cbrt => { name: "cbrt", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Abs => { name: "abs", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Floor => { name: "floor", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Ceil => { name: "ceil", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Round => { name: "round", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Trunc => { name: "trunc", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Sgn => { name: "sgn", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Re => { name: "re", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Im => { name: "im", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Conj => { name: "conj", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Arg => { name: "arg", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Atan2 => { name: "atan2", form: Call, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    /// Bitwise and of the integer real parts.
    And => { name: "and", form: Call, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    Or => { name: "or", form: Call, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    Xor => { name: "xor", form: Call, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    Transpose => { name: "transpose", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    /// Determinant of a square matrix.
    Det => { name: "det", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Width => { name: "width", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Height => { name: "height", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    Sum => { name: "sum", form: Call, arity: Arity::Exact(1), kinds: ELEMENTWISE },
    /// Number of cells of a vector, or characters of a string.
    Length => { name: "length", form: Call, arity: Arity::Exact(1), kinds: &[KindSet::ELEMENTWISE.union(KindSet::STRING)] },
    /// `get(v, x, y)`: the cell at column `x`, row `y`.
    Get => { name: "get", form: Call, arity: Arity::Exact(3), kinds: &[KindSet::ELEMENTWISE, KindSet::NUMBER] },
    /// `fill(value, w, h)`: a `w x h` vector of `value`.
    Fill => { name: "fill", form: Call, arity: Arity::Exact(3), kinds: NUMBER },
    /// `ident(n)`: the `n x n` identity matrix.
    Ident => { name: "ident", form: Call, arity: Arity::Exact(1), kinds: NUMBER },
    /// Matrix product.
    Mmul => { name: "mmul", form: Call, arity: Arity::Exact(2), kinds: ELEMENTWISE },
    Min => { name: "min", form: Call, arity: Arity::AtLeast(1), kinds: &[KindSet::NUMERIC.union(KindSet::STRING)] },
    Max => { name: "max", form: Call, arity: Arity::AtLeast(1), kinds: &[KindSet::NUMERIC.union(KindSet::STRING)] },
    /// `run(f, args...)`: calls a closure, or the function named by a string.
    Run => { name: "run", form: Call, arity: Arity::AtLeast(1), kinds: &[KindSet::CLOSURE.union(KindSet::STRING), KindSet::ANY] },
    Str => { name: "str", form: Call, arity: Arity::Exact(1), kinds: ANY },
    /// `substr(s, start, len)`, counted in characters.
    Substr => { name: "substr", form: Call, arity: Arity::Exact(3), kinds: &[KindSet::STRING, KindSet::NUMBER] },
    /// Converts a number or numeric string to a bignum.
    Big => { name: "big", form: Call, arity: Arity::Exact(1), kinds: &[KindSet::NUMBER.union(KindSet::BIGNUM).union(KindSet::STRING)] },
    /// Converts a bignum or numeric string back to a number.
    Num => { name: "num", form: Call, arity: Arity::Exact(1), kinds: &[KindSet::NUMBER.union(KindSet::BIGNUM).union(KindSet::STRING)] },
    /// Writes the value to the interpreter's output sink and returns it.
    Print => { name: "print", form: Call, arity: Arity::Exact(1), kinds: ANY },
}

impl Builtin {
    /// Metadata of this builtin.
    #[must_use]
    pub fn def(self) -> &'static BuiltinDef {
        &BUILTIN_TABLE[self as usize]
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Looks up a builtin callable by name; infix operators are excluded.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_TABLE.iter()
                     .find(|def| def.form == Form::Call && def.name == name)
                     .map(|def| def.op)
    }

    /// Whether the builtin is written infix.
    #[must_use]
    pub fn is_infix(self) -> bool {
        self.def().form == Form::Infix
    }
}

/// Constant names and their values.
#[must_use]
pub fn constant(name: &str) -> Option<crate::interpreter::value::number::Number> {
    use crate::interpreter::value::number::{I, Number};

    match name {
        "pi" => Some(Number::real(std::f64::consts::PI)),
        "e" => Some(Number::real(std::f64::consts::E)),
        "i" => Some(I),
        "inf" => Some(Number::real(f64::INFINITY)),
        "nan" => Some(Number::real(f64::NAN)),
        _ => None,
    }
}

/// Words that may not be used as names.
pub const KEYWORDS: &[&str] = &["if", "else", "while", "return", "break", "continue", "delete"];

/// Whether `name` is a statement keyword, unavailable as a parameter or local.
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Whether `name` is unavailable for functions and globals.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    is_keyword(name) || constant(name).is_some() || Builtin::from_name(name).is_some()
}
