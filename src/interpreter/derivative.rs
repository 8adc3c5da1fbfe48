use std::f64::consts::LN_10;

use crate::{
    ast::Tree,
    error::RuntimeError,
    interpreter::{
        builtin::Builtin,
        evaluator::{binary::core::number_binary, core::EvalResult, function::math::unary_function},
        value::{
            core::Value,
            number::{Number, ONE},
        },
    },
};

/// Differentiates `tree` with respect to the first argument.
///
/// Other arguments and globals are treated as constants. Local variables,
/// anonymous functions, custom function calls and builtins without a
/// derivative rule are rejected with `NotDifferentiable`.
///
/// The result is a fresh tree sharing nothing with the input. It is
/// simplified as it is built: products with `0` or `1`, sums with `0`,
/// powers with exponent `0` or `1` collapse, and subtrees made only of
/// number literals are folded into one literal.
///
/// # Example
/// ```
/// use abacus::{
///     ast::Tree,
///     interpreter::{builtin::Builtin, derivative::derivative, value::number::Number},
/// };
///
/// // d/dx (x * 3) = 3
/// let tree = Tree::binary(Builtin::Mul, Tree::Argument(0), Tree::number(Number::real(3.0)));
/// assert_eq!(derivative(&tree).unwrap(), Tree::number(Number::real(3.0)));
/// ```
pub fn derivative(tree: &Tree) -> EvalResult<Tree> {
    match tree {
        Tree::Argument(0) => Ok(Tree::one()),
        Tree::Literal(_) | Tree::Argument(_) | Tree::Global(_) => Ok(Tree::zero()),
        Tree::Local(_) => Err(not_differentiable("a local variable")),
        Tree::Custom { .. } => Err(not_differentiable("a custom function call")),
        Tree::Closure { .. } => Err(not_differentiable("an anonymous function")),
        Tree::Vector { width,
                       height,
                       cells, } => Ok(Tree::Vector { width:  *width,
                                                     height: *height,
                                                     cells:  cells.iter().map(derivative).collect::<EvalResult<_>>()?, }),
        Tree::Builtin { op, args } => builtin_derivative(*op, args),
    }
}

fn not_differentiable(what: impl Into<String>) -> RuntimeError {
    RuntimeError::NotDifferentiable { what: what.into() }
}

fn builtin_derivative(op: Builtin, args: &[Tree]) -> EvalResult<Tree> {
    match (op, args) {
        (Builtin::Add, [a, b]) => Ok(sum(derivative(a)?, derivative(b)?)),
        (Builtin::Sub, [a, b]) => Ok(difference(derivative(a)?, derivative(b)?)),
        (Builtin::Mul, [a, b]) => {
            Ok(sum(product(derivative(a)?, b.clone()), product(a.clone(), derivative(b)?)))
        },
        (Builtin::Div, [a, b]) => {
            let numerator = difference(product(derivative(a)?, b.clone()), product(a.clone(), derivative(b)?));
            Ok(quotient(numerator, power(b.clone(), number(2.0))))
        },
        (Builtin::Pow, [base, exponent]) => power_derivative(base, exponent),
        (Builtin::Atan2, [y, x]) => {
            let numerator = difference(product(x.clone(), derivative(y)?), product(y.clone(), derivative(x)?));
            let denominator = sum(power(x.clone(), number(2.0)), power(y.clone(), number(2.0)));
            Ok(quotient(numerator, denominator))
        },
        (Builtin::Negate, [a]) => Ok(negated(derivative(a)?)),
        (Builtin::Re | Builtin::Im | Builtin::Conj, [a]) => Ok(call(op, derivative(a)?)),
        (Builtin::Floor | Builtin::Ceil | Builtin::Round | Builtin::Trunc | Builtin::Sgn, [_]) => Ok(Tree::zero()),
        (_, [u]) => {
            let outer = outer_derivative(op, u)?;
            Ok(product(outer, derivative(u)?))
        },
        _ => Err(not_differentiable(format!("'{}'", op.name()))),
    }
}

/// The derivative of the one-argument builtin `op`, evaluated at `u`.
fn outer_derivative(op: Builtin, u: &Tree) -> EvalResult<Tree> {
    let u = || u.clone();
    let squared = || power(u(), number(2.0));
    let tree = match op {
        Builtin::Sin => call(Builtin::Cos, u()),
        Builtin::Cos => negated(call(Builtin::Sin, u())),
        Builtin::Tan => quotient(Tree::one(), power(call(Builtin::Cos, u()), number(2.0))),
        Builtin::Asin => quotient(Tree::one(), call(Builtin::Sqrt, difference(Tree::one(), squared()))),
        Builtin::Acos => negated(quotient(Tree::one(), call(Builtin::Sqrt, difference(Tree::one(), squared())))),
        Builtin::Atan => quotient(Tree::one(), sum(Tree::one(), squared())),
        Builtin::Sinh => call(Builtin::Cosh, u()),
        Builtin::Cosh => call(Builtin::Sinh, u()),
        Builtin::Tanh => quotient(Tree::one(), power(call(Builtin::Cosh, u()), number(2.0))),
        Builtin::Asinh => quotient(Tree::one(), call(Builtin::Sqrt, sum(squared(), Tree::one()))),
        Builtin::Acosh => quotient(Tree::one(), call(Builtin::Sqrt, difference(squared(), Tree::one()))),
        Builtin::Atanh => quotient(Tree::one(), difference(Tree::one(), squared())),
        Builtin::Ln => quotient(Tree::one(), u()),
        Builtin::Log => quotient(Tree::one(), product(u(), number(LN_10))),
        Builtin::Exp => call(Builtin::Exp, u()),
        Builtin::Sqrt => quotient(Tree::one(), product(number(2.0), call(Builtin::Sqrt, u()))),
        Builtin::Cbrt => quotient(Tree::one(), product(number(3.0), power(call(Builtin::Cbrt, u()), number(2.0)))),
        Builtin::Abs => call(Builtin::Sgn, u()),
        _ => return Err(not_differentiable(format!("'{}'", op.name()))),
    };
    Ok(tree)
}

/// `d(f^g)`, specialised for a constant exponent or a constant base.
fn power_derivative(base: &Tree, exponent: &Tree) -> EvalResult<Tree> {
    if !depends_on_variable(exponent) {
        // g * f^(g - 1) * f'
        let lowered = power(base.clone(), difference(exponent.clone(), Tree::one()));
        return Ok(product(product(exponent.clone(), lowered), derivative(base)?));
    }
    let whole = power(base.clone(), exponent.clone());
    let log_base = call(Builtin::Ln, base.clone());
    if !depends_on_variable(base) {
        // f^g * ln(f) * g'
        return Ok(product(product(whole, log_base), derivative(exponent)?));
    }
    // f^g * (g' ln f + g f' / f)
    let inner = sum(product(derivative(exponent)?, log_base),
                    quotient(product(exponent.clone(), derivative(base)?), base.clone()));
    Ok(product(whole, inner))
}

/// Whether the tree mentions the variable of differentiation.
fn depends_on_variable(tree: &Tree) -> bool {
    match tree {
        Tree::Argument(0) => true,
        Tree::Builtin { args, .. } | Tree::Custom { args, .. } => args.iter().any(depends_on_variable),
        Tree::Vector { cells, .. } => cells.iter().any(depends_on_variable),
        Tree::Literal(_) | Tree::Argument(_) | Tree::Local(_) | Tree::Global(_) | Tree::Closure { .. } => false,
    }
}

const fn number(value: f64) -> Tree {
    Tree::number(Number::real(value))
}

fn is_zero(tree: &Tree) -> bool {
    tree.as_number()
        .is_some_and(|n| n.is_zero() && n.unit.is_dimensionless())
}

fn is_one(tree: &Tree) -> bool {
    tree.as_number() == Some(ONE)
}

/// Folds `op` over two number literals, keeping the node when the
/// operation fails.
fn folded(op: Builtin, a: Tree, b: Tree) -> Tree {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number())
       && let Ok(value) = number_binary(op, x, y)
    {
        return Tree::number(value);
    }
    Tree::binary(op, a, b)
}

fn sum(a: Tree, b: Tree) -> Tree {
    if is_zero(&a) {
        return b;
    }
    if is_zero(&b) {
        return a;
    }
    folded(Builtin::Add, a, b)
}

fn difference(a: Tree, b: Tree) -> Tree {
    if is_zero(&b) {
        return a;
    }
    if is_zero(&a) {
        return negated(b);
    }
    folded(Builtin::Sub, a, b)
}

fn product(a: Tree, b: Tree) -> Tree {
    if is_zero(&a) || is_zero(&b) {
        return Tree::zero();
    }
    if is_one(&a) {
        return b;
    }
    if is_one(&b) {
        return a;
    }
    folded(Builtin::Mul, a, b)
}

fn quotient(a: Tree, b: Tree) -> Tree {
    if is_zero(&a) {
        return Tree::zero();
    }
    if is_one(&b) {
        return a;
    }
    folded(Builtin::Div, a, b)
}

fn power(a: Tree, b: Tree) -> Tree {
    if is_zero(&b) {
        return Tree::one();
    }
    if is_one(&b) {
        return a;
    }
    folded(Builtin::Pow, a, b)
}

fn negated(tree: Tree) -> Tree {
    match tree {
        Tree::Literal(Value::Number(n)) => Tree::number(-n),
        Tree::Builtin { op: Builtin::Negate,
                        mut args, } if args.len() == 1 => args.remove(0),
        other => Tree::unary(Builtin::Negate, other),
    }
}

/// A one-argument builtin call, folded when the argument is a literal.
fn call(op: Builtin, arg: Tree) -> Tree {
    if let Some(n) = arg.as_number()
       && let Some(f) = unary_function(op)
    {
        return Tree::number(f(n));
    }
    Tree::unary(op, arg)
}
