use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{
        builtin::Builtin,
        evaluator::{binary::core::number_binary, core::EvalResult, utils::into_vector},
        value::{
            core::{KindSet, Value},
            number::Number,
            vector::{Vector, reserve_cells},
        },
    },
};

/// Whether a vector-vector operation takes the larger of the two shapes;
/// the others take the smaller one.
const fn takes_larger_shape(op: Builtin) -> bool {
    matches!(op, Builtin::Add | Builtin::Sub | Builtin::Pow | Builtin::Or | Builtin::Xor)
}

/// Arithmetic on numbers and vectors.
///
/// A number combines with every cell of a vector, except under `+`, where
/// it is promoted to a `1 x 1` vector and the shapes are merged. Cells
/// missing from the smaller operand read as zero.
///
/// # Example
/// ```
/// use abacus::interpreter::Interpreter;
///
/// let interpreter = Interpreter::new();
/// let doubled = interpreter.evaluate_str("<1, 2; 3, 4> * 2").unwrap();
/// assert_eq!(doubled, interpreter.evaluate_str("<2, 4; 6, 8>").unwrap());
///
/// let padded = interpreter.evaluate_str("<1, 2> + <10>").unwrap();
/// assert_eq!(padded, interpreter.evaluate_str("<11, 2>").unwrap());
/// ```
pub fn vector_binary(op: Builtin, left: Cow<'_, Value>, right: Cow<'_, Value>) -> EvalResult<Value> {
    match (number_operand(&left), number_operand(&right)) {
        (Some(a), Some(b)) => number_binary(op, a, b).map(Value::Number),
        (Some(n), None) => {
            let vector = vector_operand(op, right, 2)?;
            if op == Builtin::Add {
                combine(op, Cow::Owned(Vector::scalar(n)), vector)
            } else {
                map_cells(vector, |cell| number_binary(op, n, cell))
            }
        },
        (None, Some(n)) => {
            let vector = vector_operand(op, left, 1)?;
            if op == Builtin::Add {
                combine(op, vector, Cow::Owned(Vector::scalar(n)))
            } else {
                map_cells(vector, |cell| number_binary(op, cell, n))
            }
        },
        (None, None) => {
            let a = vector_operand(op, left, 1)?;
            let b = vector_operand(op, right, 2)?;
            combine(op, a, b)
        },
    }
}

const fn number_operand(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(*n),
        _ => None,
    }
}

fn vector_operand(op: Builtin, value: Cow<'_, Value>, position: usize) -> EvalResult<Cow<'_, Vector>> {
    let found = value.kind();
    into_vector(value).ok_or_else(|| RuntimeError::TypeError { function: op.name().to_string(),
                                                               position,
                                                               expected: KindSet::ELEMENTWISE,
                                                               found })
}

/// Applies `f` to every cell, reusing an owned vector.
fn map_cells(vector: Cow<'_, Vector>, f: impl Fn(Number) -> EvalResult<Number>) -> EvalResult<Value> {
    let mut vector = vector.into_owned();
    vector.try_map_in_place(f)?;
    Ok(Value::Vector(vector))
}

/// Combines two vectors cell by cell.
fn combine(op: Builtin, a: Cow<'_, Vector>, b: Cow<'_, Vector>) -> EvalResult<Value> {
    let (width, height) = if takes_larger_shape(op) {
        (a.width().max(b.width()), a.height().max(b.height()))
    } else {
        (a.width().min(b.width()), a.height().min(b.height()))
    };

    if a.width() == width && a.height() == height {
        let mut result = a.into_owned();
        let cells = result.cells_mut();
        for y in 0..height {
            for x in 0..width {
                let index = x + y * width;
                cells[index] = number_binary(op, cells[index], b.get_or_zero(x, y))?;
            }
        }
        return Ok(Value::Vector(result));
    }

    let mut cells = reserve_cells(width, height)?;
    for y in 0..height {
        for x in 0..width {
            cells.push(number_binary(op, a.get_or_zero(x, y), b.get_or_zero(x, y))?);
        }
    }
    Vector::from_cells(width, height, cells).map(Value::Vector)
                                            .ok_or_else(|| RuntimeError::ShapeMismatch { details: format!("cannot build a {width}x{height} vector") })
}
