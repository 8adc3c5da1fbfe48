use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{as_matrix, index_arg, type_error},
        },
        value::{
            core::{KindSet, Value},
            number::{Number, ONE, ZERO},
            vector::{Vector, reserve_cells},
        },
    },
    util::num::{usize_to_f64, usize_to_f64_checked},
};

fn count(n: usize) -> EvalResult<Value> {
    Ok(Value::from(usize_to_f64_checked(n)?))
}

/// Swaps rows and columns; a number is returned unchanged.
pub fn transpose(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Vector(v) => Ok(Value::Vector(v.transpose())),
        Value::Number(n) => Ok(Value::Number(*n)),
        other => Err(type_error("transpose", 1, KindSet::ELEMENTWISE, other)),
    }
}

/// Number of columns; a number counts as `1 x 1`.
pub fn width(value: &Value) -> EvalResult<Value> {
    count(as_matrix(value, "width", 1)?.width())
}

/// Number of rows; a number counts as `1 x 1`.
pub fn height(value: &Value) -> EvalResult<Value> {
    count(as_matrix(value, "height", 1)?.height())
}

/// Sum of all cells. The cells' units must agree.
pub fn sum(value: &Value) -> EvalResult<Value> {
    let matrix = as_matrix(value, "sum", 1)?;
    matrix.cells()
          .iter()
          .try_fold(ZERO, |total, &cell| total.checked_add(cell))
          .map(Value::Number)
}

/// Number of cells of a vector, characters of a string, or one for a
/// number.
#[must_use]
pub fn length(value: &Value) -> Value {
    let n = match value {
        Value::Vector(v) => v.len(),
        Value::String(s) => s.chars().count(),
        _ => 1,
    };
    Value::from(usize_to_f64(n))
}

/// The cell at column `x`, row `y`.
///
/// # Example
/// ```
/// use abacus::interpreter::Interpreter;
///
/// let interpreter = Interpreter::new();
/// let cell = interpreter.evaluate_str("get(<1, 2; 3, 4>, 0, 1)").unwrap();
/// assert_eq!(cell, interpreter.evaluate_str("3").unwrap());
/// assert!(interpreter.evaluate_str("get(<1, 2>, 2, 0)").is_err());
/// ```
pub fn get(vector: &Value, x: &Value, y: &Value) -> EvalResult<Value> {
    let matrix = as_matrix(vector, "get", 1)?;
    let x = index_arg(x, "get", 2)?;
    let y = index_arg(y, "get", 3)?;
    if x >= matrix.width() {
        return Err(RuntimeError::IndexOutOfBounds { max:   matrix.width().saturating_sub(1),
                                                    found: x, });
    }
    matrix.get(x, y)
          .map(Value::Number)
          .ok_or(RuntimeError::IndexOutOfBounds { max:   matrix.height().saturating_sub(1),
                                                  found: y, })
}

/// A `w x h` vector with every cell set to `value`.
pub fn fill(value: &Value, w: &Value, h: &Value) -> EvalResult<Value> {
    let cell = value.as_number()
                    .ok_or_else(|| type_error("fill", 1, KindSet::NUMBER, value))?;
    let width = index_arg(w, "fill", 2)?;
    let height = index_arg(h, "fill", 3)?;
    Vector::filled(width, height, cell).map(Value::Vector)
}

/// The `n x n` identity matrix.
pub fn ident(n: &Value) -> EvalResult<Value> {
    Vector::identity(index_arg(n, "ident", 1)?).map(Value::Vector)
}

/// Determinant of a square matrix by Gaussian elimination with partial
/// pivoting.
///
/// # Example
/// ```
/// use abacus::interpreter::Interpreter;
///
/// let interpreter = Interpreter::new();
/// assert_eq!(interpreter.evaluate_str("det(<2, 0; 0, 3>)").unwrap(),
///            interpreter.evaluate_str("6").unwrap());
/// assert_eq!(interpreter.evaluate_str("det(<0, 1; 1, 0>)").unwrap(),
///            interpreter.evaluate_str("-1").unwrap());
/// ```
pub fn det(value: &Value) -> EvalResult<Value> {
    let matrix = as_matrix(value, "det", 1)?;
    let n = matrix.width();
    if n != matrix.height() {
        return Err(RuntimeError::ShapeMismatch { details: format!("det needs a square matrix, found {}x{}",
                                                                  matrix.width(),
                                                                  matrix.height()) });
    }
    let mut rows: Vec<Vec<Number>> = matrix.cells().chunks(n.max(1)).map(<[Number]>::to_vec).collect();
    let mut determinant = ONE;

    for column in 0..n {
        let pivot = (column..n).max_by(|&a, &b| rows[a][column].abs().total_cmp(&rows[b][column].abs()))
                               .unwrap_or(column);
        if rows[pivot][column].is_zero() {
            return Ok(Value::Number(ZERO));
        }
        if pivot != column {
            rows.swap(pivot, column);
            determinant = -determinant;
        }
        let head = rows[column][column];
        determinant = determinant * head;
        for row in column + 1..n {
            let factor = rows[row][column].checked_div(head)?;
            for k in column..n {
                let scaled = factor * rows[column][k];
                rows[row][k] = rows[row][k].checked_sub(scaled)?;
            }
        }
    }
    Ok(Value::Number(determinant))
}

/// Matrix product of `a` (`m x k`) and `b` (`k x n`).
///
/// # Example
/// ```
/// use abacus::interpreter::Interpreter;
///
/// let interpreter = Interpreter::new();
/// let product = interpreter.evaluate_str("mmul(<1, 2; 3, 4>, <5; 6>)").unwrap();
/// assert_eq!(product, interpreter.evaluate_str("<17; 39>").unwrap());
/// ```
pub fn mmul(a: &Value, b: &Value) -> EvalResult<Value> {
    let a = as_matrix(a, "mmul", 1)?;
    let b = as_matrix(b, "mmul", 2)?;
    if a.width() != b.height() {
        return Err(RuntimeError::ShapeMismatch { details: format!("cannot multiply {}x{} by {}x{}",
                                                                  a.width(),
                                                                  a.height(),
                                                                  b.width(),
                                                                  b.height()) });
    }
    let (width, height) = (b.width(), a.height());
    let mut cells = reserve_cells(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let mut total = ZERO;
            for k in 0..a.width() {
                total = total.checked_add(a.get_or_zero(k, y) * b.get_or_zero(x, k))?;
            }
            cells.push(total);
        }
    }
    Vector::from_cells(width, height, cells).map(Value::Vector)
                                            .ok_or_else(|| RuntimeError::ShapeMismatch { details: format!("cannot build a {width}x{height} product") })
}
