use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::number::{Number, ZERO},
    },
};

/// A dense matrix of numbers stored row-major (`index = x + y * width`).
///
/// A row vector is a `width x 1` matrix; a single number promoted to a
/// vector is `1 x 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    width:  usize,
    height: usize,
    cells:  Vec<Number>,
}

/// Reserves room for `width * height` cells, reporting failure instead of
/// aborting.
pub fn reserve_cells(width: usize, height: usize) -> EvalResult<Vec<Number>> {
    let count = width.checked_mul(height)
                     .ok_or(RuntimeError::AllocationFailed { cells: usize::MAX })?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(count)
         .map_err(|_| RuntimeError::AllocationFailed { cells: count })?;
    Ok(cells)
}

impl Vector {
    /// Builds a vector from row-major cells.
    ///
    /// Returns `None` when the cell count does not match the shape.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, cells: Vec<Number>) -> Option<Self> {
        (width.checked_mul(height) == Some(cells.len())).then_some(Self { width,
                                                                          height,
                                                                          cells })
    }

    /// A `width x height` vector with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: Number) -> EvalResult<Self> {
        let mut cells = reserve_cells(width, height)?;
        cells.resize(width * height, value);
        Ok(Self { width,
                  height,
                  cells })
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> EvalResult<Self> {
        let mut matrix = Self::filled(n, n, ZERO)?;
        for i in 0..n {
            matrix.cells[i + i * n] = Number::real(1.0);
        }
        Ok(matrix)
    }

    /// A `1 x 1` vector holding `value`.
    #[must_use]
    pub fn scalar(value: Number) -> Self {
        Self { width:  1,
               height: 1,
               cells:  vec![value], }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Number] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Number] {
        &mut self.cells
    }

    /// Cell at column `x`, row `y`, if it exists.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Number> {
        if x < self.width && y < self.height {
            self.cells.get(x + y * self.width).copied()
        } else {
            None
        }
    }

    /// Cell at column `x`, row `y`, reading zero outside the shape.
    #[must_use]
    pub fn get_or_zero(&self, x: usize, y: usize) -> Number {
        self.get(x, y).unwrap_or(ZERO)
    }

    /// Swaps rows and columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for x in 0..self.width {
            for y in 0..self.height {
                cells.push(self.cells[x + y * self.width]);
            }
        }
        Self { width: self.height,
               height: self.width,
               cells }
    }

    /// Sum of `real + imag` over all cells.
    #[must_use]
    pub fn flatten(&self) -> f64 {
        self.cells.iter().map(Number::flatten).sum()
    }

    /// Applies `f` to every cell in place.
    pub fn try_map_in_place(&mut self, f: impl Fn(Number) -> EvalResult<Number>) -> EvalResult<()> {
        for cell in &mut self.cells {
            *cell = f(*cell)?;
        }
        Ok(())
    }
}

/// Renders as `<a,b;c,d>`.
impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (index, cell) in self.cells.iter().enumerate() {
            if index > 0 {
                if index % self.width == 0 {
                    write!(f, "; ")?;
                } else {
                    write!(f, ", ")?;
                }
            }
            write!(f, "{cell}")?;
        }
        write!(f, ">")
    }
}
