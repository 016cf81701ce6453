//! # Integer Matrix Module
//!
//! ## Aim
//! Dense integer matrix with exact Gauss-Jordan elimination for the balancing
//! linear system. No floating point anywhere: rows stay integral, are divided
//! by their gcd after every combination, and every cell operation goes
//! through the checked arithmetic helpers, so an overflow is a reported
//! failure instead of a wrong answer.
//!
//! ## Elimination
//! `gauss_jordan_eliminate` brings the matrix to a reduced row echelon form
//! whose leading coefficients are not normalized to 1:
//! 1. every row is simplified (divided by its gcd, leading entry made
//!    positive);
//! 2. forward pass: per column, the first row at or below the pivot count
//!    with a non-zero entry is swapped into pivot position and used to
//!    eliminate the column below it via gcd-scaled integer combinations;
//! 3. backward pass: from the last row up, each row's leading column is
//!    eliminated from all rows above it the same way.

use crate::Utils::checked_math::{ArithmeticError, checked_add, checked_mul, gcd};
use nalgebra::DMatrix;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Index out of bounds: ({row}, {col})")]
    IndexOutOfBounds { row: usize, col: usize },
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// A rows x cols grid of exact integers.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    cells: DMatrix<i64>,
}

impl Matrix {
    /// Zero-filled matrix of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: DMatrix::zeros(rows, cols),
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.nrows()
    }

    pub fn column_count(&self) -> usize {
        self.cells.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<i64, MatrixError> {
        self.check_bounds(row, col)?;
        Ok(self.cells[(row, col)])
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), MatrixError> {
        self.check_bounds(row, col)?;
        self.cells[(row, col)] = value;
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(MatrixError::IndexOutOfBounds { row, col });
        }
        Ok(())
    }

    fn row(&self, row: usize) -> Vec<i64> {
        (0..self.column_count()).map(|c| self.cells[(row, c)]).collect()
    }

    fn store_row(&mut self, row: usize, values: &[i64]) {
        for (c, &v) in values.iter().enumerate() {
            self.cells[(row, c)] = v;
        }
    }

    /// Replaces `target` with `target * (pivot/g) + source * (-target[col]/g)`
    /// where `g = gcd(pivot, target[col])`, then re-simplifies it. This zeroes
    /// `target[col]` without ever leaving the integers.
    fn eliminate_with(
        &mut self,
        target: usize,
        source: usize,
        col: usize,
        pivot: i64,
    ) -> Result<(), ArithmeticError> {
        let g = gcd(pivot, self.cells[(target, col)]);
        let scaled_target = multiply_row(&self.row(target), pivot / g)?;
        let scaled_source = multiply_row(&self.row(source), -(self.cells[(target, col)] / g))?;
        let combined = add_rows(&scaled_target, &scaled_source)?;
        self.store_row(target, &simplify_row(&combined));
        Ok(())
    }

    /// In-place reduction to a (non-normalized) reduced row echelon form
    /// using only integer row operations.
    pub fn gauss_jordan_eliminate(&mut self) -> Result<(), MatrixError> {
        let rows = self.row_count();
        let cols = self.column_count();

        for r in 0..rows {
            let simplified = simplify_row(&self.row(r));
            self.store_row(r, &simplified);
        }

        // forward: row echelon form
        let mut num_pivots = 0;
        for col in 0..cols {
            let mut pivot_row = num_pivots;
            while pivot_row < rows && self.cells[(pivot_row, col)] == 0 {
                pivot_row += 1;
            }
            if pivot_row == rows {
                continue;
            }
            let pivot = self.cells[(pivot_row, col)];
            self.cells.swap_rows(num_pivots, pivot_row);
            let pivot_index = num_pivots;
            num_pivots += 1;

            for below in num_pivots..rows {
                self.eliminate_with(below, pivot_index, col, pivot)?;
            }
        }

        // backward: clear each leading column above its row
        for r in (0..rows).rev() {
            let Some(pivot_col) = (0..cols).find(|&c| self.cells[(r, c)] != 0) else {
                continue;
            };
            let pivot = self.cells[(r, pivot_col)];
            for above in (0..r).rev() {
                self.eliminate_with(above, r, pivot_col, pivot)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.row_count() {
            let row: Vec<String> = (0..self.column_count())
                .map(|c| self.cells[(r, c)].to_string())
                .collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

/// Element-wise checked sum of two rows.
fn add_rows(x: &[i64], y: &[i64]) -> Result<Vec<i64>, ArithmeticError> {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| checked_add(a, b))
        .collect()
}

/// Row scaled by a constant, checked.
fn multiply_row(x: &[i64], scalar: i64) -> Result<Vec<i64>, ArithmeticError> {
    x.iter().map(|&v| checked_mul(v, scalar)).collect()
}

/// Gcd of all entries of a row; 0 for an all-zero row.
fn gcd_row(x: &[i64]) -> i64 {
    x.iter().fold(0, |acc, &v| gcd(v, acc))
}

/// Divides the row by its gcd and flips signs so the leading non-zero entry
/// is positive; an all-zero row is returned unchanged.
fn simplify_row(x: &[i64]) -> Vec<i64> {
    let sign = match x.iter().find(|&&v| v != 0) {
        Some(&v) if v > 0 => 1,
        Some(_) => -1,
        None => return x.to_vec(),
    };
    let g = gcd_row(x) * sign;
    x.iter().map(|&v| v / g).collect()
}
