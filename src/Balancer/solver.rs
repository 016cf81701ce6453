//! # Balancer Orchestration Module
//!
//! ## Aim
//! Builds the conservation linear system from a parsed [`Equation`], runs the
//! exact elimination, extracts the smallest positive integer coefficients and
//! re-verifies them independently before returning.
//!
//! ## Pipeline
//! `balance` = `build_matrix` -> `solve` -> `extract_coefficients` ->
//! `check_answer`. One row per distinct element name (the synthetic `"e"`
//! charge row included) plus a spare row for the pinning constraint; one
//! column per term, left side positive, right side negated, plus the
//! augmented column.
//!
//! ## Error Taxonomy
//! `NoSolution` (only the trivial all-zero solution exists),
//! `NoUniqueSolution` (underdetermined system), `Overflow` (checked
//! arithmetic bound exceeded) are user-facing outcomes of bad or pathological
//! input. `Internal` marks a failed self-check after solving - a defect, not
//! bad input - and callers should surface it as such.

use crate::Balancer::matrix::{Matrix, MatrixError};
use crate::Formulas::chem_types::Equation;
use crate::Utils::checked_math::{ArithmeticError, checked_add, checked_mul, lcm};
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("No solution: the equation cannot be balanced")]
    NoSolution,
    #[error("No unique solution: the equation can be balanced in multiple independent ways")]
    NoUniqueSolution,
    #[error("Arithmetic overflow while balancing")]
    Overflow,
    #[error("Internal consistency failure: {0}")]
    Internal(String),
}

impl From<ArithmeticError> for BalanceError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow => BalanceError::Overflow,
            ArithmeticError::NotANumber(_) => BalanceError::Internal(err.to_string()),
        }
    }
}

impl From<MatrixError> for BalanceError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::Arithmetic(inner) => inner.into(),
            MatrixError::IndexOutOfBounds { .. } => BalanceError::Internal(err.to_string()),
        }
    }
}

/// Balances the equation, returning one coefficient per term in left-to-right
/// order.
pub fn balance(eqn: &Equation) -> Result<Vec<i64>, BalanceError> {
    let mut matrix = build_matrix(eqn)?;
    solve(&mut matrix)?;
    debug!("solved system:\n{}", matrix);
    let coefs = extract_coefficients(&matrix)?;
    check_answer(eqn, &coefs)?;
    info!("balanced with coefficients {:?}", coefs);
    Ok(coefs)
}

/// Conservation matrix of the equation: cell `(i, j)` is the signed count of
/// element `i` in term `j`.
pub fn build_matrix(eqn: &Equation) -> Result<Matrix, BalanceError> {
    let elems = eqn.get_elements();
    let rows = elems.len() + 1;
    let cols = eqn.term_count() + 1;
    debug!(
        "building {}x{} matrix over elements {:?}",
        rows,
        cols,
        elems.names()
    );
    let mut matrix = Matrix::new(rows, cols);
    for (i, name) in elems.names().iter().enumerate() {
        let mut j = 0;
        for term in eqn.get_left_side() {
            matrix.set(i, j, term.count_element(name)?)?;
            j += 1;
        }
        for term in eqn.get_right_side() {
            matrix.set(i, j, -term.count_element(name)?)?;
            j += 1;
        }
    }
    Ok(matrix)
}

/// Eliminates once; if every equation row constrains at most one variable the
/// only consistent solution is all-zero and the system is unsolvable.
/// Otherwise one free variable is pinned to 1 through the spare last row and
/// the elimination is re-run to resolve the rest in terms of it.
pub fn solve(matrix: &mut Matrix) -> Result<(), BalanceError> {
    matrix.gauss_jordan_eliminate()?;

    let rows = matrix.row_count();
    let cols = matrix.column_count();
    let mut ambiguous_row = None;
    for row in 0..rows - 1 {
        if count_nonzero_coeffs(matrix, row)? > 1 {
            ambiguous_row = Some(row);
            break;
        }
    }
    let Some(row) = ambiguous_row else {
        return Err(BalanceError::NoSolution);
    };

    matrix.set(rows - 1, row, 1)?;
    matrix.set(rows - 1, cols - 1, 1)?;
    matrix.gauss_jordan_eliminate()?;
    Ok(())
}

fn count_nonzero_coeffs(matrix: &Matrix, row: usize) -> Result<usize, BalanceError> {
    let mut count = 0;
    for col in 0..matrix.column_count() {
        if matrix.get(row, col)? != 0 {
            count += 1;
        }
    }
    Ok(count)
}

/// Reads the solved variables off the diagonal and scales them by the lcm of
/// the pivot entries, clearing all denominators at once.
pub fn extract_coefficients(matrix: &Matrix) -> Result<Vec<i64>, BalanceError> {
    let rows = matrix.row_count();
    let cols = matrix.column_count();
    if cols - 1 > rows || matrix.get(cols - 2, cols - 2)? == 0 {
        return Err(BalanceError::NoUniqueSolution);
    }

    let mut scale = 1;
    for i in 0..cols - 1 {
        let diag = matrix.get(i, i)?;
        if diag == 0 {
            return Err(BalanceError::NoUniqueSolution);
        }
        scale = lcm(scale, diag)?;
    }

    let mut coefs = Vec::with_capacity(cols - 1);
    let mut all_zero = true;
    for i in 0..cols - 1 {
        let coef = checked_mul(scale / matrix.get(i, i)?, matrix.get(i, cols - 1)?)?;
        all_zero &= coef == 0;
        coefs.push(coef);
    }
    if all_zero {
        return Err(BalanceError::Internal("all-zero solution".to_string()));
    }
    Ok(coefs)
}

/// Independent re-verification: every element (charge included) must balance
/// to exactly zero under the extracted coefficients. A violation here is a
/// defect in the solver, never a property of the input.
pub fn check_answer(eqn: &Equation, coefs: &[i64]) -> Result<(), BalanceError> {
    if coefs.len() != eqn.term_count() {
        return Err(BalanceError::Internal(format!(
            "mismatched lengths: {} terms, {} coefficients",
            eqn.term_count(),
            coefs.len()
        )));
    }
    if coefs.iter().all(|&c| c == 0) {
        return Err(BalanceError::Internal("solution of all zeros".to_string()));
    }

    for name in eqn.get_elements().names() {
        let mut sum = 0;
        let mut j = 0;
        for term in eqn.get_left_side() {
            sum = checked_add(sum, checked_mul(term.count_element(name)?, coefs[j])?)?;
            j += 1;
        }
        for term in eqn.get_right_side() {
            sum = checked_add(sum, checked_mul(term.count_element(name)?, -coefs[j])?)?;
            j += 1;
        }
        if sum != 0 {
            return Err(BalanceError::Internal(format!(
                "balance failed for element \"{}\"",
                name
            )));
        }
    }
    Ok(())
}
