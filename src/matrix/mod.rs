//! Dense matrix primitives.
//!
//! This module provides the small amount of linear algebra the Markov engine
//! needs. Matrices are at most a few dozen entries on a side, so everything
//! is a straightforward row-major `Vec<f64>` with triple-loop products.
//!
//! ## Inversion
//!
//! [`invert`] runs Gauss-Jordan elimination on the augmented matrix `[M | I]`
//! with partial pivoting. In every elimination column the row holding the
//! largest absolute value is swapped into place; if even that pivot is below
//! the tolerance the matrix is reported as singular.

mod inverse;
mod stochastic;

pub use inverse::{invert, invert_with_tolerance};
pub use stochastic::{row_sum, validate_stochastic_row};

pub(crate) use stochastic::validate_distribution;

use std::fmt;

use crate::error::{EngineError, Result};

/// Smallest absolute pivot accepted during elimination.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Allowed deviation of a probability row sum from 1.
pub const STOCHASTIC_TOLERANCE: f64 = 1e-4;

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build a matrix from nested rows.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(EngineError::dimension_mismatch(
                "matrix must have at least one row and one column",
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(EngineError::dimension_mismatch(format!(
                "row {i} has {} entries, expected {cols}",
                row.len()
            )));
        }

        let n_rows = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            rows: n_rows,
            cols,
        })
    }

    /// Build a matrix from a row-major buffer.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EngineError::dimension_mismatch(format!(
                "buffer of {} values cannot fill a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow one row.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.iter_rows().map(|r| r.iter().sum()).collect()
    }

    /// Extract the submatrix at the given row and column indices, in order.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut out = Self::zeros(rows.len(), cols.len());
        for (i, &r) in rows.iter().enumerate() {
            for (j, &c) in cols.iter().enumerate() {
                out.set(i, j, self.get(r, c));
            }
        }
        out
    }

    /// Compute `I - self` for a square matrix.
    pub fn identity_minus(&self) -> Result<Self> {
        if !self.is_square() {
            return Err(EngineError::dimension_mismatch(format!(
                "I - M needs a square matrix, got {}x{}",
                self.rows, self.cols
            )));
        }
        let mut out = Self::identity(self.rows);
        for (o, v) in out.data.iter_mut().zip(&self.data) {
            *o -= v;
        }
        Ok(out)
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Self> {
        if self.cols != other.rows {
            return Err(EngineError::dimension_mismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(self.product(other))
    }

    /// Row-vector product `v * self`.
    pub fn left_multiply(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.rows {
            return Err(EngineError::dimension_mismatch(format!(
                "cannot multiply a length-{} row vector by a {}x{} matrix",
                v.len(),
                self.rows,
                self.cols
            )));
        }
        Ok(self.row_vector_product(v))
    }

    /// Product without the shape check, for callers that already know the
    /// operands line up.
    pub(crate) fn product(&self, other: &Matrix) -> Self {
        debug_assert_eq!(self.cols, other.rows);
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                out.set(i, j, sum);
            }
        }
        out
    }

    pub(crate) fn row_vector_product(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        (0..self.cols)
            .map(|j| (0..self.rows).map(|k| v[k] * self.get(k, j)).sum())
            .collect()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        for row in self.iter_rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>10.precision$}")).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Matrix product `a * b`.
///
/// Fails with [`EngineError::DimensionMismatch`] when `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    a.multiply(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_multiply_rectangular() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0], vec![8.0], vec![9.0]]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 1);
        assert_abs_diff_eq!(c.get(0, 0), 50.0);
        assert_abs_diff_eq!(c.get(1, 0), 122.0);
    }

    #[test]
    fn test_multiply_shape_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        let err = multiply(&a, &b).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 entries"));
        assert!(Matrix::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_left_multiply() {
        let p = m(vec![vec![0.9, 0.1], vec![0.5, 0.5]]);
        let v = p.left_multiply(&[1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(v[0], 0.9);
        assert_abs_diff_eq!(v[1], 0.1);
        assert!(p.left_multiply(&[1.0]).is_err());
    }

    #[test]
    fn test_select_and_identity_minus() {
        let p = m(vec![
            vec![0.5, 0.2, 0.3],
            vec![0.3, 0.4, 0.3],
            vec![0.0, 0.0, 1.0],
        ]);
        let q = p.select(&[0, 1], &[0, 1]);
        assert_eq!(q.to_rows(), vec![vec![0.5, 0.2], vec![0.3, 0.4]]);

        let iq = q.identity_minus().unwrap();
        assert_abs_diff_eq!(iq.get(0, 0), 0.5);
        assert_abs_diff_eq!(iq.get(0, 1), -0.2);
        assert_abs_diff_eq!(iq.get(1, 1), 0.6);

        assert!(p.select(&[0], &[0, 1]).identity_minus().is_err());
    }

    #[test]
    fn test_row_sums() {
        let p = m(vec![vec![0.25, 0.75], vec![0.6, 0.4]]);
        for s in p.row_sums() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-12);
        }
    }
}
