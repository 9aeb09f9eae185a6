//! Gauss-Jordan inversion with partial pivoting.

use crate::error::{EngineError, Result};

use super::{Matrix, PIVOT_TOLERANCE};

/// Invert a square matrix using the default pivot tolerance.
pub fn invert(m: &Matrix) -> Result<Matrix> {
    invert_with_tolerance(m, PIVOT_TOLERANCE)
}

/// Invert a square matrix, failing if a selected pivot falls below `tolerance`.
///
/// The matrix is augmented to `[M | I]` and reduced in place until the left
/// half is the identity; the right half is then `M^-1`.
pub fn invert_with_tolerance(m: &Matrix, tolerance: f64) -> Result<Matrix> {
    if !m.is_square() {
        return Err(EngineError::dimension_mismatch(format!(
            "cannot invert a non-square {}x{} matrix",
            m.rows(),
            m.cols()
        )));
    }

    let n = m.rows();
    let w = 2 * n;
    let mut aug = vec![0.0; n * w];
    for i in 0..n {
        aug[i * w..i * w + n].copy_from_slice(m.row(i));
        aug[i * w + n + i] = 1.0;
    }

    for k in 0..n {
        // Find pivot
        let mut max_val = aug[k * w + k].abs();
        let mut max_row = k;
        for i in (k + 1)..n {
            let val = aug[i * w + k].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        if max_val < tolerance {
            tracing::debug!(column = k, pivot = max_val, "pivot below tolerance");
            return Err(EngineError::SingularMatrix {
                pivot: max_val,
                tolerance,
            });
        }

        // Swap rows if needed
        if max_row != k {
            for j in 0..w {
                aug.swap(k * w + j, max_row * w + j);
            }
        }

        // Normalise the pivot row
        let pivot = aug[k * w + k];
        for j in 0..w {
            aug[k * w + j] /= pivot;
        }

        // Eliminate the column from every other row
        for i in 0..n {
            if i == k {
                continue;
            }
            let factor = aug[i * w + k];
            if factor == 0.0 {
                continue;
            }
            for j in 0..w {
                aug[i * w + j] -= factor * aug[k * w + j];
            }
        }
    }

    let data = aug
        .chunks_exact(w)
        .flat_map(|row| row[n..].iter().copied())
        .collect();
    Matrix::from_row_major(n, n, data)
}
