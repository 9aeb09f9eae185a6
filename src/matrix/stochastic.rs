//! Probability row checks.

use crate::error::{EngineError, Result};

/// Sum a row, treating absent (non-finite) entries as zero.
pub fn row_sum(row: &[f64]) -> f64 {
    row.iter().filter(|v| v.is_finite()).sum()
}

/// Check that a row sums to 1 within `tolerance`, returning the sum.
///
/// Entries are summed with [`row_sum`], so missing values count as zero but
/// still leave the row short of 1.
pub fn validate_stochastic_row(row: &[f64], tolerance: f64) -> Result<f64> {
    let sum = row_sum(row);
    if (sum - 1.0).abs() < tolerance {
        Ok(sum)
    } else {
        Err(EngineError::validation(format!(
            "probabilities sum to {sum:.6}, expected 1 within {tolerance:e}"
        )))
    }
}

/// Strict check for a probability distribution: every entry finite and
/// non-negative, and the total within `tolerance` of 1.
pub(crate) fn validate_distribution(values: &[f64], tolerance: f64, label: &str) -> Result<()> {
    if let Some((j, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(EngineError::validation(format!(
            "{label}: entry {j} = {v} is not a non-negative number"
        )));
    }
    validate_stochastic_row(values, tolerance)
        .map(|_| ())
        .map_err(|e| match e {
            EngineError::Validation { message } => {
                EngineError::validation(format!("{label}: {message}"))
            }
            other => other,
        })
}
