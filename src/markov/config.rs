//! Markov engine configuration.

use crate::error::{EngineError, Result};
use crate::matrix::{PIVOT_TOLERANCE, STOCHASTIC_TOLERANCE};

use super::DEFAULT_MAX_PERIODS;

/// Numeric tolerances and limits for Markov chain computations.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    /// Allowed deviation of a probability row sum from 1.
    pub stochastic_tolerance: f64,
    /// Smallest absolute pivot accepted when inverting `I - Q`.
    pub pivot_tolerance: f64,
    /// Largest period count accepted for regular-chain evolution.
    pub max_periods: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            stochastic_tolerance: STOCHASTIC_TOLERANCE,
            pivot_tolerance: PIVOT_TOLERANCE,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

impl ChainConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row-sum tolerance.
    pub fn with_stochastic_tolerance(mut self, tolerance: f64) -> Self {
        self.stochastic_tolerance = tolerance;
        self
    }

    /// Set the singular-pivot tolerance.
    ///
    /// Below roughly 1e-10 the fundamental matrix is dominated by rounding
    /// error; raising it makes near-singular chains fail earlier.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Set the maximum number of evolution periods.
    pub fn with_max_periods(mut self, max_periods: usize) -> Self {
        self.max_periods = max_periods;
        self
    }

    /// Check that both tolerances are finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stochastic_tolerance", self.stochastic_tolerance),
            ("pivot_tolerance", self.pivot_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::configuration(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
