//! Regular-chain evolution.
//!
//! Two views of the same process:
//!
//! - [`MatrixPowers`] walks the multi-step transition matrices `P, P^2, ...`
//! - [`evolve_vector`] pushes an initial distribution forward, `v_p = v_{p-1} * P`
//!
//! Both iterate literally for the requested number of periods; there is no
//! early exit once the chain has reached its stationary distribution.

use std::iter::FusedIterator;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::matrix::Matrix;

use super::{ChainConfig, StateVector, TransitionMatrix};

fn check_periods(periods: usize, config: &ChainConfig) -> Result<()> {
    if periods > config.max_periods {
        return Err(EngineError::configuration(format!(
            "number of periods must be at most {}, got {periods}",
            config.max_periods
        )));
    }
    Ok(())
}

/// The sequence of multi-step transition matrices for periods `0..=T`.
///
/// Period `p` holds `P^(p+1)`: period 0 is the one-step matrix itself. The
/// sequence is computed lazily and can be iterated any number of times; each
/// pass recomputes the products from scratch.
#[derive(Debug, Clone, Copy)]
pub struct MatrixPowers<'a> {
    base: &'a TransitionMatrix,
    periods: usize,
}

impl<'a> MatrixPowers<'a> {
    /// Create the sequence for `periods` periods after the first.
    pub fn new(base: &'a TransitionMatrix, periods: usize, config: &ChainConfig) -> Result<Self> {
        check_periods(periods, config)?;
        Ok(Self { base, periods })
    }

    /// Number of matrices in the sequence, `T + 1`.
    pub fn len(&self) -> usize {
        self.periods + 1
    }

    /// Never empty: period 0 always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the matrices, starting from `P`.
    pub fn iter(&self) -> PowersIter<'a> {
        PowersIter {
            base: self.base.matrix(),
            current: None,
            remaining: self.len(),
        }
    }

    /// The matrix for the final period.
    pub fn last(&self) -> Matrix {
        // The sequence always holds at least the base matrix
        self.iter()
            .last()
            .unwrap_or_else(|| self.base.matrix().clone())
    }
}

impl<'a> IntoIterator for &MatrixPowers<'a> {
    type Item = Matrix;
    type IntoIter = PowersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`MatrixPowers`].
#[derive(Debug, Clone)]
pub struct PowersIter<'a> {
    base: &'a Matrix,
    current: Option<Matrix>,
    remaining: usize,
}

impl Iterator for PowersIter<'_> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let next = match self.current.take() {
            None => self.base.clone(),
            Some(m) => m.product(self.base),
        };
        self.current = Some(next.clone());
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PowersIter<'_> {}

impl FusedIterator for PowersIter<'_> {}

/// Build the matrix-power sequence with the default configuration.
pub fn matrix_powers(base: &TransitionMatrix, periods: usize) -> Result<MatrixPowers<'_>> {
    MatrixPowers::new(base, periods, &ChainConfig::default())
}

/// Evolve `initial` through `periods` steps of `p`.
///
/// Returns `[v0, v1, ..., vT]`, so the result always has `periods + 1`
/// entries.
pub fn evolve_vector(
    initial: &StateVector,
    p: &TransitionMatrix,
    periods: usize,
    config: &ChainConfig,
) -> Result<Vec<StateVector>> {
    check_periods(periods, config)?;
    if initial.len() != p.num_states() {
        return Err(EngineError::dimension_mismatch(format!(
            "initial vector has {} states, transition matrix has {}",
            initial.len(),
            p.num_states()
        )));
    }

    let mut history = Vec::with_capacity(periods + 1);
    history.push(initial.clone());
    for period in 1..=periods {
        let prev = history[period - 1].probs();
        let next = p.matrix().row_vector_product(prev);
        history.push(StateVector::from_evolved(next));
    }

    debug!(states = p.num_states(), periods, "evolved state vector");
    Ok(history)
}
