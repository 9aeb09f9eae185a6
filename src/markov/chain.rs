//! Validated chain inputs.

use std::ops::Index;

use crate::error::{EngineError, Result};
use crate::matrix::{validate_distribution, Matrix, STOCHASTIC_TOLERANCE};

use super::{MAX_STATES, MIN_STATES};

/// A row-stochastic `n x n` transition matrix with `n` in `2..=10`.
///
/// Row `i` holds the probabilities of moving from state `i` to each state in
/// one period. Construction rejects negative entries and rows whose sum is
/// not 1 within the tolerance; nothing is normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    matrix: Matrix,
}

impl TransitionMatrix {
    /// Validate a matrix using the default row-sum tolerance.
    pub fn new(matrix: Matrix) -> Result<Self> {
        Self::with_tolerance(matrix, STOCHASTIC_TOLERANCE)
    }

    /// Validate a matrix using a custom row-sum tolerance.
    pub fn with_tolerance(matrix: Matrix, tolerance: f64) -> Result<Self> {
        if !matrix.is_square() {
            return Err(EngineError::configuration(format!(
                "transition matrix must be square, got {}x{}",
                matrix.rows(),
                matrix.cols()
            )));
        }
        let n = matrix.rows();
        if !(MIN_STATES..=MAX_STATES).contains(&n) {
            return Err(EngineError::configuration(format!(
                "number of states must be in {MIN_STATES}..={MAX_STATES}, got {n}"
            )));
        }
        for (i, row) in matrix.iter_rows().enumerate() {
            validate_distribution(row, tolerance, &format!("row {i}"))?;
        }
        Ok(Self { matrix })
    }

    /// Validate nested rows using the default tolerance.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(Matrix::from_rows(rows)?)
    }

    /// Number of states `n`.
    pub fn num_states(&self) -> usize {
        self.matrix.rows()
    }

    /// Probability of moving from `from` to `to` in one period.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

/// A probability distribution over the states of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    probs: Vec<f64>,
}

impl StateVector {
    /// Validate a distribution using the default tolerance.
    pub fn new(probs: Vec<f64>) -> Result<Self> {
        Self::with_tolerance(probs, STOCHASTIC_TOLERANCE)
    }

    /// Validate a distribution using a custom tolerance.
    pub fn with_tolerance(probs: Vec<f64>, tolerance: f64) -> Result<Self> {
        if probs.is_empty() {
            return Err(EngineError::configuration("state vector is empty"));
        }
        validate_distribution(&probs, tolerance, "state vector")?;
        Ok(Self { probs })
    }

    /// Wrap a vector produced by the engine itself (already a distribution).
    pub(crate) fn from_evolved(probs: Vec<f64>) -> Self {
        Self { probs }
    }

    /// A point mass on `state`.
    pub fn certain(num_states: usize, state: usize) -> Result<Self> {
        if state >= num_states {
            return Err(EngineError::configuration(format!(
                "state {state} is out of range for {num_states} states"
            )));
        }
        let mut probs = vec![0.0; num_states];
        probs[state] = 1.0;
        Ok(Self { probs })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always false for a validated vector; provided alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Probabilities as a slice.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Consume into the raw probabilities.
    pub fn into_inner(self) -> Vec<f64> {
        self.probs
    }
}

impl Index<usize> for StateVector {
    type Output = f64;

    fn index(&self, state: usize) -> &f64 {
        &self.probs[state]
    }
}
