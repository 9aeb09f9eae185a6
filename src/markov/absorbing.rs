//! Absorbing-chain analysis.
//!
//! With the states reordered so transient states come first, the transition
//! matrix has the canonical block form
//!
//! ```text
//! P = [ Q  R ]
//!     [ 0  I ]
//! ```
//!
//! where `Q` holds transient-to-transient and `R` transient-to-absorbing
//! probabilities. The fundamental matrix `N = (I - Q)^-1` counts expected
//! visits to each transient state, and `B = N * R` gives the probability of
//! ending in each absorbing state.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::matrix::{invert_with_tolerance, Matrix};

use super::{ChainConfig, TransitionMatrix};

/// Split of the state indices into transient and absorbing sets.
///
/// Both lists are sorted ascending and keep the original state indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsorbingPartition {
    num_states: usize,
    transient: Vec<usize>,
    absorbing: Vec<usize>,
}

impl AbsorbingPartition {
    /// Partition `0..num_states` given the absorbing state indices.
    ///
    /// Duplicates are ignored. Fails if an index is out of range, if no
    /// state is absorbing, or if every state is absorbing.
    pub fn new(num_states: usize, absorbing: &[usize]) -> Result<Self> {
        if let Some(&bad) = absorbing.iter().find(|&&s| s >= num_states) {
            return Err(EngineError::configuration(format!(
                "absorbing state {bad} is out of range for {num_states} states"
            )));
        }

        let mut absorbing = absorbing.to_vec();
        absorbing.sort_unstable();
        absorbing.dedup();
        if absorbing.is_empty() {
            return Err(EngineError::configuration(
                "absorbing chain needs at least one absorbing state",
            ));
        }

        let transient: Vec<usize> = (0..num_states)
            .filter(|s| absorbing.binary_search(s).is_err())
            .collect();
        if transient.is_empty() {
            return Err(EngineError::configuration(
                "absorbing chain needs at least one transient state",
            ));
        }

        Ok(Self {
            num_states,
            transient,
            absorbing,
        })
    }

    /// Total number of states.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Transient state indices, ascending.
    pub fn transient(&self) -> &[usize] {
        &self.transient
    }

    /// Absorbing state indices, ascending.
    pub fn absorbing(&self) -> &[usize] {
        &self.absorbing
    }

    /// Whether `state` was marked absorbing.
    pub fn is_absorbing(&self, state: usize) -> bool {
        self.absorbing.binary_search(&state).is_ok()
    }
}

/// Result of an absorbing-chain analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorbingAnalysis {
    partition: AbsorbingPartition,
    fundamental: Matrix,
    absorption_probabilities: Matrix,
    absorption: Option<Vec<f64>>,
    total_initial_value: f64,
}

impl AbsorbingAnalysis {
    /// The partition the analysis was computed for.
    pub fn partition(&self) -> &AbsorbingPartition {
        &self.partition
    }

    /// Fundamental matrix `N`, transient x transient.
    pub fn fundamental(&self) -> &Matrix {
        &self.fundamental
    }

    /// Absorption probability matrix `B`, transient x absorbing.
    pub fn absorption_probabilities(&self) -> &Matrix {
        &self.absorption_probabilities
    }

    /// Eventual population in each absorbing state, if initial values were
    /// supplied with a positive total.
    pub fn absorption(&self) -> Option<&[f64]> {
        self.absorption.as_deref()
    }

    /// Sum of the supplied initial values (0 when none were given).
    pub fn total_initial_value(&self) -> f64 {
        self.total_initial_value
    }

    /// Fraction of the initial total that ends in each absorbing state.
    pub fn absorption_shares(&self) -> Option<Vec<f64>> {
        let total = self.total_initial_value;
        self.absorption
            .as_ref()
            .map(|a| a.iter().map(|v| v / total).collect())
    }

    /// Expected number of steps before absorption from each transient
    /// state, `t = N * 1`.
    pub fn expected_steps(&self) -> Vec<f64> {
        self.fundamental.row_sums()
    }

    /// Probability that a chain started in transient state `from` is
    /// absorbed in state `to`, using original state indices.
    pub fn absorption_probability(&self, from: usize, to: usize) -> Option<f64> {
        let i = self.partition.transient.binary_search(&from).ok()?;
        let j = self.partition.absorbing.binary_search(&to).ok()?;
        Some(self.absorption_probabilities.get(i, j))
    }
}

/// Analyse an absorbing chain.
///
/// `initial_values` is an optional population over all `n` states (only the
/// transient entries are propagated). When their total is positive the
/// absorption vector is filled in; otherwise it is `None` and only `N` and
/// `B` are returned.
pub fn analyze_absorbing(
    p: &TransitionMatrix,
    partition: &AbsorbingPartition,
    initial_values: Option<&[f64]>,
    config: &ChainConfig,
) -> Result<AbsorbingAnalysis> {
    let n = p.num_states();
    if partition.num_states() != n {
        return Err(EngineError::dimension_mismatch(format!(
            "partition covers {} states, transition matrix has {n}",
            partition.num_states()
        )));
    }

    let values: &[f64] = match initial_values {
        Some(values) => {
            if values.len() != n {
                return Err(EngineError::dimension_mismatch(format!(
                    "initial values have {} entries, expected {n}",
                    values.len()
                )));
            }
            if let Some((i, v)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(EngineError::validation(format!(
                    "initial value {i} = {v} is not a non-negative number"
                )));
            }
            values
        }
        None => &[],
    };

    let transient = partition.transient();
    let absorbing = partition.absorbing();
    let q = p.matrix().select(transient, transient);
    let r = p.matrix().select(transient, absorbing);

    let fundamental = match invert_with_tolerance(&q.identity_minus()?, config.pivot_tolerance) {
        Ok(inverse) => inverse,
        Err(e) => {
            warn!(error = %e, "no fundamental matrix for absorbing chain");
            return Err(e);
        }
    };
    let absorption_probabilities = fundamental.multiply(&r)?;

    let total_initial_value: f64 = values.iter().sum();
    let absorption = (total_initial_value > 0.0).then(|| {
        let transient_values: Vec<f64> = transient.iter().map(|&i| values[i]).collect();
        absorption_probabilities.row_vector_product(&transient_values)
    });

    debug!(
        transient = transient.len(),
        absorbing = absorbing.len(),
        total_initial_value,
        "analysed absorbing chain"
    );

    Ok(AbsorbingAnalysis {
        partition: partition.clone(),
        fundamental,
        absorption_probabilities,
        absorption,
        total_initial_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gamblers_ruin() -> TransitionMatrix {
        TransitionMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.5, 0.0, 0.5, 0.0],
            vec![0.0, 0.5, 0.0, 0.5],
            vec![0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_partition_orders_and_dedups() {
        let part = AbsorbingPartition::new(5, &[4, 1, 4]).unwrap();
        assert_eq!(part.absorbing(), &[1, 4]);
        assert_eq!(part.transient(), &[0, 2, 3]);
        assert!(part.is_absorbing(4));
        assert!(!part.is_absorbing(0));
    }

    #[test]
    fn test_partition_errors() {
        assert!(matches!(
            AbsorbingPartition::new(3, &[0, 1, 2]),
            Err(EngineError::Configuration { .. })
        ));
        assert!(AbsorbingPartition::new(3, &[]).is_err());
        assert!(AbsorbingPartition::new(3, &[3]).is_err());
    }

    #[test]
    fn test_gamblers_ruin() {
        let p = gamblers_ruin();
        let part = AbsorbingPartition::new(4, &[0, 3]).unwrap();
        let values = [0.0, 30.0, 60.0, 0.0];
        let result =
            analyze_absorbing(&p, &part, Some(&values[..]), &ChainConfig::default()).unwrap();

        let b = result.absorption_probabilities();
        assert_abs_diff_eq!(b.get(0, 0), 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.get(0, 1), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.get(1, 0), 1.0 / 3.0, epsilon = 1e-12);
        for s in b.row_sums() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
        }

        for t in result.expected_steps() {
            assert_abs_diff_eq!(t, 2.0, epsilon = 1e-12);
        }

        let absorbed = result.absorption().unwrap();
        assert_abs_diff_eq!(absorbed[0], 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(absorbed[1], 50.0, epsilon = 1e-9);
        assert_eq!(result.total_initial_value(), 90.0);

        let shares = result.absorption_shares().unwrap();
        assert_abs_diff_eq!(shares[0], 4.0 / 9.0, epsilon = 1e-12);

        assert_abs_diff_eq!(
            result.absorption_probability(2, 3).unwrap(),
            2.0 / 3.0,
            epsilon = 1e-12
        );
        assert_eq!(result.absorption_probability(0, 3), None);
    }

    #[test]
    fn test_no_initial_values_omits_absorption_vector() {
        let p = gamblers_ruin();
        let part = AbsorbingPartition::new(4, &[0, 3]).unwrap();
        let config = ChainConfig::default();

        let none = analyze_absorbing(&p, &part, None, &config).unwrap();
        assert!(none.absorption().is_none());
        assert!(none.absorption_shares().is_none());

        let zeros = analyze_absorbing(&p, &part, Some(&[0.0; 4][..]), &config).unwrap();
        assert!(zeros.absorption().is_none());
        assert_eq!(zeros.fundamental().rows(), 2);
    }

    #[test]
    fn test_singular_fundamental() {
        // States 0 and 1 bounce between each other and never reach state 2
        let p = TransitionMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let part = AbsorbingPartition::new(3, &[2]).unwrap();
        let err = analyze_absorbing(&p, &part, None, &ChainConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::SingularMatrix { .. }));
    }

    #[test]
    fn test_rejects_negative_initial_values() {
        let p = gamblers_ruin();
        let part = AbsorbingPartition::new(4, &[0, 3]).unwrap();
        let config = ChainConfig::default();
        let err = analyze_absorbing(&p, &part, Some(&[0.0, -1.0, 2.0, 0.0][..]), &config)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));

        let err = analyze_absorbing(&p, &part, Some(&[1.0][..]), &config).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { .. }));
    }
}
