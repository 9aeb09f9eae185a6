//! Request dispatch.
//!
//! [`Engine::compute`] is the single entry point a front-end needs: it takes
//! a fully resolved [`Request`], validates it and returns a tagged
//! [`Outcome`] or an [`EngineError`]. The engine holds nothing but its
//! configuration, so one instance can serve any number of independent
//! requests concurrently.

use std::fmt;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::markov::{
    analyze_absorbing, evolve_vector, AbsorbingAnalysis, AbsorbingPartition, ChainConfig,
    EvolutionSummary, MatrixPowers, StateVector, TransitionMatrix,
};
use crate::matrix::Matrix;
use crate::queue::{self, QueueInsight, QueueMetrics, QueueModel, QueueParameters};

/// Discriminant identifying which computation produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    RegularMatrix,
    RegularVector,
    Absorbing,
    QueueMm1,
    QueueMmc,
    QueueMmck,
}

impl ModelKind {
    /// Stable tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::RegularMatrix => "regular-matrix",
            ModelKind::RegularVector => "regular-vector",
            ModelKind::Absorbing => "absorbing",
            ModelKind::QueueMm1 => "queue-mm1",
            ModelKind::QueueMmc => "queue-mmc",
            ModelKind::QueueMmck => "queue-mmck",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QueueModel> for ModelKind {
    fn from(model: QueueModel) -> Self {
        match model {
            QueueModel::Mm1 => ModelKind::QueueMm1,
            QueueModel::Mmc { .. } => ModelKind::QueueMmc,
            QueueModel::Mmck { .. } => ModelKind::QueueMmck,
        }
    }
}

/// A fully resolved computation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Multi-step transition matrices for periods `0..=periods`.
    MatrixPowers {
        transition: Vec<Vec<f64>>,
        periods: usize,
    },
    /// Evolution of an initial distribution.
    VectorEvolution {
        transition: Vec<Vec<f64>>,
        initial: Vec<f64>,
        periods: usize,
    },
    /// Fundamental-matrix analysis of an absorbing chain.
    Absorbing {
        transition: Vec<Vec<f64>>,
        absorbing_states: Vec<usize>,
        initial_values: Option<Vec<f64>>,
    },
    /// Steady-state queue metrics.
    Queue {
        model: QueueModel,
        arrival_rate: f64,
        service_rate: f64,
    },
}

impl Request {
    /// The kind of outcome this request produces on success.
    pub fn kind(&self) -> ModelKind {
        match self {
            Request::MatrixPowers { .. } => ModelKind::RegularMatrix,
            Request::VectorEvolution { .. } => ModelKind::RegularVector,
            Request::Absorbing { .. } => ModelKind::Absorbing,
            Request::Queue { model, .. } => ModelKind::from(*model),
        }
    }
}

/// Result of a successful computation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    MatrixPowers(Vec<Matrix>),
    VectorEvolution {
        history: Vec<StateVector>,
        summary: EvolutionSummary,
    },
    Absorbing(AbsorbingAnalysis),
    Queue {
        model: QueueModel,
        metrics: QueueMetrics,
        insight: QueueInsight,
    },
}

impl Outcome {
    pub fn kind(&self) -> ModelKind {
        match self {
            Outcome::MatrixPowers(_) => ModelKind::RegularMatrix,
            Outcome::VectorEvolution { .. } => ModelKind::RegularVector,
            Outcome::Absorbing(_) => ModelKind::Absorbing,
            Outcome::Queue { model, .. } => ModelKind::from(*model),
        }
    }
}

/// Stateless computation engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ChainConfig,
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom chain configuration.
    pub fn with_config(config: ChainConfig) -> Self {
        Self { config }
    }

    /// The chain configuration in use.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Validate `request` and run it.
    pub fn compute(&self, request: &Request) -> Result<Outcome> {
        self.config.validate()?;
        debug!(kind = %request.kind(), "computing request");

        match request {
            Request::MatrixPowers {
                transition,
                periods,
            } => {
                let p = self.transition(transition)?;
                let powers = MatrixPowers::new(&p, *periods, &self.config)?;
                Ok(Outcome::MatrixPowers(powers.iter().collect()))
            }

            Request::VectorEvolution {
                transition,
                initial,
                periods,
            } => {
                let p = self.transition(transition)?;
                let v0 =
                    StateVector::with_tolerance(initial.clone(), self.config.stochastic_tolerance)?;
                let history = evolve_vector(&v0, &p, *periods, &self.config)?;
                let summary = EvolutionSummary::from_history(&history)
                    .ok_or_else(|| EngineError::configuration("evolution produced no periods"))?;
                Ok(Outcome::VectorEvolution { history, summary })
            }

            Request::Absorbing {
                transition,
                absorbing_states,
                initial_values,
            } => {
                // Partition problems are reported before any matrix work
                let partition = AbsorbingPartition::new(transition.len(), absorbing_states)?;
                let p = self.transition(transition)?;
                let analysis =
                    analyze_absorbing(&p, &partition, initial_values.as_deref(), &self.config)?;
                Ok(Outcome::Absorbing(analysis))
            }

            Request::Queue {
                model,
                arrival_rate,
                service_rate,
            } => {
                let params = QueueParameters::new(*arrival_rate, *service_rate)?;
                let metrics = queue::evaluate(*model, &params)?;
                Ok(Outcome::Queue {
                    model: *model,
                    metrics,
                    insight: QueueInsight::from_metrics(&metrics),
                })
            }
        }
    }

    fn transition(&self, rows: &[Vec<f64>]) -> Result<TransitionMatrix> {
        TransitionMatrix::with_tolerance(
            Matrix::from_rows(rows.to_vec())?,
            self.config.stochastic_tolerance,
        )
    }
}

/// Run `request` with the default configuration.
pub fn compute(request: &Request) -> Result<Outcome> {
    Engine::new().compute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_kind_tags() {
        let request = Request::Queue {
            model: QueueModel::Mmck {
                servers: 2,
                capacity: 6,
            },
            arrival_rate: 3.0,
            service_rate: 2.0,
        };
        assert_eq!(request.kind().as_str(), "queue-mmck");
        let outcome = compute(&request).unwrap();
        assert_eq!(outcome.kind(), ModelKind::QueueMmck);
    }

    #[test]
    fn test_matrix_powers_request() {
        let outcome = compute(&Request::MatrixPowers {
            transition: vec![vec![0.5, 0.5], vec![0.1, 0.9]],
            periods: 3,
        })
        .unwrap();
        match outcome {
            Outcome::MatrixPowers(ms) => assert_eq!(ms.len(), 4),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_invalid_row_declines() {
        let err = compute(&Request::VectorEvolution {
            transition: vec![vec![0.5, 0.4], vec![0.1, 0.9]],
            initial: vec![1.0, 0.0],
            periods: 2,
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = compute(&Request::VectorEvolution {
            transition: vec![vec![0.5, 0.5], vec![0.1, 0.9]],
            initial: vec![0.7, 0.7],
            periods: 2,
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_all_absorbing_is_configuration_error() {
        // Rows are not even stochastic; the partition check comes first
        let err = compute(&Request::Absorbing {
            transition: vec![vec![1.0, 0.5], vec![0.0, 1.0]],
            absorbing_states: vec![0, 1],
            initial_values: None,
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_custom_tolerance() {
        let request = Request::MatrixPowers {
            transition: vec![vec![0.5, 0.49], vec![0.1, 0.9]],
            periods: 1,
        };
        assert!(compute(&request).is_err());
        let loose = Engine::with_config(ChainConfig::new().with_stochastic_tolerance(0.05));
        assert!(loose.compute(&request).is_ok());
    }
}
