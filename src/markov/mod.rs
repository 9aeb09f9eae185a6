//! Discrete-time finite Markov chains.
//!
//! Two families of analysis are supported:
//!
//! - **Regular chains**: the multi-step matrices `P, P^2, ..., P^(T+1)`
//!   ([`MatrixPowers`]) or the evolution of an initial distribution
//!   ([`evolve_vector`]), optionally summarised by [`EvolutionSummary`].
//! - **Absorbing chains**: the fundamental matrix `N = (I - Q)^-1`, the
//!   absorption probabilities `B = N * R` and, given an initial population,
//!   where that population ends up ([`analyze_absorbing`]).
//!
//! All inputs are validated on construction ([`TransitionMatrix`],
//! [`StateVector`], [`AbsorbingPartition`]); no input is ever normalised.

mod absorbing;
mod chain;
mod config;
mod regular;
mod summary;

pub use absorbing::{analyze_absorbing, AbsorbingAnalysis, AbsorbingPartition};
pub use chain::{StateVector, TransitionMatrix};
pub use config::ChainConfig;
pub use regular::{evolve_vector, matrix_powers, MatrixPowers, PowersIter};
pub use summary::{Concentration, EvolutionSummary, StateChange, Trend};

/// Fewest states a chain may have.
pub const MIN_STATES: usize = 2;

/// Most states a chain may have.
pub const MAX_STATES: usize = 10;

/// Default upper bound on evolution periods.
pub const DEFAULT_MAX_PERIODS: usize = 20;
