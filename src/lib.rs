//! # Stochastic Core
//!
//! A computational engine for discrete stochastic models.
//!
//! This library provides:
//! - Dense matrix primitives (products, Gauss-Jordan inversion with partial pivoting)
//! - Regular Markov chains: multi-step transition matrices and state-vector evolution
//! - Absorbing Markov chains: fundamental matrix, absorption probabilities, absorbed populations
//! - Birth-death queues: closed-form steady-state metrics for M/M/1, M/M/c and M/M/c/K
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`matrix`] - Dense matrices and probability-row checks
//! - [`markov`] - Regular and absorbing chain analysis (built on [`matrix`])
//! - [`queue`] - Queueing formulas (independent of the other two)
//! - [`engine`] - Tagged request/outcome dispatch over all of the above
//! - [`cli`] - Text input/output and logging for the command-line frontend (CLI only)
//!
//! Every computation is a pure function of its inputs. Nothing is cached
//! between calls and no input is silently normalised: rows that do not sum
//! to 1, unstable queues and singular systems come back as [`EngineError`]
//! values.
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use stochastic_core::queue::{mm1, QueueParameters};
//!
//! let metrics = mm1(&QueueParameters::new(5.0, 8.0)?)?;
//! assert!((metrics.utilization - 0.625).abs() < 1e-12);
//! # Ok::<(), stochastic_core::EngineError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! stochastic absorbing --matrix "0.5,0.2,0.3; 0.3,0.4,0.3; 0,0,1" --absorbing 2
//! stochastic mmck --lambda 4 --mu 3 --servers 2 --capacity 6
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { queue_mmc } from 'stochastic_core';
//!
//! const metrics = queue_mmc(10, 4, 3);
//! console.log(metrics.mean_in_system);
//! ```

pub mod engine;
pub mod error;
pub mod markov;
pub mod matrix;
pub mod queue;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use engine::{compute, Engine, ModelKind, Outcome, Request};
pub use error::{EngineError, ErrorKind, Result};
pub use markov::{ChainConfig, StateVector, TransitionMatrix};
pub use matrix::{Matrix, PIVOT_TOLERANCE, STOCHASTIC_TOLERANCE};
pub use queue::{QueueMetrics, QueueModel, QueueParameters};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;
