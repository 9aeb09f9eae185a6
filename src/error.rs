//! Error types for the stochastic engine.
//!
//! This module provides a unified error type [`EngineError`] that covers
//! every way a computation can be declined: structurally invalid requests,
//! numerically invalid inputs, non-invertible matrices and queues without a
//! steady state. Each variant maps onto a coarse [`ErrorKind`] tag that
//! callers can match on without caring about the details.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// Unified error type for all engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ============ Request Errors ============
    /// Structurally invalid request (bad sizes, rates, server counts, partitions)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Structurally plausible input whose numbers are wrong (row sums, signs)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Operand shapes do not line up; the caller broke the function contract
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    // ============ Markov Errors ============
    /// Matrix is singular and cannot be inverted
    #[error("Singular matrix - pivot {pivot:.2e} is below tolerance {tolerance:.0e}, no fundamental matrix exists")]
    SingularMatrix { pivot: f64, tolerance: f64 },

    // ============ Queueing Errors ============
    /// Utilization at or above one, the queue grows without bound
    #[error("Unstable system: utilization {utilization:.4} must be below 1")]
    Unstable { utilization: f64 },

    /// Finite-capacity queue blocks every arrival, so no effective flow exists
    #[error("Saturated system: blocking probability {blocking_probability:.4} leaves no effective arrivals")]
    Saturated { blocking_probability: f64 },
}

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    SingularMatrix,
    Instability,
}

impl ErrorKind {
    /// Stable tag for this kind, suitable for serialising to a front-end.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::SingularMatrix => "singular-matrix",
            ErrorKind::Instability => "instability",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }

    /// The taxonomy bucket this error belongs to.
    ///
    /// Dimension mismatches are reported as configuration errors since they
    /// describe a malformed request rather than a property of the model.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } | Self::DimensionMismatch { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::SingularMatrix { .. } => ErrorKind::SingularMatrix,
            Self::Unstable { .. } | Self::Saturated { .. } => ErrorKind::Instability,
        }
    }
}
