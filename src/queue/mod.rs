//! Birth-death queueing models.
//!
//! Closed-form steady-state metrics for three Markovian queues:
//!
//! | Model | Servers | Capacity | Stability |
//! |-------|---------|----------|-----------|
//! | M/M/1 | 1 | unbounded | requires ρ = λ/μ < 1 |
//! | M/M/c | c | unbounded | requires ρ = λ/(cμ) < 1 |
//! | M/M/c/K | c | K ≥ c | always has a steady state |
//!
//! Each evaluator returns [`QueueMetrics`] or an [`EngineError`]:
//! configuration errors for bad rates or sizes, [`EngineError::Unstable`]
//! when the queue would grow without bound.

mod insight;
mod mm1;
mod mmc;
mod mmck;
mod weights;

pub use insight::{LoadLevel, QueueInsight};
pub use mm1::mm1;
pub use mmc::mmc;
pub use mmck::{mmck, mmck_distribution};

use std::fmt;

use crate::error::{EngineError, Result};

/// Largest server count or system capacity a model may request.
pub const MAX_QUEUE_STATES: u32 = 100_000;

/// Arrival and service rates shared by every model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueParameters {
    arrival_rate: f64,
    service_rate: f64,
}

impl QueueParameters {
    /// Validate `λ` and `μ`. Both, and the offered load `λ/μ`, must be
    /// finite and strictly positive.
    pub fn new(arrival_rate: f64, service_rate: f64) -> Result<Self> {
        let offered_load = arrival_rate / service_rate;
        for (name, value) in [
            ("arrival rate", arrival_rate),
            ("service rate", service_rate),
            ("offered load", offered_load),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::configuration(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(Self {
            arrival_rate,
            service_rate,
        })
    }

    /// Arrival rate `λ`.
    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    /// Service rate `μ` of a single server.
    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    /// Offered load `a = λ/μ`.
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }
}

/// Which queue to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueModel {
    Mm1,
    Mmc { servers: u32 },
    Mmck { servers: u32, capacity: u32 },
}

impl QueueModel {
    /// Number of servers `c`.
    pub fn servers(&self) -> u32 {
        match self {
            QueueModel::Mm1 => 1,
            QueueModel::Mmc { servers } | QueueModel::Mmck { servers, .. } => *servers,
        }
    }

    /// System capacity `K`, if bounded.
    pub fn capacity(&self) -> Option<u32> {
        match self {
            QueueModel::Mmck { capacity, .. } => Some(*capacity),
            _ => None,
        }
    }

    /// Check server count and capacity.
    pub fn validate(&self) -> Result<()> {
        let servers = self.servers();
        if servers < 1 {
            return Err(EngineError::configuration(format!(
                "{self} needs at least one server, got {servers}"
            )));
        }
        if servers > MAX_QUEUE_STATES {
            return Err(EngineError::configuration(format!(
                "{self} server count c = {servers} exceeds the limit of {MAX_QUEUE_STATES}"
            )));
        }
        if let Some(capacity) = self.capacity() {
            if capacity > MAX_QUEUE_STATES {
                return Err(EngineError::configuration(format!(
                    "system capacity K = {capacity} exceeds the limit of {MAX_QUEUE_STATES}"
                )));
            }
            if capacity < servers {
                return Err(EngineError::configuration(format!(
                    "system capacity K = {capacity} is smaller than the server count c = {servers}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for QueueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueModel::Mm1 => write!(f, "M/M/1"),
            QueueModel::Mmc { .. } => write!(f, "M/M/c"),
            QueueModel::Mmck { .. } => write!(f, "M/M/c/K"),
        }
    }
}

/// Steady-state performance measures.
///
/// Times are in the reciprocal unit of the rates (rates per hour give times
/// in hours).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueMetrics {
    /// Utilization ρ.
    pub utilization: f64,
    /// Mean number in system, L.
    pub mean_in_system: f64,
    /// Mean number waiting, Lq.
    pub mean_in_queue: f64,
    /// Mean time in system, W.
    pub mean_time_in_system: f64,
    /// Mean time waiting, Wq.
    pub mean_time_in_queue: f64,
    /// Probability the system is empty, P0.
    pub idle_probability: f64,
    /// Rate of arrivals that actually enter (λ unless arrivals are blocked).
    pub effective_arrival_rate: f64,
    /// Probability an arrival finds the system full (M/M/c/K only).
    pub blocking_probability: Option<f64>,
    /// Service capacity `c·μ`.
    pub max_throughput: f64,
}

/// Evaluate `model` for the given rates.
pub fn evaluate(model: QueueModel, params: &QueueParameters) -> Result<QueueMetrics> {
    match model {
        QueueModel::Mm1 => mm1(params),
        QueueModel::Mmc { servers } => mmc(params, servers),
        QueueModel::Mmck { servers, capacity } => mmck(params, servers, capacity),
    }
}
