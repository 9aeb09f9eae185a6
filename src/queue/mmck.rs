//! Multi-server queue with finite system capacity.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};

use super::weights::{log_sum_exp, log_weights};
use super::{QueueMetrics, QueueModel, QueueParameters};

/// Steady-state probabilities `[P0, P1, ..., PK]` of an M/M/c/K queue.
pub fn mmck_distribution(
    params: &QueueParameters,
    servers: u32,
    capacity: u32,
) -> Result<Vec<f64>> {
    QueueModel::Mmck { servers, capacity }.validate()?;

    let log_w = log_weights(params.offered_load(), servers, capacity);
    let ln_norm = log_sum_exp(&log_w);
    if !ln_norm.is_finite() {
        return Err(EngineError::configuration(format!(
            "offered load {} gives no finite normalisation for c = {servers}, K = {capacity}",
            params.offered_load()
        )));
    }
    Ok(log_w.iter().map(|w| (w - ln_norm).exp()).collect())
}

/// Evaluate an M/M/c/K queue.
///
/// Arrivals that find `K` customers present are lost, so only
/// `λ_eff = λ(1 - P_K)` enters the system and Little's law is applied with
/// `λ_eff`. A steady state always exists; the only failure besides bad
/// configuration is [`EngineError::Saturated`] when `λ_eff` rounds to zero.
pub fn mmck(params: &QueueParameters, servers: u32, capacity: u32) -> Result<QueueMetrics> {
    let probs = mmck_distribution(params, servers, capacity)?;

    let lambda = params.arrival_rate();
    let mu = params.service_rate();
    let c = servers as usize;

    let lq: f64 = probs
        .iter()
        .enumerate()
        .skip(c)
        .map(|(n, p)| (n - c) as f64 * p)
        .sum();
    let p_k = probs[capacity as usize];
    let lambda_eff = lambda * (1.0 - p_k);
    if lambda_eff.is_nan() || lambda_eff <= 0.0 {
        warn!(blocking_probability = p_k, "M/M/c/K queue blocks every arrival");
        return Err(EngineError::Saturated {
            blocking_probability: p_k,
        });
    }

    let metrics = QueueMetrics {
        utilization: lambda / (f64::from(servers) * mu),
        mean_in_system: lq + lambda_eff / mu,
        mean_in_queue: lq,
        mean_time_in_system: lq / lambda_eff + 1.0 / mu,
        mean_time_in_queue: lq / lambda_eff,
        idle_probability: probs[0],
        effective_arrival_rate: lambda_eff,
        blocking_probability: Some(p_k),
        max_throughput: f64::from(servers) * mu,
    };
    debug!(?metrics, servers, capacity, "evaluated M/M/c/K");
    Ok(metrics)
}
