//! Multi-server queue with unbounded capacity.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};

use super::weights::{log_sum_exp, log_weights};
use super::{QueueMetrics, QueueModel, QueueParameters};

/// Evaluate an M/M/c queue with `servers` identical servers.
///
/// ```text
/// P0 = [ sum_{n<c} a^n/n! + a^c/c! * 1/(1-ρ) ]^-1
/// Lq = P0 * a^c * ρ / (c! * (1-ρ)^2)
/// ```
pub fn mmc(params: &QueueParameters, servers: u32) -> Result<QueueMetrics> {
    QueueModel::Mmc { servers }.validate()?;

    let lambda = params.arrival_rate();
    let mu = params.service_rate();
    let c = f64::from(servers);
    let rho = lambda / (c * mu);
    if rho >= 1.0 {
        warn!(utilization = rho, servers, "M/M/c queue has no steady state");
        return Err(EngineError::Unstable { utilization: rho });
    }

    let a = params.offered_load();
    let mut terms = log_weights(a, servers, servers);
    // terms[c] = ln(a^c / c!); the geometric tail from n = c onward sums it
    // with ratio ρ
    let ln_wc = terms[servers as usize];
    terms[servers as usize] = ln_wc - (1.0 - rho).ln();
    let ln_norm = log_sum_exp(&terms);

    let p0 = (-ln_norm).exp();
    let lq = (ln_wc - ln_norm).exp() * rho / ((1.0 - rho) * (1.0 - rho));

    let metrics = QueueMetrics {
        utilization: rho,
        mean_in_system: lq + a,
        mean_in_queue: lq,
        mean_time_in_system: lq / lambda + 1.0 / mu,
        mean_time_in_queue: lq / lambda,
        idle_probability: p0,
        effective_arrival_rate: lambda,
        blocking_probability: None,
        max_throughput: c * mu,
    };
    debug!(?metrics, servers, "evaluated M/M/c");
    Ok(metrics)
}
