//! Single-server queue with unbounded capacity.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};

use super::{QueueMetrics, QueueParameters};

/// Evaluate an M/M/1 queue.
///
/// Fails with [`EngineError::Unstable`] when `ρ = λ/μ ≥ 1`.
pub fn mm1(params: &QueueParameters) -> Result<QueueMetrics> {
    let lambda = params.arrival_rate();
    let mu = params.service_rate();
    let rho = lambda / mu;
    if rho >= 1.0 {
        warn!(utilization = rho, "M/M/1 queue has no steady state");
        return Err(EngineError::Unstable { utilization: rho });
    }

    let metrics = QueueMetrics {
        utilization: rho,
        mean_in_system: rho / (1.0 - rho),
        mean_in_queue: rho * rho / (1.0 - rho),
        mean_time_in_system: 1.0 / (mu - lambda),
        mean_time_in_queue: lambda / (mu * (mu - lambda)),
        idle_probability: 1.0 - rho,
        effective_arrival_rate: lambda,
        blocking_probability: None,
        max_throughput: mu,
    };
    debug!(?metrics, "evaluated M/M/1");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mm1_reference_values() {
        let m = mm1(&QueueParameters::new(5.0, 8.0).unwrap()).unwrap();
        assert_abs_diff_eq!(m.utilization, 0.625, epsilon = 1e-12);
        assert_abs_diff_eq!(m.mean_in_system, 1.6667, epsilon = 1e-4);
        assert_abs_diff_eq!(m.mean_in_queue, 1.0417, epsilon = 1e-4);
        assert_abs_diff_eq!(m.mean_time_in_system, 0.3333, epsilon = 1e-4);
        assert_abs_diff_eq!(m.mean_time_in_queue, 0.2083, epsilon = 1e-4);
        assert_abs_diff_eq!(m.idle_probability, 0.375, epsilon = 1e-12);
        assert_eq!(m.blocking_probability, None);
    }

    #[test]
    fn test_mm1_littles_law() {
        for (lambda, mu) in [(1.0, 2.0), (0.3, 7.0), (9.9, 10.0)] {
            let m = mm1(&QueueParameters::new(lambda, mu).unwrap()).unwrap();
            assert_abs_diff_eq!(m.mean_in_system, lambda * m.mean_time_in_system, epsilon = 1e-9);
            assert_abs_diff_eq!(m.mean_in_queue, lambda * m.mean_time_in_queue, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mm1_unstable() {
        let err = mm1(&QueueParameters::new(9.0, 8.0).unwrap()).unwrap_err();
        assert_eq!(err, EngineError::Unstable { utilization: 1.125 });

        // Equality is unstable too
        assert!(mm1(&QueueParameters::new(4.0, 4.0).unwrap()).is_err());
    }
}
