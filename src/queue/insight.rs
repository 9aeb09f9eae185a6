//! Qualitative reading of queue metrics.

use super::QueueMetrics;

/// Coarse utilization band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    /// ρ ≤ 0.5: plenty of spare capacity.
    Comfortable,
    /// 0.5 < ρ ≤ 0.8, or ρ ≥ 1 for a finite-capacity queue.
    Moderate,
    /// 0.8 < ρ < 1: close to saturation, adding capacity is worth considering.
    High,
}

/// Flags derived from a [`QueueMetrics`] value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueInsight {
    pub load: LoadLevel,
    /// Most of the time in system is spent waiting (Wq > 0.7 W).
    pub queue_dominated: bool,
    /// The system is almost never empty (P0 < 0.1).
    pub nearly_always_busy: bool,
}

impl QueueInsight {
    pub fn from_metrics(metrics: &QueueMetrics) -> Self {
        let rho = metrics.utilization;
        let load = if rho > 0.8 && rho < 1.0 {
            LoadLevel::High
        } else if rho <= 0.5 {
            LoadLevel::Comfortable
        } else {
            LoadLevel::Moderate
        };

        Self {
            load,
            queue_dominated: metrics.mean_time_in_queue > 0.7 * metrics.mean_time_in_system,
            nearly_always_busy: metrics.idle_probability < 0.1,
        }
    }
}
