//! Summary of a state-vector evolution.

use super::StateVector;

/// Change (in percentage points) beyond which a state counts as moving.
pub const TREND_THRESHOLD_POINTS: f64 = 0.5;

/// Final probability above which the leading state is called dominant.
pub const DOMINANT_PROBABILITY: f64 = 0.6;

/// Direction of a state's probability between the first and last period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increased,
    Decreased,
    Stable,
}

/// How the final distribution is spread over the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concentration {
    /// One state holds more than 60% of the probability.
    Dominant,
    /// No state exceeds 40% and more than two states exceed 20%.
    Spread,
    /// Anything in between.
    Mixed,
}

/// First-versus-last comparison for a single state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateChange {
    pub state: usize,
    pub initial: f64,
    pub last: f64,
}

impl StateChange {
    /// Change in percentage points.
    pub fn change_points(&self) -> f64 {
        (self.last - self.initial) * 100.0
    }

    pub fn trend(&self) -> Trend {
        let delta = self.change_points();
        if delta > TREND_THRESHOLD_POINTS {
            Trend::Increased
        } else if delta < -TREND_THRESHOLD_POINTS {
            Trend::Decreased
        } else {
            Trend::Stable
        }
    }
}

/// Interpretation of `[v0, ..., vT]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionSummary {
    changes: Vec<StateChange>,
    dominant_state: usize,
    least_likely_state: usize,
    concentration: Concentration,
}

impl EvolutionSummary {
    /// Summarise an evolution history. Returns `None` for an empty history.
    pub fn from_history(history: &[StateVector]) -> Option<Self> {
        let first = history.first()?;
        let last = history.last()?;

        let changes: Vec<StateChange> = first
            .probs()
            .iter()
            .zip(last.probs())
            .enumerate()
            .map(|(state, (&initial, &end))| StateChange {
                state,
                initial,
                last: end,
            })
            .collect();

        let final_probs = last.probs();
        // Ties resolve to the lowest state index
        let mut dominant_state = 0;
        let mut least_likely_state = 0;
        for (i, &p) in final_probs.iter().enumerate() {
            if p > final_probs[dominant_state] {
                dominant_state = i;
            }
            if p < final_probs[least_likely_state] {
                least_likely_state = i;
            }
        }

        let max = final_probs[dominant_state];
        let concentration = if max > DOMINANT_PROBABILITY {
            Concentration::Dominant
        } else if max < 0.4 && final_probs.iter().filter(|&&p| p > 0.2).count() > 2 {
            Concentration::Spread
        } else {
            Concentration::Mixed
        };

        Some(Self {
            changes,
            dominant_state,
            least_likely_state,
            concentration,
        })
    }

    /// Per-state changes, in state order.
    pub fn changes(&self) -> &[StateChange] {
        &self.changes
    }

    /// State with the highest final probability.
    pub fn dominant_state(&self) -> usize {
        self.dominant_state
    }

    /// State with the lowest final probability.
    pub fn least_likely_state(&self) -> usize {
        self.least_likely_state
    }

    pub fn concentration(&self) -> Concentration {
        self.concentration
    }
}
