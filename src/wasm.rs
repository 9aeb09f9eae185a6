//! WASM bindings for Stochastic Core.
//!
//! This module provides JavaScript-friendly bindings so a browser front-end
//! can call the engine directly on every input change. Matrices cross the
//! boundary as flat row-major `Float64Array`s together with their size.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { queue_mm1, markov_absorbing } from 'stochastic_core';
//!
//! await init();
//!
//! const m = queue_mm1(5, 8);
//! console.log(m.utilization, m.mean_in_system);
//!
//! const P = new Float64Array([0.5, 0.2, 0.3, 0.3, 0.4, 0.3, 0, 0, 1]);
//! const result = markov_absorbing(P, 3, new Uint32Array([2]), new Float64Array([100, 50, 0]));
//! console.log(result.absorption);
//! ```

use wasm_bindgen::prelude::*;

use crate::error::EngineError;
use crate::markov::{
    analyze_absorbing, evolve_vector, AbsorbingPartition, ChainConfig, MatrixPowers, StateVector,
    TransitionMatrix,
};
use crate::matrix::Matrix;
use crate::queue::{self, QueueMetrics, QueueModel, QueueParameters};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&format!("{}: {e}", e.kind()))
}

fn transition(flat: &[f64], num_states: usize) -> Result<TransitionMatrix, JsValue> {
    Matrix::from_row_major(num_states, num_states, flat.to_vec())
        .and_then(TransitionMatrix::new)
        .map_err(to_js)
}

/// Steady-state queue metrics.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct WasmQueueMetrics {
    metrics: QueueMetrics,
}

#[wasm_bindgen]
impl WasmQueueMetrics {
    #[wasm_bindgen(getter)]
    pub fn utilization(&self) -> f64 {
        self.metrics.utilization
    }

    #[wasm_bindgen(getter)]
    pub fn mean_in_system(&self) -> f64 {
        self.metrics.mean_in_system
    }

    #[wasm_bindgen(getter)]
    pub fn mean_in_queue(&self) -> f64 {
        self.metrics.mean_in_queue
    }

    #[wasm_bindgen(getter)]
    pub fn mean_time_in_system(&self) -> f64 {
        self.metrics.mean_time_in_system
    }

    #[wasm_bindgen(getter)]
    pub fn mean_time_in_queue(&self) -> f64 {
        self.metrics.mean_time_in_queue
    }

    #[wasm_bindgen(getter)]
    pub fn idle_probability(&self) -> f64 {
        self.metrics.idle_probability
    }

    #[wasm_bindgen(getter)]
    pub fn effective_arrival_rate(&self) -> f64 {
        self.metrics.effective_arrival_rate
    }

    /// Service capacity `c·μ`.
    #[wasm_bindgen(getter)]
    pub fn max_throughput(&self) -> f64 {
        self.metrics.max_throughput
    }

    /// Blocking probability, or `undefined` for unbounded queues.
    #[wasm_bindgen(getter)]
    pub fn blocking_probability(&self) -> Option<f64> {
        self.metrics.blocking_probability
    }
}

fn queue_metrics(model: QueueModel, lambda: f64, mu: f64) -> Result<WasmQueueMetrics, JsValue> {
    let params = QueueParameters::new(lambda, mu).map_err(to_js)?;
    let metrics = queue::evaluate(model, &params).map_err(to_js)?;
    Ok(WasmQueueMetrics { metrics })
}

/// Evaluate an M/M/1 queue.
#[wasm_bindgen]
pub fn queue_mm1(lambda: f64, mu: f64) -> Result<WasmQueueMetrics, JsValue> {
    queue_metrics(QueueModel::Mm1, lambda, mu)
}

/// Evaluate an M/M/c queue.
#[wasm_bindgen]
pub fn queue_mmc(lambda: f64, mu: f64, servers: u32) -> Result<WasmQueueMetrics, JsValue> {
    queue_metrics(QueueModel::Mmc { servers }, lambda, mu)
}

/// Evaluate an M/M/c/K queue.
#[wasm_bindgen]
pub fn queue_mmck(
    lambda: f64,
    mu: f64,
    servers: u32,
    capacity: u32,
) -> Result<WasmQueueMetrics, JsValue> {
    queue_metrics(QueueModel::Mmck { servers, capacity }, lambda, mu)
}

/// Multi-step transition matrices, concatenated: `periods + 1` blocks of
/// `num_states * num_states` values.
#[wasm_bindgen]
pub fn markov_powers(flat: &[f64], num_states: usize, periods: usize) -> Result<Vec<f64>, JsValue> {
    let p = transition(flat, num_states)?;
    let powers = MatrixPowers::new(&p, periods, &ChainConfig::default()).map_err(to_js)?;
    Ok(powers
        .iter()
        .flat_map(|m| m.as_slice().to_vec())
        .collect())
}

/// State vectors for periods `0..=periods`, concatenated.
#[wasm_bindgen]
pub fn markov_evolve(
    flat: &[f64],
    num_states: usize,
    initial: &[f64],
    periods: usize,
) -> Result<Vec<f64>, JsValue> {
    let p = transition(flat, num_states)?;
    let v0 = StateVector::new(initial.to_vec()).map_err(to_js)?;
    let history = evolve_vector(&v0, &p, periods, &ChainConfig::default()).map_err(to_js)?;
    Ok(history.into_iter().flat_map(StateVector::into_inner).collect())
}

/// Absorbing-chain analysis result.
#[wasm_bindgen]
pub struct WasmAbsorbing {
    transient: Vec<u32>,
    absorbing: Vec<u32>,
    fundamental: Vec<f64>,
    absorption_probabilities: Vec<f64>,
    absorption: Option<Vec<f64>>,
}

#[wasm_bindgen]
impl WasmAbsorbing {
    #[wasm_bindgen(getter)]
    pub fn transient(&self) -> Vec<u32> {
        self.transient.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn absorbing(&self) -> Vec<u32> {
        self.absorbing.clone()
    }

    /// `N`, row-major, transient x transient.
    #[wasm_bindgen(getter)]
    pub fn fundamental(&self) -> Vec<f64> {
        self.fundamental.clone()
    }

    /// `B`, row-major, transient x absorbing.
    #[wasm_bindgen(getter)]
    pub fn absorption_probabilities(&self) -> Vec<f64> {
        self.absorption_probabilities.clone()
    }

    /// Absorbed population per absorbing state, or `undefined`.
    #[wasm_bindgen(getter)]
    pub fn absorption(&self) -> Option<Vec<f64>> {
        self.absorption.clone()
    }
}

/// Analyse an absorbing chain. Pass an empty `initial_values` array to skip
/// the absorption vector.
#[wasm_bindgen]
pub fn markov_absorbing(
    flat: &[f64],
    num_states: usize,
    absorbing_states: &[u32],
    initial_values: &[f64],
) -> Result<WasmAbsorbing, JsValue> {
    let absorbing: Vec<usize> = absorbing_states.iter().map(|&s| s as usize).collect();
    let partition = AbsorbingPartition::new(num_states, &absorbing).map_err(to_js)?;
    let p = transition(flat, num_states)?;
    let values = (!initial_values.is_empty()).then_some(initial_values);
    let analysis =
        analyze_absorbing(&p, &partition, values, &ChainConfig::default()).map_err(to_js)?;

    let as_u32 = |states: &[usize]| -> Vec<u32> { states.iter().map(|&s| s as u32).collect() };
    Ok(WasmAbsorbing {
        transient: as_u32(partition.transient()),
        absorbing: as_u32(partition.absorbing()),
        fundamental: analysis.fundamental().as_slice().to_vec(),
        absorption_probabilities: analysis.absorption_probabilities().as_slice().to_vec(),
        absorption: analysis.absorption().map(<[f64]>::to_vec),
    })
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_metrics_getters() {
        let m = queue_mmc(10.0, 4.0, 3).unwrap();
        assert!((m.max_throughput() - 12.0).abs() < 1e-12);
        assert!((m.idle_probability() - 1.0 / 22.25).abs() < 1e-9);
        assert_eq!(m.blocking_probability(), None);

        let k = queue_mmck(4.0, 3.0, 2, 6).unwrap();
        assert!((k.max_throughput() - 6.0).abs() < 1e-12);
        assert!(k.blocking_probability().is_some());
    }
}
