//! Plain-text rendering of engine outcomes.

use std::io::{self, Write};

use crate::engine::Outcome;
use crate::markov::{AbsorbingAnalysis, Concentration, EvolutionSummary, StateVector, Trend};
use crate::matrix::Matrix;
use crate::queue::{LoadLevel, QueueInsight, QueueMetrics, QueueModel};

/// States are shown 1-based, `E1..En`.
fn state_label(state: usize) -> String {
    format!("E{}", state + 1)
}

/// Write a human-readable report of `outcome`.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    writeln!(out, "[{}]", outcome.kind())?;
    match outcome {
        Outcome::MatrixPowers(powers) => write_powers(out, powers),
        Outcome::VectorEvolution { history, summary } => {
            write_history(out, history)?;
            write_summary(out, summary)
        }
        Outcome::Absorbing(analysis) => write_absorbing(out, analysis),
        Outcome::Queue {
            model,
            metrics,
            insight,
        } => write_queue(out, *model, metrics, insight),
    }
}

fn write_powers<W: Write>(out: &mut W, powers: &[Matrix]) -> io::Result<()> {
    for (period, m) in powers.iter().enumerate() {
        writeln!(out, "Period {period} (P^{}):", period + 1)?;
        write!(out, "{m:.4}")?;
    }
    Ok(())
}

fn write_history<W: Write>(out: &mut W, history: &[StateVector]) -> io::Result<()> {
    let n = history.first().map_or(0, StateVector::len);
    write!(out, "{:>7}", "Period")?;
    for i in 0..n {
        write!(out, " {:>8}", state_label(i))?;
    }
    writeln!(out)?;
    for (period, v) in history.iter().enumerate() {
        write!(out, "{period:>7}")?;
        for p in v.probs() {
            write!(out, " {p:>8.4}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, summary: &EvolutionSummary) -> io::Result<()> {
    writeln!(out)?;
    for change in summary.changes() {
        let trend = match change.trend() {
            Trend::Increased => "increased",
            Trend::Decreased => "decreased",
            Trend::Stable => "stable",
        };
        writeln!(
            out,
            "{}: {:.2}% -> {:.2}% ({:+.2} pp, {trend})",
            state_label(change.state),
            change.initial * 100.0,
            change.last * 100.0,
            change.change_points()
        )?;
    }
    writeln!(
        out,
        "Dominant state: {}, least likely: {}",
        state_label(summary.dominant_state()),
        state_label(summary.least_likely_state())
    )?;
    match summary.concentration() {
        Concentration::Dominant => writeln!(out, "The chain tends to stay in the dominant state."),
        Concentration::Spread => writeln!(out, "Probability is spread across several states."),
        Concentration::Mixed => Ok(()),
    }
}

fn write_absorbing<W: Write>(out: &mut W, analysis: &AbsorbingAnalysis) -> io::Result<()> {
    let partition = analysis.partition();
    let labels = |states: &[usize]| {
        states
            .iter()
            .map(|&s| state_label(s))
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(out, "Transient: {}", labels(partition.transient()))?;
    writeln!(out, "Absorbing: {}", labels(partition.absorbing()))?;

    writeln!(out, "\nFundamental matrix N = (I - Q)^-1:")?;
    write!(out, "{:.4}", analysis.fundamental())?;
    writeln!(out, "\nAbsorption probabilities B = N * R:")?;
    write!(out, "{:.4}", analysis.absorption_probabilities())?;

    writeln!(out, "\nExpected steps before absorption:")?;
    for (&state, steps) in partition.transient().iter().zip(analysis.expected_steps()) {
        writeln!(out, "  from {}: {steps:.4}", state_label(state))?;
    }

    if let (Some(absorbed), Some(shares)) = (analysis.absorption(), analysis.absorption_shares()) {
        writeln!(
            out,
            "\nFinal distribution of {:.2} initial units:",
            analysis.total_initial_value()
        )?;
        for ((&state, amount), share) in partition.absorbing().iter().zip(absorbed).zip(shares) {
            writeln!(
                out,
                "  {}: {amount:.4} ({:.2}%)",
                state_label(state),
                share * 100.0
            )?;
        }
    }
    Ok(())
}

fn write_queue<W: Write>(
    out: &mut W,
    model: QueueModel,
    metrics: &QueueMetrics,
    insight: &QueueInsight,
) -> io::Result<()> {
    writeln!(out, "Model: {model}")?;
    writeln!(out, "  rho  = {:.4} ({:.2}%)", metrics.utilization, metrics.utilization * 100.0)?;
    writeln!(out, "  L    = {:.4}", metrics.mean_in_system)?;
    writeln!(out, "  Lq   = {:.4}", metrics.mean_in_queue)?;
    writeln!(
        out,
        "  W    = {:.4} ({:.2} min when rates are per hour)",
        metrics.mean_time_in_system,
        metrics.mean_time_in_system * 60.0
    )?;
    writeln!(
        out,
        "  Wq   = {:.4} ({:.2} min when rates are per hour)",
        metrics.mean_time_in_queue,
        metrics.mean_time_in_queue * 60.0
    )?;
    writeln!(
        out,
        "  P0   = {:.4} ({:.2}%)",
        metrics.idle_probability,
        metrics.idle_probability * 100.0
    )?;
    if let Some(blocking) = metrics.blocking_probability {
        writeln!(out, "  PK   = {blocking:.4} (blocking)")?;
        writeln!(out, "  λeff = {:.4}", metrics.effective_arrival_rate)?;
    }
    writeln!(out, "  c·μ  = {:.4}", metrics.max_throughput)?;

    match insight.load {
        LoadLevel::High => writeln!(out, "Highly utilized, consider adding capacity.")?,
        LoadLevel::Comfortable => writeln!(out, "Plenty of spare capacity.")?,
        LoadLevel::Moderate => {}
    }
    if insight.queue_dominated {
        writeln!(out, "Most of the time in system is spent waiting in queue.")?;
    }
    if insight.nearly_always_busy {
        writeln!(out, "The system is almost never empty.")?;
    }
    Ok(())
}
