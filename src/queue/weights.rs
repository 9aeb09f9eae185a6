//! Unnormalised birth-death state weights in log space.
//!
//! For offered load `a = λ/μ` and `c` servers the steady-state probability
//! of `n` customers is proportional to
//!
//! ```text
//! w_n = a^n / n!                 for n < c
//! w_n = a^n / (c! * c^(n - c))   for n >= c
//! ```
//!
//! Consecutive weights differ by the factor `a/n` (below `c`) or `a/c`
//! (from `c` on), so `ln w_n` is accumulated one ratio at a time. Nothing
//! ever forms `n!` or `a^n` directly, which keeps large server counts and
//! capacities finite.

/// `ln w_n` for `n` in `0..=last`.
pub(crate) fn log_weights(offered_load: f64, servers: u32, last: u32) -> Vec<f64> {
    let ln_a = offered_load.ln();
    let c = f64::from(servers);
    let mut out = Vec::with_capacity(last as usize + 1);
    let mut acc = 0.0;
    out.push(acc);
    for n in 1..=last {
        let divisor = if n <= servers { f64::from(n) } else { c };
        acc += ln_a - divisor.ln();
        out.push(acc);
    }
    out
}

/// `ln(sum(exp(x)))` without overflow.
pub(crate) fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
