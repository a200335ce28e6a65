// =============================================================================
// Exponential Moving Average (EMA) and its cascades
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
//
// Cascades built on it:
//   DEMA = 2 * EMA1 - EMA2                  (EMA2 = EMA of EMA1)
//   TEMA = 3 * EMA1 - 3 * EMA2 + EMA3
//   TRIX = 1-bar rate of change (percent) of EMA3
// =============================================================================

use super::{nan_series, on_defined_tail};

/// Compute the EMA series for `values` and look-back `period`.
///
/// The output is aligned with the input; the first value sits at index
/// `period - 1` and everything before it is NaN.
///
/// # Edge cases
/// - `period == 0` => all NaN
/// - `values.len() < period` => all NaN
/// - A NaN warm-up prefix in `values` (an upstream indicator) is skipped.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    on_defined_tail(values, |x| {
        if period == 0 {
            return nan_series(x.len());
        }
        ema_seeded_at(x, period, period.saturating_sub(1))
    })
}

/// EMA whose SMA seed is placed at `seed_index` instead of `period - 1`.
///
/// The seed averages the `period` values ending at `seed_index`. MACD uses
/// this to line its fast average up with the slow one.
pub(crate) fn ema_seeded_at(x: &[f64], period: usize, seed_index: usize) -> Vec<f64> {
    let mut out = nan_series(x.len());
    if period == 0 || seed_index + 1 < period || seed_index >= x.len() {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let seed: f64 = x[seed_index + 1 - period..=seed_index].iter().sum::<f64>() / period as f64;
    out[seed_index] = seed;

    let mut prev = seed;
    for i in (seed_index + 1)..x.len() {
        prev = (x[i] - prev) * multiplier + prev;
        out[i] = prev;
    }
    out
}

/// Double EMA, first value at index `2 * (period - 1)`.
pub fn dema(values: &[f64], period: usize) -> Vec<f64> {
    let e1 = ema(values, period);
    let e2 = ema(&e1, period);
    e1.iter().zip(&e2).map(|(a, b)| 2.0 * a - b).collect()
}

/// Triple EMA, first value at index `3 * (period - 1)`.
pub fn tema(values: &[f64], period: usize) -> Vec<f64> {
    let e1 = ema(values, period);
    let e2 = ema(&e1, period);
    let e3 = ema(&e2, period);
    e1.iter()
        .zip(&e2)
        .zip(&e3)
        .map(|((a, b), c)| 3.0 * a - 3.0 * b + c)
        .collect()
}

/// One-bar percent change of the triple-smoothed EMA, first value at index
/// `3 * (period - 1) + 1`.
///
/// # Edge cases
/// - A zero previous triple EMA yields 0 rather than infinity.
pub fn trix(values: &[f64], period: usize) -> Vec<f64> {
    let e3 = ema(&ema(&ema(values, period), period), period);
    let mut out = nan_series(e3.len());
    for i in 1..e3.len() {
        let (prev, cur) = (e3[i - 1], e3[i]);
        if prev.is_nan() || cur.is_nan() {
            continue;
        }
        out[i] = if prev == 0.0 { 0.0 } else { (cur - prev) / prev * 100.0 };
    }
    out
}
