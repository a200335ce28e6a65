// =============================================================================
// Stochastic Oscillators and Williams %R
// =============================================================================
//
// Fast %K places the close within the high/low range of the last n bars:
//   %K = (close - lowest_low) / (highest_high - lowest_low) * 100
//
// STOCHF  %K as above, %D = SMA(%K)
// STOCH   slow %K = SMA(fast %K), slow %D = SMA(slow %K)
// WILLR   (highest_high - close) / (highest_high - lowest_low) * -100
//
// A zero-width range yields 0. Paired outputs are published from the same
// index, the one where the later of the two first exists.
// =============================================================================

use super::moving_average::sma;
use super::nan_series;

fn extremes(high: &[f64], low: &[f64], lo: usize, hi: usize) -> (f64, f64) {
    let highest = high[lo..=hi].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = low[lo..=hi].iter().copied().fold(f64::INFINITY, f64::min);
    (highest, lowest)
}

/// Raw fast %K, first value at index `period - 1` of the defined input.
///
/// Windows touching a NaN (an upstream warm-up) produce NaN, which lets the
/// same routine run over an indicator series such as RSI.
pub(crate) fn fast_k(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = nan_series(n);
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let lo = i + 1 - period;
        let any_gap = high[lo..=i].iter().chain(&low[lo..=i]).any(|v| v.is_nan());
        if any_gap || close[i].is_nan() {
            continue;
        }
        let (highest, lowest) = extremes(high, low, lo, i);
        let range = highest - lowest;
        out[i] = if range > 0.0 {
            (close[i] - lowest) / range * 100.0
        } else {
            0.0
        };
    }
    out
}

/// Blank out `leading` wherever `trailing` has not started yet.
fn align_pair(mut leading: Vec<f64>, trailing: &[f64]) -> Vec<f64> {
    for (l, t) in leading.iter_mut().zip(trailing) {
        if t.is_nan() {
            *l = f64::NAN;
        }
    }
    leading
}

/// Slow stochastic `(%K, %D)` with SMA smoothing.
///
/// Both lines start at `fastk_period - 1 + slowk_period - 1 + slowd_period - 1`
/// (index 8 for the 5/3/3 default).
pub fn stoch(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    fastk_period: usize,
    slowk_period: usize,
    slowd_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let slow_k = sma(&fast_k(high, low, close, fastk_period), slowk_period);
    let slow_d = sma(&slow_k, slowd_period);
    (align_pair(slow_k, &slow_d), slow_d)
}

/// Fast stochastic `(%K, %D)`; both lines start at
/// `fastk_period - 1 + fastd_period - 1`.
pub fn stochf(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    fastk_period: usize,
    fastd_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let k = fast_k(high, low, close, fastk_period);
    let d = sma(&k, fastd_period);
    (align_pair(k, &d), d)
}

/// Williams %R, ranging -100..=0, first value at index `period - 1`.
pub fn willr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = nan_series(n);
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let (highest, lowest) = extremes(high, low, i + 1 - period, i);
        let range = highest - lowest;
        out[i] = if range > 0.0 {
            (highest - close[i]) / range * -100.0
        } else {
            0.0
        };
    }
    out
}
