// =============================================================================
// Moving Averages and Range Midpoints
// =============================================================================
//
// SMA   mean of the last `period` values.
// WMA   linearly weighted mean, newest value weight `period`, oldest weight 1:
//         WMA_t = sum(w_k * x_k) / (period * (period + 1) / 2)
// TRIMA SMA of an SMA. For an odd period both windows are (period + 1) / 2;
//       for an even period the inner window is period / 2 and the outer
//       period / 2 + 1, so the combined window is exactly `period` long.
// KAMA  Kaufman adaptive average. The efficiency ratio
//         ER = |x_t - x_{t-n}| / sum(|x_k - x_{k-1}|)
//       blends between a fast (2-bar) and a slow (30-bar) smoothing constant:
//         sc     = (ER * (2/3 - 2/31) + 2/31)^2
//         KAMA_t = KAMA_{t-1} + sc * (x_t - KAMA_{t-1})
// MIDPOINT (max + min) / 2 of one series over the window.
// MIDPRICE (highest high + lowest low) / 2 over the window.
//
// All outputs have the input's length; leading warm-up slots are NaN.
// =============================================================================

use super::{nan_series, on_defined_tail};

/// Simple moving average, first value at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` or `values.len() < period` => all NaN
/// - A NaN warm-up prefix in `values` is skipped and carried into the output.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    on_defined_tail(values, |x| {
        let mut out = nan_series(x.len());
        if period == 0 || x.len() < period {
            return out;
        }
        let p = period as f64;
        let mut sum: f64 = x[..period].iter().sum();
        out[period - 1] = sum / p;
        for i in period..x.len() {
            sum += x[i] - x[i - period];
            out[i] = sum / p;
        }
        out
    })
}

/// Linearly weighted moving average, first value at index `period - 1`.
pub fn wma(values: &[f64], period: usize) -> Vec<f64> {
    on_defined_tail(values, |x| {
        let mut out = nan_series(x.len());
        if period == 0 || x.len() < period {
            return out;
        }
        let divisor = (period * (period + 1)) as f64 / 2.0;
        for i in (period - 1)..x.len() {
            let window = &x[i + 1 - period..=i];
            let weighted: f64 = window
                .iter()
                .enumerate()
                .map(|(k, v)| (k + 1) as f64 * v)
                .sum();
            out[i] = weighted / divisor;
        }
        out
    })
}

/// Triangular moving average, first value at index `period - 1`.
pub fn trima(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return nan_series(values.len());
    }
    let (inner, outer) = if period % 2 == 1 {
        ((period + 1) / 2, (period + 1) / 2)
    } else {
        (period / 2, period / 2 + 1)
    };
    sma(&sma(values, inner), outer)
}

/// Kaufman adaptive moving average (fast 2, slow 30), first value at index
/// `period`.
///
/// The average is seeded with the value just before the first output. When
/// the window has no net movement at all (sum of changes is zero) the
/// efficiency ratio is taken as 1.
pub fn kama(values: &[f64], period: usize) -> Vec<f64> {
    const FAST: f64 = 2.0 / 3.0;
    const SLOW: f64 = 2.0 / 31.0;

    on_defined_tail(values, |x| {
        let mut out = nan_series(x.len());
        if period == 0 || x.len() <= period {
            return out;
        }

        let mut noise: f64 = (1..=period).map(|k| (x[k] - x[k - 1]).abs()).sum();
        let mut prev = x[period - 1];
        for i in period..x.len() {
            if i > period {
                noise += (x[i] - x[i - 1]).abs() - (x[i - period] - x[i - period - 1]).abs();
            }
            let direction = x[i] - x[i - period];
            let er = if noise <= direction || noise.abs() < 1e-8 {
                1.0
            } else {
                (direction / noise).abs()
            };
            let sc = (er * (FAST - SLOW) + SLOW).powi(2);
            prev += sc * (x[i] - prev);
            out[i] = prev;
        }
        out
    })
}

/// `(max + min) / 2` of `values` over the trailing window.
pub fn midpoint(values: &[f64], period: usize) -> Vec<f64> {
    window_mid(values, values, period)
}

/// `(highest high + lowest low) / 2` over the trailing window.
pub fn midprice(high: &[f64], low: &[f64], period: usize) -> Vec<f64> {
    window_mid(high, low, period)
}

fn window_mid(upper: &[f64], lower: &[f64], period: usize) -> Vec<f64> {
    let n = upper.len().min(lower.len());
    let mut out = nan_series(n);
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let lo = i + 1 - period;
        let max = upper[lo..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = lower[lo..=i].iter().copied().fold(f64::INFINITY, f64::min);
        out[i] = (max + min) / 2.0;
    }
    out
}
