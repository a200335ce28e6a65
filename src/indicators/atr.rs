// =============================================================================
// True Range and Average True Range (ATR)
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of an asset
// price for a given period.
//
// True Range (TR) for each bar:
//   TR = max(high - low, |high - prev_close|, |low - prev_close|)
//
// ATR uses Wilder's smoothing:
//   ATR_first = SMA(TR, period)          over bars 1..=period
//   ATR_t     = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// NATR = ATR / close * 100
// =============================================================================

use super::nan_series;

/// True range of bar `i` (`i >= 1`).
pub(crate) fn true_range_at(high: &[f64], low: &[f64], close: &[f64], i: usize) -> f64 {
    let prev_close = close[i - 1];
    (high[i] - low[i])
        .max((high[i] - prev_close).abs())
        .max((low[i] - prev_close).abs())
}

/// True range series; the first bar has no predecessor and stays NaN.
pub fn trange(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let mut out = nan_series(close.len());
    for i in 1..close.len() {
        out[i] = true_range_at(high, low, close, i);
    }
    out
}

/// Average true range, first value at index `period`.
///
/// # Edge cases
/// - `period == 0` => all NaN
/// - Need `period + 1` bars (the first bar has no previous close).
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = nan_series(n);
    if period == 0 || n <= period {
        return out;
    }

    let period_f = period as f64;
    let mut current = (1..=period)
        .map(|i| true_range_at(high, low, close, i))
        .sum::<f64>()
        / period_f;
    out[period] = current;

    for i in (period + 1)..n {
        current = (current * (period_f - 1.0) + true_range_at(high, low, close, i)) / period_f;
        out[i] = current;
    }
    out
}

/// ATR as a percentage of the close. A zero close yields 0.
pub fn natr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    atr(high, low, close, period)
        .into_iter()
        .zip(close)
        .map(|(a, &c)| {
            if a.is_nan() {
                f64::NAN
            } else if c == 0.0 {
                0.0
            } else {
                a / c * 100.0
            }
        })
        .collect()
}
