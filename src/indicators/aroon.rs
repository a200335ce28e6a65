// =============================================================================
// Aroon
// =============================================================================
//
// Aroon measures how recently the window's extremes were set. Over the last
// period + 1 bars:
//   Aroon Up   = 100 * (period - bars since highest high) / period
//   Aroon Down = 100 * (period - bars since lowest low)  / period
//   AROONOSC   = Aroon Up - Aroon Down
//
// When an extreme repeats inside the window the most recent bar wins.
// =============================================================================

use super::nan_series;

/// `(up, down)` series, first value at index `period`.
pub fn aroon(high: &[f64], low: &[f64], period: usize) -> (Vec<f64>, Vec<f64>) {
    let n = high.len().min(low.len());
    let mut up = nan_series(n);
    let mut down = nan_series(n);
    if period == 0 || n <= period {
        return (up, down);
    }

    let period_f = period as f64;
    for i in period..n {
        let start = i - period;
        let mut hi_idx = start;
        let mut lo_idx = start;
        for k in start..=i {
            if high[k] >= high[hi_idx] {
                hi_idx = k;
            }
            if low[k] <= low[lo_idx] {
                lo_idx = k;
            }
        }
        up[i] = 100.0 * (period - (i - hi_idx)) as f64 / period_f;
        down[i] = 100.0 * (period - (i - lo_idx)) as f64 / period_f;
    }
    (up, down)
}

/// Aroon oscillator, ranging -100..=100.
pub fn aroon_osc(high: &[f64], low: &[f64], period: usize) -> Vec<f64> {
    let (up, down) = aroon(high, low, period);
    up.iter().zip(&down).map(|(u, d)| u - d).collect()
}
