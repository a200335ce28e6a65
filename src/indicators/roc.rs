// =============================================================================
// Rate of Change (ROC) and Momentum (MOM)
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// MOM is the same comparison without normalising:
//   MOM = close - close_n
//
// Positive values indicate upward momentum; negative indicate downward.

use super::nan_series;

/// Calculate the Rate of Change for the given closing prices and period.
///
/// The first value sits at index `period`. A zero reference close yields 0.
pub fn roc(closes: &[f64], period: usize) -> Vec<f64> {
    lagged(closes, period, |cur, prev| {
        if prev == 0.0 {
            0.0
        } else {
            (cur - prev) / prev * 100.0
        }
    })
}

/// Absolute price change over `period` bars.
pub fn mom(closes: &[f64], period: usize) -> Vec<f64> {
    lagged(closes, period, |cur, prev| cur - prev)
}

fn lagged(closes: &[f64], period: usize, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let mut out = nan_series(closes.len());
    if period == 0 {
        return out;
    }
    for i in period..closes.len() {
        out[i] = f(closes[i], closes[i - period]);
    }
    out
}
