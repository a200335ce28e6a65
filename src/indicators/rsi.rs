// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RSI = 100 * avg_gain / (avg_gain + avg_loss)
//
// The same averages drive the Chande Momentum Oscillator:
//            CMO = 100 * (avg_gain - avg_loss) / (avg_gain + avg_loss)
//
// StochRSI runs the fast stochastic over the RSI series itself.
// =============================================================================

use super::moving_average::sma;
use super::stochastic::fast_k;

/// Sums below this are treated as "no movement at all".
const FLAT: f64 = 1e-8;

/// Wilder-smoothed `(avg_gain, avg_loss)` pairs aligned with `closes`; slots
/// before index `period` are `None`.
fn smoothed_moves(closes: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let split = |d: f64| if d > 0.0 { (d, 0.0) } else { (0.0, -d) };

    let period_f = period as f64;
    let (mut avg_gain, mut avg_loss) = (1..=period)
        .map(|i| split(closes[i] - closes[i - 1]))
        .fold((0.0, 0.0), |(g, l), (dg, dl)| (g + dg, l + dl));
    avg_gain /= period_f;
    avg_loss /= period_f;
    out[period] = Some((avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let (gain, loss) = split(closes[i] - closes[i - 1]);
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        out[i] = Some((avg_gain, avg_loss));
    }
    out
}

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The first value sits at index `period` (the first `period` deltas seed
/// the averages); earlier slots are NaN.
///
/// # Edge cases
/// - `period == 0` or `closes.len() <= period` => all NaN
/// - No movement at all in the averaging window => 0.0
/// - Only up moves => 100.0, only down moves => 0.0
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    smoothed_moves(closes, period)
        .into_iter()
        .map(|m| match m {
            Some((gain, loss)) if gain + loss >= FLAT => 100.0 * gain / (gain + loss),
            Some(_) => 0.0,
            None => f64::NAN,
        })
        .collect()
}

/// Chande Momentum Oscillator, ranging -100..=100, first value at `period`.
pub fn cmo(closes: &[f64], period: usize) -> Vec<f64> {
    smoothed_moves(closes, period)
        .into_iter()
        .map(|m| match m {
            Some((gain, loss)) if gain + loss >= FLAT => 100.0 * (gain - loss) / (gain + loss),
            Some(_) => 0.0,
            None => f64::NAN,
        })
        .collect()
}

/// Stochastic RSI `(%K, %D)`.
///
/// %K is the position of RSI within its own `k_period` range, %D the
/// `d_period` SMA of %K. Both outputs start together at
/// `rsi_period + k_period - 1 + d_period - 1`.
pub fn stochrsi(
    closes: &[f64],
    rsi_period: usize,
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let r = rsi(closes, rsi_period);
    let mut k = fast_k(&r, &r, &r, k_period);
    let d = sma(&k, d_period);

    // %K is published only where %D exists too.
    for (kv, dv) in k.iter_mut().zip(&d) {
        if dv.is_nan() {
            *kv = f64::NAN;
        }
    }
    (k, d)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: generate a monotonically increasing series.
    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|v| v as f64).collect()
    }

    /// Helper: generate a monotonically decreasing series.
    fn descending(n: usize) -> Vec<f64> {
        (1..=n).rev().map(|v| v as f64).collect()
    }

    // ---- rsi ---------------------------------------------------------------

    #[test]
    fn rsi_period_zero() {
        assert!(rsi(&[1.0, 2.0, 3.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_insufficient_data() {
        // period = 14 requires at least 15 closes.
        let out = rsi(&ascending(14), 14);
        assert_eq!(out.len(), 14);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_all_gains() {
        let out = rsi(&ascending(30), 14);
        assert!(out[13].is_nan());
        assert!(out[14..].iter().all(|v| (v - 100.0).abs() < 1e-10));
    }

    #[test]
    fn rsi_all_losses() {
        let out = rsi(&descending(30), 14);
        assert!(out[14..].iter().all(|v| v.abs() < 1e-10));
    }

    #[test]
    fn rsi_flat_prices_is_zero() {
        let out = rsi(&[50.0; 20], 14);
        assert!(out[14..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn rsi_known_seed_value() {
        // deltas +2, -1 -> avg gain 1, avg loss 0.5 -> 66.67
        let out = rsi(&[10.0, 12.0, 11.0], 2);
        assert!((out[2] - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_bounds() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.9).sin() * 4.0).collect();
        for v in rsi(&closes, 14).iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v));
        }
    }

    // ---- cmo ---------------------------------------------------------------

    #[test]
    fn cmo_extremes() {
        let up = cmo(&ascending(20), 14);
        assert!((up[19] - 100.0).abs() < 1e-10);
        let down = cmo(&descending(20), 14);
        assert!((down[19] + 100.0).abs() < 1e-10);
    }

    #[test]
    fn cmo_matches_rsi_identity() {
        // CMO = 2 * RSI - 100 whenever the window moved at all
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 1.3).cos() * 3.0).collect();
        let r = rsi(&closes, 14);
        let c = cmo(&closes, 14);
        for i in 14..40 {
            assert!((c[i] - (2.0 * r[i] - 100.0)).abs() < 1e-9);
        }
    }

    // ---- stochrsi ----------------------------------------------------------

    #[test]
    fn stochrsi_warm_up_is_shared() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.5).sin() * 6.0).collect();
        let (k, d) = stochrsi(&closes, 14, 5, 3);
        assert!(k[19].is_nan() && d[19].is_nan());
        assert!(!k[20].is_nan() && !d[20].is_nan());
        for v in k.iter().chain(&d).filter(|v| !v.is_nan()) {
            assert!(*v > -1e-9 && *v < 100.0 + 1e-9);
        }
    }
}
