// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Seed running sums of +DM, -DM and TR over bars 1..period-1, then apply
//      Wilder's smoothing:  S_t = S_{t-1} - S_{t-1} / period + value_t
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = mean of the first `period` DX values, then Wilder-smoothed.
//
// First ADX value: index 2 * period - 1 (27 for period 14).
// ADXR = (ADX_t + ADX_{t-(period-1)}) / 2, first value at 3 * period - 2.
// =============================================================================

use super::atr::true_range_at;
use super::nan_series;

const FLAT: f64 = 1e-8;

/// `(+DM, -DM)` for bar `i` against bar `i - 1`.
fn directional_movement(high: &[f64], low: &[f64], i: usize) -> (f64, f64) {
    let up_move = high[i] - high[i - 1];
    let down_move = low[i - 1] - low[i];

    if down_move > 0.0 && up_move < down_move {
        (0.0, down_move)
    } else if up_move > 0.0 && up_move > down_move {
        (up_move, 0.0)
    } else {
        (0.0, 0.0)
    }
}

/// Compute DX from smoothed +DM, -DM, and TR values.
///
/// Returns `None` when the range or the DI sum is (numerically) zero; the
/// caller then leaves its running ADX untouched.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr.abs() < FLAT {
        return None;
    }
    let plus_di = 100.0 * smooth_plus_dm / smooth_tr;
    let minus_di = 100.0 * smooth_minus_dm / smooth_tr;
    let di_sum = plus_di + minus_di;
    if di_sum.abs() < FLAT {
        return None;
    }
    Some(100.0 * (plus_di - minus_di).abs() / di_sum)
}

/// Full ADX series for the given price columns.
///
/// # Edge cases
/// - `period == 0` or fewer than `2 * period` bars => all NaN
/// - Bars with no range and no directional movement keep the previous ADX.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = nan_series(n);
    if period == 0 || n < 2 * period {
        return out;
    }

    let period_f = period as f64;
    let mut plus = 0.0;
    let mut minus = 0.0;
    let mut tr = 0.0;
    for i in 1..period {
        let (p, m) = directional_movement(high, low, i);
        plus += p;
        minus += m;
        tr += true_range_at(high, low, close, i);
    }

    let mut smooth = |i: usize| {
        let (p, m) = directional_movement(high, low, i);
        plus = plus - plus / period_f + p;
        minus = minus - minus / period_f + m;
        tr = tr - tr / period_f + true_range_at(high, low, close, i);
        compute_dx(plus, minus, tr)
    };

    // --- Seed ADX with the mean of the first `period` DX values --------------
    let mut sum_dx = 0.0;
    for i in period..2 * period {
        sum_dx += smooth(i).unwrap_or(0.0);
    }
    let mut current = sum_dx / period_f;
    out[2 * period - 1] = current;

    // --- Wilder's smoothing for subsequent values ----------------------------
    for i in 2 * period..n {
        if let Some(dx) = smooth(i) {
            current = (current * (period_f - 1.0) + dx) / period_f;
        }
        out[i] = current;
    }
    out
}

/// Average directional movement rating.
pub fn adxr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let a = adx(high, low, close, period);
    let mut out = nan_series(a.len());
    if period == 0 {
        return out;
    }
    let lag = period - 1;
    for i in lag..a.len() {
        if !a[i].is_nan() && !a[i - lag].is_nan() {
            out[i] = (a[i] + a[i - lag]) / 2.0;
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Steadily rising bars: every bar has +DM = 1 and -DM = 0.
    fn uptrend(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let high: Vec<f64> = (0..n).map(|i| i as f64 + 2.0).collect();
        let low: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let close: Vec<f64> = (0..n).map(|i| i as f64 + 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn adx_period_zero() {
        let (h, l, c) = uptrend(50);
        assert!(adx(&h, &l, &c, 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn adx_insufficient_data() {
        let (h, l, c) = uptrend(27);
        assert!(adx(&h, &l, &c, 14).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn adx_first_value_index() {
        let (h, l, c) = uptrend(60);
        let out = adx(&h, &l, &c, 14);
        assert!(out[26].is_nan());
        assert!(!out[27].is_nan());
    }

    #[test]
    fn adx_pure_trend_is_hundred() {
        let (h, l, c) = uptrend(60);
        let out = adx(&h, &l, &c, 14);
        for v in &out[27..] {
            assert!((v - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn adx_flat_market_is_zero() {
        let flat = vec![10.0; 40];
        let out = adx(&flat, &flat, &flat, 14);
        assert!(out[27..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn adx_bounds() {
        let close: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        for v in adx(&high, &low, &close, 14).iter().filter(|v| !v.is_nan()) {
            assert!(*v >= 0.0 && *v <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn adxr_warm_up_and_value() {
        let (h, l, c) = uptrend(60);
        let out = adxr(&h, &l, &c, 14);
        assert!(out[39].is_nan());
        assert!((out[40] - 100.0).abs() < 1e-9);
    }
}
