// =============================================================================
// Commodity Channel Index, Ultimate Oscillator, Money Flow Index
// =============================================================================
//
// Typical price  TP = (high + low + close) / 3
//
// CCI     = (TP - SMA(TP)) / (0.015 * mean absolute deviation of TP)
// ULTOSC  buying pressure BP = close - min(low, prev_close), averaged as
//           A_n = sum(BP, n) / sum(TR, n) for three windows, then
//           100 * (4 * A_short + 2 * A_mid + A_long) / 7
// MFI     raw money flow = TP * volume, split by whether TP rose or fell:
//           100 * positive_flow / (positive_flow + negative_flow)
// =============================================================================

use super::atr::true_range_at;
use super::nan_series;

const CCI_CONSTANT: f64 = 0.015;

fn typical_price(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    close
        .iter()
        .enumerate()
        .map(|(i, c)| (high[i] + low[i] + c) / 3.0)
        .collect()
}

/// Commodity Channel Index, first value at index `period - 1`.
///
/// # Edge cases
/// - A window with zero deviation yields 0.
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let tp = typical_price(high, low, close);
    let mut out = nan_series(tp.len());
    if period == 0 || tp.len() < period {
        return out;
    }

    let period_f = period as f64;
    for i in (period - 1)..tp.len() {
        let window = &tp[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period_f;
        let deviation = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period_f;
        let distance = tp[i] - mean;
        out[i] = if distance != 0.0 && deviation != 0.0 {
            distance / (CCI_CONSTANT * deviation)
        } else {
            0.0
        };
    }
    out
}

/// Ultimate Oscillator over three windows, first value at the longest window.
///
/// The periods may be given in any order; the shortest always carries
/// weight 4 and the longest weight 1.
pub fn ultosc(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    periods: [usize; 3],
) -> Vec<f64> {
    let n = close.len();
    let mut out = nan_series(n);
    let mut periods = periods;
    periods.sort_unstable();
    let longest = periods[2];
    if periods[0] == 0 || n <= longest {
        return out;
    }

    let pressure: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            if i == 0 {
                (0.0, 0.0)
            } else {
                let true_low = low[i].min(close[i - 1]);
                (close[i] - true_low, true_range_at(high, low, close, i))
            }
        })
        .collect();

    let average = |i: usize, p: usize| {
        let (bp, tr) = pressure[i + 1 - p..=i]
            .iter()
            .fold((0.0, 0.0), |(a, b), (x, y)| (a + x, b + y));
        if tr.abs() < 1e-8 {
            0.0
        } else {
            bp / tr
        }
    };

    for i in longest..n {
        let weighted =
            4.0 * average(i, periods[0]) + 2.0 * average(i, periods[1]) + average(i, periods[2]);
        out[i] = 100.0 * weighted / 7.0;
    }
    out
}

/// Money Flow Index, first value at index `period`.
///
/// # Edge cases
/// - Total flow below 1 (e.g. zero volume) yields 0.
/// - Unchanged typical price counts toward neither side.
pub fn mfi(high: &[f64], low: &[f64], close: &[f64], volume: &[f64], period: usize) -> Vec<f64> {
    let tp = typical_price(high, low, close);
    let n = tp.len().min(volume.len());
    let mut out = nan_series(tp.len());
    if period == 0 || n <= period {
        return out;
    }

    let flows: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            if i == 0 {
                return (0.0, 0.0);
            }
            let raw = tp[i] * volume[i];
            if tp[i] > tp[i - 1] {
                (raw, 0.0)
            } else if tp[i] < tp[i - 1] {
                (0.0, raw)
            } else {
                (0.0, 0.0)
            }
        })
        .collect();

    for i in period..n {
        let (pos, neg) = flows[i + 1 - period..=i]
            .iter()
            .fold((0.0, 0.0), |(a, b), (p, m)| (a + p, b + m));
        let total = pos + neg;
        out[i] = if total < 1.0 { 0.0 } else { 100.0 * pos / total };
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 50.0 + i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    // ---- cci ---------------------------------------------------------------

    #[test]
    fn cci_known_value() {
        // TP = close on flat bars; window [1, 2, 3]: mean 2, mean dev 2/3
        let x = [1.0, 2.0, 3.0];
        let out = cci(&x, &x, &x, 3);
        assert!(out[1].is_nan());
        assert!((out[2] - 1.0 / (0.015 * 2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn cci_flat_is_zero() {
        let x = [4.0; 20];
        assert!(cci(&x, &x, &x, 14)[13..].iter().all(|v| *v == 0.0));
    }

    // ---- ultosc ------------------------------------------------------------

    #[test]
    fn ultosc_warm_up_and_range() {
        let (h, l, c) = ramp(40);
        let out = ultosc(&h, &l, &c, [7, 14, 28]);
        assert!(out[27].is_nan());
        for v in &out[28..] {
            assert!(*v >= 0.0 && *v <= 100.0);
        }
    }

    #[test]
    fn ultosc_period_order_is_irrelevant() {
        let (h, l, c) = ramp(40);
        let a = ultosc(&h, &l, &c, [7, 14, 28]);
        let b = ultosc(&h, &l, &c, [28, 7, 14]);
        assert_eq!(a[35], b[35]);
    }

    // ---- mfi ---------------------------------------------------------------

    #[test]
    fn mfi_rising_prices_is_hundred() {
        let (h, l, c) = ramp(20);
        let v = vec![1_000.0; 20];
        let out = mfi(&h, &l, &c, &v, 14);
        assert!(out[13].is_nan());
        assert!((out[14] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn mfi_zero_volume_is_zero() {
        let (h, l, c) = ramp(20);
        let v = vec![0.0; 20];
        let out = mfi(&h, &l, &c, &v, 14);
        assert_eq!(out[19], 0.0);
    }
}
