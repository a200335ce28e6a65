// =============================================================================
// Moving Average Convergence / Divergence and price oscillators
// =============================================================================
//
// MACD     = EMA(fast) - EMA(slow)
// Signal   = EMA(signal_period) of MACD
// Hist     = MACD - Signal
//
// The fast EMA is seeded on the same bar as the slow one (its SMA seed covers
// the `fast` closes ending at index slow - 1), so the MACD line starts at
// slow - 1 and all three outputs are published from
// slow - 1 + signal_period - 1 (index 33 for 12/26/9).
//
// APO = SMA(fast) - SMA(slow)
// PPO = (SMA(fast) - SMA(slow)) / SMA(slow) * 100
// =============================================================================

use super::ema::ema_seeded_at;
use super::moving_average::sma;
use super::nan_series;

/// MACD line, signal line and histogram, each aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

/// Calculate MACD for `closes`.
///
/// # Edge cases
/// - `fast > slow` is treated as if the two were swapped.
/// - Any zero period or too short an input => all three lines NaN.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdLines {
    let n = closes.len();
    let (fast, slow) = if fast > slow { (slow, fast) } else { (fast, slow) };
    let blank = || MacdLines {
        macd: nan_series(n),
        signal: nan_series(n),
        hist: nan_series(n),
    };
    if fast == 0 || signal_period == 0 || n < slow {
        return blank();
    }

    let start = slow - 1;
    let fast_ema = ema_seeded_at(closes, fast, start);
    let slow_ema = ema_seeded_at(closes, slow, start);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();

    let signal_start = start + signal_period - 1;
    if signal_start >= n {
        return blank();
    }
    let signal = ema_seeded_at(&line, signal_period, signal_start);

    let mut out = blank();
    for i in signal_start..n {
        out.macd[i] = line[i];
        out.signal[i] = signal[i];
        out.hist[i] = line[i] - signal[i];
    }
    out
}

/// Absolute price oscillator with simple averages, first value at `slow - 1`.
pub fn apo(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let f = sma(closes, fast);
    let s = sma(closes, slow);
    f.iter().zip(&s).map(|(a, b)| a - b).collect()
}

/// Percentage price oscillator with simple averages, first value at
/// `slow - 1`. A zero slow average yields 0.
pub fn ppo(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let f = sma(closes, fast);
    let s = sma(closes, slow);
    f.iter()
        .zip(&s)
        .map(|(&a, &b)| {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else if b == 0.0 {
                0.0
            } else {
                (a - b) / b * 100.0
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|v| v as f64).collect()
    }

    // ---- macd --------------------------------------------------------------

    #[test]
    fn macd_default_warm_up() {
        let out = macd(&ascending(60), 12, 26, 9);
        assert_eq!(out.macd.len(), 60);
        assert!(out.macd[32].is_nan());
        assert!(out.signal[32].is_nan());
        assert!(!out.macd[33].is_nan());
        assert!(!out.signal[33].is_nan());
        assert!(!out.hist[33].is_nan());
    }

    #[test]
    fn macd_on_line_is_lag_difference() {
        // EMA lag on a straight line is (period - 1) / 2, so MACD = 12.5 - 5.5
        let out = macd(&ascending(80), 12, 26, 9);
        for i in 33..80 {
            assert!((out.macd[i] - 7.0).abs() < 1e-9);
            assert!(out.hist[i].abs() < 1e-9);
        }
    }

    #[test]
    fn macd_too_short_is_blank() {
        let out = macd(&ascending(30), 12, 26, 9);
        assert!(out.macd.iter().all(|v| v.is_nan()));
        assert!(out.hist.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn macd_swaps_inverted_periods() {
        let a = macd(&ascending(60), 12, 26, 9);
        let b = macd(&ascending(60), 26, 12, 9);
        assert!((a.macd[50] - b.macd[50]).abs() < 1e-12);
    }

    // ---- apo / ppo ---------------------------------------------------------

    #[test]
    fn apo_and_ppo_on_line() {
        let x = ascending(40);
        let a = apo(&x, 12, 26);
        assert!(a[24].is_nan());
        // SMA lag difference: 12.5 - 5.5
        assert!((a[25] - 7.0).abs() < 1e-9);

        let p = ppo(&x, 12, 26);
        // slow SMA at index 25 = 13.5, fast = 20.5
        assert!((p[25] - 7.0 / 13.5 * 100.0).abs() < 1e-9);
    }
}
