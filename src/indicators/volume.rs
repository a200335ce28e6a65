// =============================================================================
// Volume Indicators
// =============================================================================
//
// AD     Chaikin accumulation/distribution line:
//          CLV = ((close - low) - (high - close)) / (high - low)
//          AD_t = AD_{t-1} + CLV * volume
// ADOSC  Chaikin oscillator: EMA(fast) - EMA(slow) of the AD line, both
//        averages seeded with the first AD value.
// OBV    On-balance volume: add the bar's volume on an up close, subtract it
//        on a down close, carry on an unchanged close.
// =============================================================================

use super::nan_series;

/// Accumulation/distribution line; defined from the first bar.
///
/// Bars with no range contribute nothing.
pub fn ad(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut running = 0.0;
    close
        .iter()
        .zip(volume)
        .enumerate()
        .map(|(i, (&c, &v))| {
            let range = high[i] - low[i];
            if range > 0.0 {
                running += ((c - low[i]) - (high[i] - c)) / range * v;
            }
            running
        })
        .collect()
}

/// Chaikin A/D oscillator, first value at index `slow - 1`.
pub fn adosc(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    fast: usize,
    slow: usize,
) -> Vec<f64> {
    let line = ad(high, low, close, volume);
    let mut out = nan_series(close.len());
    if line.is_empty() || fast == 0 || slow == 0 {
        return out;
    }

    let k_fast = 2.0 / (fast + 1) as f64;
    let k_slow = 2.0 / (slow + 1) as f64;
    let lookback = fast.max(slow) - 1;

    let mut fast_ema = line[0];
    let mut slow_ema = line[0];
    for (i, &value) in line.iter().enumerate().skip(1) {
        fast_ema += (value - fast_ema) * k_fast;
        slow_ema += (value - slow_ema) * k_slow;
        if i >= lookback {
            out[i] = fast_ema - slow_ema;
        }
    }
    if lookback == 0 {
        out[0] = 0.0;
    }
    out
}

/// On-balance volume, starting from the first bar's volume.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(close.len());
    let mut running = 0.0;
    for (i, (&c, &v)) in close.iter().zip(volume).enumerate() {
        if i == 0 {
            running = v;
        } else if c > close[i - 1] {
            running += v;
        } else if c < close[i - 1] {
            running -= v;
        }
        out.push(running);
    }
    out
}
