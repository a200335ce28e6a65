// =============================================================================
// Parabolic SAR
// =============================================================================
//
// Stop-and-reverse trails price with an accelerating step:
//   SAR_{t+1} = SAR_t + AF * (EP - SAR_t)
// EP is the extreme point of the current trend (highest high when long,
// lowest low when short). AF starts at `acceleration`, grows by the same
// step every time a new EP is set, and is capped at `maximum`.
//
// A long SAR may never rise above the last two lows, a short SAR may never
// fall below the last two highs. Price crossing the SAR flips the trend and
// the new SAR restarts at the previous EP.
//
// The starting direction comes from the first bar pair: a positive -DM
// (a lower low that outweighs any higher high) starts short, anything else
// starts long. Output begins at index 1.
// =============================================================================

use super::nan_series;

/// Parabolic SAR series; index 0 is NaN.
pub fn sar(high: &[f64], low: &[f64], acceleration: f64, maximum: f64) -> Vec<f64> {
    let n = high.len().min(low.len());
    let mut out = nan_series(n);
    if n < 2 {
        return out;
    }

    let step = acceleration.min(maximum);
    let mut af = step;

    let down_move = low[0] - low[1];
    let up_move = high[1] - high[0];
    let mut is_long = !(down_move > 0.0 && up_move < down_move);

    let (mut ep, mut sar) = if is_long {
        (high[1], low[0])
    } else {
        (low[1], high[0])
    };

    let mut new_high = high[0];
    let mut new_low = low[0];
    for i in 1..n {
        let prev_high = new_high;
        let prev_low = new_low;
        new_high = high[i];
        new_low = low[i];

        if is_long {
            if new_low <= sar {
                // reverse to short
                is_long = false;
                sar = ep.max(prev_high).max(new_high);
                out[i] = sar;
                af = step;
                ep = new_low;
                sar = (sar + af * (ep - sar)).max(prev_high).max(new_high);
            } else {
                out[i] = sar;
                if new_high > ep {
                    ep = new_high;
                    af = (af + step).min(maximum);
                }
                sar = (sar + af * (ep - sar)).min(prev_low).min(new_low);
            }
        } else if new_high >= sar {
            // reverse to long
            is_long = true;
            sar = ep.min(prev_low).min(new_low);
            out[i] = sar;
            af = step;
            ep = new_high;
            sar = (sar + af * (ep - sar)).min(prev_low).min(new_low);
        } else {
            out[i] = sar;
            if new_low < ep {
                ep = new_low;
                af = (af + step).min(maximum);
            }
            sar = (sar + af * (ep - sar)).max(prev_high).max(new_high);
        }
    }
    out
}
