// =============================================================================
// Four- and five-bar candlestick patterns
// =============================================================================
//
// CDL3BLACKCROWS, CDL3LINESTRIKE, CDLBREAKAWAY, CDLCONCEALBABYSWALL,
// CDLHIKKAKEMOD, CDLLADDERBOTTOM, CDLMATHOLD, CDLRISEFALL3METHODS
// =============================================================================

use super::candle::{lookback, Candles, BODY_LONG, BODY_SHORT, NEAR, SHADOW_VERY_SHORT};
use super::three_bar::hikkake_scan;

const MAT_HOLD_PENETRATION: f64 = 0.5;

/// A white candle followed by three declining black candles, each opening
/// inside the prior body.
pub fn three_black_crows(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT], 3), |i| {
        let (w, a, b) = (i - 3, i - 2, i - 1);
        let short_bottoms = c.lower_shadow(a) < c.avg(SHADOW_VERY_SHORT, a)
            && c.lower_shadow(b) < c.avg(SHADOW_VERY_SHORT, b)
            && c.lower_shadow(i) < c.avg(SHADOW_VERY_SHORT, i);
        if c.is_white(w)
            && c.is_black(a)
            && c.is_black(b)
            && c.is_black(i)
            && short_bottoms
            && c.open[b] < c.open[a]
            && c.open[b] > c.close[a]
            && c.open[i] < c.open[b]
            && c.open[i] > c.close[b]
            && c.high[w] > c.close[a]
            && c.close[a] > c.close[b]
            && c.close[b] > c.close[i]
        {
            -100
        } else {
            0
        }
    })
}

/// Three same-color candles in a row wiped out by a fourth opposite candle.
pub fn three_line_strike(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[NEAR], 3), |i| {
        let (a, b, d) = (i - 3, i - 2, i - 1);
        let same = c.color(a) == c.color(b) && c.color(b) == c.color(d) && c.color(i) == -c.color(d);
        let opens_near = c.open[b] >= c.body_bottom(a) - c.avg(NEAR, a)
            && c.open[b] <= c.body_top(a) + c.avg(NEAR, a)
            && c.open[d] >= c.body_bottom(b) - c.avg(NEAR, b)
            && c.open[d] <= c.body_top(b) + c.avg(NEAR, b);
        let bull_run = c.is_white(d)
            && c.close[d] > c.close[b]
            && c.close[b] > c.close[a]
            && c.open[i] > c.close[d]
            && c.close[i] < c.open[a];
        let bear_run = c.is_black(d)
            && c.close[d] < c.close[b]
            && c.close[b] < c.close[a]
            && c.open[i] < c.close[d]
            && c.close[i] > c.open[a];
        if same && opens_near && (bull_run || bear_run) {
            100 * c.color(d)
        } else {
            0
        }
    })
}

/// Long candle, a gap, three candles drifting with the trend, then a
/// reversal closing inside the gap.
pub fn breakaway(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG], 4), |i| {
        let (a, b, m, d) = (i - 4, i - 3, i - 2, i - 1);
        let shape = c.body(a) > c.avg(BODY_LONG, a)
            && c.color(a) == c.color(b)
            && c.color(b) == c.color(d)
            && c.color(d) == -c.color(i);
        let down = c.is_black(a)
            && c.real_body_gap_down(b, a)
            && c.high[m] < c.high[b]
            && c.low[m] < c.low[b]
            && c.high[d] < c.high[m]
            && c.low[d] < c.low[m]
            && c.close[i] > c.open[b]
            && c.close[i] < c.close[a];
        let up = c.is_white(a)
            && c.real_body_gap_up(b, a)
            && c.high[m] > c.high[b]
            && c.low[m] > c.low[b]
            && c.high[d] > c.high[m]
            && c.low[d] > c.low[m]
            && c.close[i] < c.open[b]
            && c.close[i] > c.close[a];
        if shape && (down || up) {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Two black marubozu, a black candle gapping down with an upper shadow
/// into the prior body, then a black candle engulfing it.
pub fn conceal_baby_swallow(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT], 3), |i| {
        let (a, b, d) = (i - 3, i - 2, i - 1);
        let shaven = |k: usize| {
            let svs = c.avg(SHADOW_VERY_SHORT, k);
            c.lower_shadow(k) < svs && c.upper_shadow(k) < svs
        };
        if c.is_black(a)
            && c.is_black(b)
            && c.is_black(d)
            && c.is_black(i)
            && shaven(a)
            && shaven(b)
            && c.real_body_gap_down(d, b)
            && c.upper_shadow(d) > c.avg(SHADOW_VERY_SHORT, d)
            && c.high[d] > c.close[b]
            && c.high[i] > c.high[d]
            && c.low[i] < c.low[d]
        {
            100
        } else {
            0
        }
    })
}

/// Hikkake whose inside bar is itself inside a prior bar and closes near
/// its extreme.
pub fn hikkake_mod(c: &Candles) -> Vec<i32> {
    hikkake_scan(c, lookback(&[NEAR], 5), 3, |i| {
        let nested = c.high[i - 2] < c.high[i - 3]
            && c.low[i - 2] > c.low[i - 3]
            && c.high[i - 1] < c.high[i - 2]
            && c.low[i - 1] > c.low[i - 2];
        if !nested {
            return None;
        }
        let near = c.avg(NEAR, i - 2);
        if c.high[i] < c.high[i - 1] && c.low[i] < c.low[i - 1] && c.close[i - 2] <= c.low[i - 2] + near {
            Some(100)
        } else if c.high[i] > c.high[i - 1] && c.low[i] > c.low[i - 1] && c.close[i - 2] >= c.high[i - 2] - near {
            Some(-100)
        } else {
            None
        }
    })
}

/// Three descending black candles, a black with an upper shadow, then a
/// white candle closing above that shadow.
pub fn ladder_bottom(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT], 4), |i| {
        let (a, b, m, d) = (i - 4, i - 3, i - 2, i - 1);
        if c.is_black(a)
            && c.is_black(b)
            && c.is_black(m)
            && c.open[a] > c.open[b]
            && c.open[b] > c.open[m]
            && c.close[a] > c.close[b]
            && c.close[b] > c.close[m]
            && c.is_black(d)
            && c.upper_shadow(d) > c.avg(SHADOW_VERY_SHORT, d)
            && c.is_white(i)
            && c.open[i] > c.open[d]
            && c.close[i] > c.high[d]
        {
            100
        } else {
            0
        }
    })
}

/// Long white, a gap up, three small candles holding inside the first body,
/// then a white candle breaking out to new highs.
pub fn mat_hold(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 4), |i| {
        let (a, b, m, d) = (i - 4, i - 3, i - 2, i - 1);
        let floor = c.close[a] - c.body(a) * MAT_HOLD_PENETRATION;
        let small = c.body(b) < c.avg(BODY_SHORT, b)
            && c.body(m) < c.avg(BODY_SHORT, m)
            && c.body(d) < c.avg(BODY_SHORT, d);
        let holding = c.body_bottom(m) < c.close[a]
            && c.body_bottom(d) < c.close[a]
            && c.body_bottom(m) > floor
            && c.body_bottom(d) > floor
            && c.body_top(m) < c.open[b]
            && c.body_top(d) < c.body_top(m);
        let breakout = c.open[i] > c.close[d] && c.close[i] > c.high[b].max(c.high[m]).max(c.high[d]);
        if c.body(a) > c.avg(BODY_LONG, a)
            && small
            && c.is_white(a)
            && c.is_black(b)
            && c.is_white(i)
            && c.real_body_gap_up(b, a)
            && holding
            && breakout
        {
            100
        } else {
            0
        }
    })
}

/// Long candle, three small counter-trend candles inside its range, then a
/// long candle resuming the trend to a new close.
pub fn rise_fall_three_methods(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 4), |i| {
        let (a, b, m, d) = (i - 4, i - 3, i - 2, i - 1);
        let dir = c.color(a) as f64;
        let inside_first = |k: usize| c.body_bottom(k) < c.high[a] && c.body_top(k) > c.low[a];
        if c.body(a) > c.avg(BODY_LONG, a)
            && c.body(b) < c.avg(BODY_SHORT, b)
            && c.body(m) < c.avg(BODY_SHORT, m)
            && c.body(d) < c.avg(BODY_SHORT, d)
            && c.body(i) > c.avg(BODY_LONG, i)
            && c.color(a) == -c.color(b)
            && c.color(b) == c.color(m)
            && c.color(m) == c.color(d)
            && c.color(d) == -c.color(i)
            && inside_first(b)
            && inside_first(m)
            && inside_first(d)
            && c.close[m] * dir < c.close[b] * dir
            && c.close[d] * dir < c.close[m] * dir
            && c.open[i] * dir > c.close[d] * dir
            && c.close[i] * dir > c.close[a] * dir
        {
            100 * c.color(a)
        } else {
            0
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Ten quiet white bars (body 1, range 3) around 100, then the given bars.
    fn history(tail: &[(f64, f64, f64, f64)]) -> [Vec<f64>; 4] {
        let mut cols: [Vec<f64>; 4] = Default::default();
        for _ in 0..10 {
            cols[0].push(100.0);
            cols[1].push(102.0);
            cols[2].push(99.0);
            cols[3].push(101.0);
        }
        for &(o, h, l, cl) in tail {
            cols[0].push(o);
            cols[1].push(h);
            cols[2].push(l);
            cols[3].push(cl);
        }
        cols
    }

    fn run(f: fn(&Candles) -> Vec<i32>, cols: &[Vec<f64>; 4]) -> Vec<i32> {
        let k = Candles::new(&cols[0], &cols[1], &cols[2], &cols[3]);
        f(&k)
    }

    fn last(f: fn(&Candles) -> Vec<i32>, cols: &[Vec<f64>; 4]) -> i32 {
        *run(f, cols).last().unwrap()
    }

    #[test]
    fn three_black_crows_after_white() {
        let cols = history(&[
            (101.0, 106.0, 100.9, 105.5),
            (105.0, 105.1, 102.98, 103.0),
            (104.0, 104.1, 100.98, 101.0),
            (102.0, 102.1, 98.98, 99.0),
        ]);
        assert_eq!(last(three_black_crows, &cols), -100);
    }

    #[test]
    fn bullish_three_line_strike_scores_positive() {
        let cols = history(&[
            (100.0, 102.1, 99.9, 102.0),
            (101.5, 103.6, 101.4, 103.5),
            (103.0, 105.1, 102.9, 105.0),
            (105.5, 105.6, 99.0, 99.5),
        ]);
        assert_eq!(last(three_line_strike, &cols), 100);
    }

    #[test]
    fn ladder_bottom_fires() {
        let cols = history(&[
            (104.0, 104.1, 102.4, 102.5),
            (103.0, 103.1, 101.4, 101.5),
            (102.0, 102.1, 100.4, 100.5),
            (101.0, 102.5, 99.9, 100.0),
            (101.5, 103.5, 101.4, 103.0),
        ]);
        assert_eq!(last(ladder_bottom, &cols), 100);
    }

    #[test]
    fn rising_three_methods() {
        let cols = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (103.6, 103.8, 103.0, 103.2),
            (103.1, 103.3, 102.5, 102.7),
            (102.6, 102.8, 102.0, 102.2),
            (102.5, 106.2, 102.4, 106.0),
        ]);
        assert_eq!(last(rise_fall_three_methods, &cols), 100);
    }

    #[test]
    fn mat_hold_fires() {
        let cols = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (105.0, 105.2, 104.5, 104.7),
            (104.4, 104.6, 103.2, 103.5),
            (103.3, 103.5, 102.7, 102.9),
            (103.2, 106.0, 103.1, 105.8),
        ]);
        assert_eq!(last(mat_hold, &cols), 100);
    }

    #[test]
    fn breakaway_bearish() {
        let cols = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (105.0, 105.8, 104.9, 105.5),
            (105.6, 106.3, 105.2, 105.9),
            (106.0, 106.8, 105.6, 106.5),
            (106.3, 106.4, 104.5, 104.8),
        ]);
        assert_eq!(last(breakaway, &cols), -100);
    }

    #[test]
    fn hikkake_mod_confirms() {
        let cols = history(&[
            (100.0, 104.0, 96.0, 101.0),  // outer bar
            (100.0, 103.0, 97.0, 97.2),   // inside, closes near its low
            (98.0, 102.0, 98.0, 99.0),    // inside the inside
            (97.0, 101.0, 96.5, 97.5),    // false breakdown -> +100
            (98.0, 102.5, 97.8, 102.4),   // close above 102 -> +200
        ]);
        let out = run(hikkake_mod, &cols);
        let n = out.len();
        assert_eq!(out[n - 2], 100);
        assert_eq!(out[n - 1], 200);
    }

    #[test]
    fn conceal_baby_swallow_engulfs_third_candle() {
        let cols = history(&[
            (104.0, 104.1, 101.95, 102.0),
            (102.0, 102.05, 99.95, 100.0),
            (99.5, 100.5, 98.9, 99.0),
            (101.0, 101.2, 97.5, 97.8),
        ]);
        assert_eq!(last(conceal_baby_swallow, &cols), 100);

        // last candle stays above the third candle's low
        let partial = history(&[
            (104.0, 104.1, 101.95, 102.0),
            (102.0, 102.05, 99.95, 100.0),
            (99.5, 100.5, 98.9, 99.0),
            (101.0, 101.2, 99.0, 99.2),
        ]);
        assert_eq!(last(conceal_baby_swallow, &partial), 0);
    }

    #[test]
    fn short_history_is_all_zero() {
        let cols = [vec![1.0; 4], vec![2.0; 4], vec![0.5; 4], vec![1.5; 4]];
        assert!(run(breakaway, &cols).iter().all(|&v| v == 0));
        assert!(run(hikkake_mod, &cols).iter().all(|&v| v == 0));
    }
}
