// =============================================================================
// Three-bar candlestick patterns
// =============================================================================
//
// CDL2CROWS, CDL3INSIDE, CDL3OUTSIDE, CDL3STARSINSOUTH, CDL3WHITESOLDIERS,
// CDLABANDONEDBABY, CDLADVANCEBLOCK, CDLEVENINGDOJISTAR, CDLEVENINGSTAR,
// CDLGAPSIDESIDEWHITE, CDLHIKKAKE, CDLIDENTICAL3CROWS, CDLMORNINGDOJISTAR,
// CDLMORNINGSTAR, CDLSTALLEDPATTERN, CDLSTICKSANDWICH, CDLTASUKIGAP,
// CDLTRISTAR, CDLUNIQUE3RIVER, CDLUPSIDEGAP2CROWS, CDLXSIDEGAP3METHODS
//
// Bars are named a = i - 2, b = i - 1 and bar `i` itself.
// =============================================================================

use super::candle::{
    lookback, Candles, BODY_DOJI, BODY_LONG, BODY_SHORT, EQUAL, FAR, NEAR, SHADOW_LONG,
    SHADOW_SHORT, SHADOW_VERY_SHORT,
};

/// Default penetration into the first body for the star patterns.
const STAR_PENETRATION: f64 = 0.3;

fn within(value: f64, anchor: f64, tolerance: f64) -> bool {
    value <= anchor + tolerance && value >= anchor - tolerance
}

/// Long white, a black gapping up, then a black closing inside the white body.
pub fn two_crows(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        if c.is_white(a)
            && c.body(a) > c.avg(BODY_LONG, a)
            && c.is_black(b)
            && c.real_body_gap_up(b, a)
            && c.is_black(i)
            && c.open[i] < c.open[b]
            && c.open[i] > c.close[b]
            && c.close[i] > c.open[a]
            && c.close[i] < c.close[a]
        {
            -100
        } else {
            0
        }
    })
}

/// Harami confirmed by a third candle closing beyond the first open.
pub fn three_inside(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let harami = c.body(a) > c.avg(BODY_LONG, a)
            && c.body(b) <= c.avg(BODY_SHORT, b)
            && c.body_top(b) < c.body_top(a)
            && c.body_bottom(b) > c.body_bottom(a);
        let confirmed = (c.is_white(a) && c.is_black(i) && c.close[i] < c.open[a])
            || (c.is_black(a) && c.is_white(i) && c.close[i] > c.open[a]);
        if harami && confirmed {
            -100 * c.color(a)
        } else {
            0
        }
    })
}

/// Engulfing confirmed by a third close in the engulfing direction.
pub fn three_outside(c: &Candles) -> Vec<i32> {
    c.scan(3, |i| {
        let (a, b) = (i - 2, i - 1);
        let up = c.is_white(b)
            && c.is_black(a)
            && c.close[b] > c.open[a]
            && c.open[b] < c.close[a]
            && c.close[i] > c.close[b];
        let down = c.is_black(b)
            && c.is_white(a)
            && c.open[b] > c.close[a]
            && c.close[b] < c.open[a]
            && c.close[i] < c.close[b];
        if up || down {
            100 * c.color(b)
        } else {
            0
        }
    })
}

/// Three black candles, each smaller and holding above the previous low.
pub fn three_stars_in_south(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, SHADOW_LONG, BODY_LONG, BODY_SHORT], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let all_black = c.is_black(a) && c.is_black(b) && c.is_black(i);
        let first = c.body(a) > c.avg(BODY_LONG, a) && c.lower_shadow(a) > c.avg(SHADOW_LONG, a);
        let second = c.body(b) < c.body(a)
            && c.open[b] > c.close[a]
            && c.open[b] <= c.high[a]
            && c.low[b] < c.close[a]
            && c.low[b] >= c.low[a]
            && c.lower_shadow(b) > c.avg(SHADOW_VERY_SHORT, b);
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        let third = c.body(i) < c.avg(BODY_SHORT, i)
            && c.lower_shadow(i) < svs
            && c.upper_shadow(i) < svs
            && c.low[i] > c.low[b]
            && c.high[i] < c.high[b];
        if all_black && first && second && third {
            100
        } else {
            0
        }
    })
}

/// Three advancing white candles with short upper shadows.
pub fn three_white_soldiers(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, BODY_SHORT, FAR, NEAR], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let all_white = c.is_white(a) && c.is_white(b) && c.is_white(i);
        let short_tops = c.upper_shadow(a) < c.avg(SHADOW_VERY_SHORT, a)
            && c.upper_shadow(b) < c.avg(SHADOW_VERY_SHORT, b)
            && c.upper_shadow(i) < c.avg(SHADOW_VERY_SHORT, i);
        let rising = c.close[i] > c.close[b] && c.close[b] > c.close[a];
        let opens_in_body = c.open[b] > c.open[a]
            && c.open[b] <= c.close[a] + c.avg(NEAR, a)
            && c.open[i] > c.open[b]
            && c.open[i] <= c.close[b] + c.avg(NEAR, b);
        let not_shrinking = c.body(b) > c.body(a) - c.avg(FAR, a)
            && c.body(i) > c.body(b) - c.avg(FAR, b)
            && c.body(i) > c.avg(BODY_SHORT, i);
        if all_white && short_tops && rising && opens_in_body && not_shrinking {
            100
        } else {
            0
        }
    })
}

/// Doji isolated by full gaps on both sides, reversing the first candle.
pub fn abandoned_baby(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, BODY_LONG, BODY_SHORT], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let shape = c.body(a) > c.avg(BODY_LONG, a)
            && c.body(b) <= c.avg(BODY_DOJI, b)
            && c.body(i) > c.avg(BODY_SHORT, i);
        let penetration = c.body(a) * STAR_PENETRATION;
        let top = c.is_white(a)
            && c.is_black(i)
            && c.close[i] < c.close[a] - penetration
            && c.candle_gap_up(b, a)
            && c.candle_gap_down(i, b);
        let bottom = c.is_black(a)
            && c.is_white(i)
            && c.close[i] > c.close[a] + penetration
            && c.candle_gap_down(b, a)
            && c.candle_gap_up(i, b);
        if shape && (top || bottom) {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Three white candles losing momentum: shrinking bodies or growing tops.
pub fn advance_block(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_LONG, SHADOW_SHORT, FAR, NEAR, BODY_LONG], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let all_white = c.is_white(a) && c.is_white(b) && c.is_white(i);
        let rising = c.close[i] > c.close[b] && c.close[b] > c.close[a];
        let opens_in_body = c.open[b] > c.open[a]
            && c.open[b] <= c.close[a] + c.avg(NEAR, a)
            && c.open[i] > c.open[b]
            && c.open[i] <= c.close[b] + c.avg(NEAR, b);
        let strong_first = c.body(a) > c.avg(BODY_LONG, a) && c.upper_shadow(a) < c.avg(SHADOW_SHORT, a);
        let weakening = (c.body(b) < c.body(a) - c.avg(FAR, a) && c.body(i) < c.body(b) + c.avg(NEAR, b))
            || c.body(i) < c.body(b) - c.avg(FAR, b)
            || (c.body(i) < c.body(b)
                && c.body(b) < c.body(a)
                && (c.upper_shadow(i) > c.avg(SHADOW_SHORT, i) || c.upper_shadow(b) > c.avg(SHADOW_SHORT, b)))
            || (c.body(i) < c.body(b) && c.upper_shadow(i) > c.avg(SHADOW_LONG, i));
        if all_white && rising && opens_in_body && strong_first && weakening {
            -100
        } else {
            0
        }
    })
}

/// Shared shape of the four star patterns; `middle` is the bound on the
/// star's body and `direction` is +1 for morning, -1 for evening.
fn star(c: &Candles, i: usize, middle: f64, direction: i32) -> bool {
    let (a, b) = (i - 2, i - 1);
    let penetration = c.body(a) * STAR_PENETRATION;
    let base = c.body(a) > c.avg(BODY_LONG, a) && c.body(b) <= middle && c.body(i) > c.avg(BODY_SHORT, i);
    if !base {
        return false;
    }
    if direction < 0 {
        c.is_white(a) && c.real_body_gap_up(b, a) && c.is_black(i) && c.close[i] < c.close[a] - penetration
    } else {
        c.is_black(a) && c.real_body_gap_down(b, a) && c.is_white(i) && c.close[i] > c.close[a] + penetration
    }
}

pub fn evening_doji_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, BODY_LONG, BODY_SHORT], 2), |i| {
        if star(c, i, c.avg(BODY_DOJI, i - 1), -1) {
            -100
        } else {
            0
        }
    })
}

pub fn evening_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 2), |i| {
        if star(c, i, c.avg(BODY_SHORT, i - 1), -1) {
            -100
        } else {
            0
        }
    })
}

pub fn morning_doji_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, BODY_LONG, BODY_SHORT], 2), |i| {
        if star(c, i, c.avg(BODY_DOJI, i - 1), 1) {
            100
        } else {
            0
        }
    })
}

pub fn morning_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 2), |i| {
        if star(c, i, c.avg(BODY_SHORT, i - 1), 1) {
            100
        } else {
            0
        }
    })
}

/// Two similar white candles side by side after a gap.
pub fn gap_side_side_white(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[NEAR, EQUAL], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let gap_up = c.real_body_gap_up(b, a) && c.real_body_gap_up(i, a);
        let gap_down = c.real_body_gap_down(b, a) && c.real_body_gap_down(i, a);
        if (gap_up || gap_down)
            && c.is_white(b)
            && c.is_white(i)
            && within(c.body(i), c.body(b), c.avg(NEAR, b))
            && within(c.open[i], c.open[b], c.avg(EQUAL, b))
        {
            if c.real_body_gap_up(b, a) {
                100
            } else {
                -100
            }
        } else {
            0
        }
    })
}

/// Drive a hikkake-style state machine. `setup` reports a fresh breakout at
/// bar `i` (+100 / -100); a pending breakout confirms within three bars when
/// the close clears the inside bar's far extreme, scoring ±200.
pub(super) fn hikkake_scan(
    c: &Candles,
    lookback: usize,
    first_setup: usize,
    setup: impl Fn(usize) -> Option<i32>,
) -> Vec<i32> {
    let mut out = vec![0; c.len()];
    let mut pending: Option<(usize, i32)> = None;

    for i in first_setup.max(lookback.saturating_sub(3))..c.len() {
        let confirmed = pending
            .filter(|&(idx, result)| {
                i <= idx + 3
                    && ((result > 0 && c.close[i] > c.high[idx - 1]) || (result < 0 && c.close[i] < c.low[idx - 1]))
            })
            .map(|(_, result)| result);

        let score = if let Some(result) = setup(i) {
            pending = Some((i, result));
            result
        } else if let Some(result) = confirmed {
            pending = None;
            result + 100 * result.signum()
        } else {
            0
        };

        if i >= lookback {
            out[i] = score;
        }
    }
    out
}

/// Inside bar followed by a false breakout; scores ±100 on the breakout and
/// ±200 when price confirms within three bars.
pub fn hikkake(c: &Candles) -> Vec<i32> {
    hikkake_scan(c, 5, 2, |i| {
        let inside = c.high[i - 1] < c.high[i - 2] && c.low[i - 1] > c.low[i - 2];
        let lower = c.high[i] < c.high[i - 1] && c.low[i] < c.low[i - 1];
        let higher = c.high[i] > c.high[i - 1] && c.low[i] > c.low[i - 1];
        match (inside, lower, higher) {
            (true, true, _) => Some(100),
            (true, _, true) => Some(-100),
            _ => None,
        }
    })
}

/// Three black candles each opening at the prior close.
pub fn identical_three_crows(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, EQUAL], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let all_black = c.is_black(a) && c.is_black(b) && c.is_black(i);
        let short_bottoms = c.lower_shadow(a) < c.avg(SHADOW_VERY_SHORT, a)
            && c.lower_shadow(b) < c.avg(SHADOW_VERY_SHORT, b)
            && c.lower_shadow(i) < c.avg(SHADOW_VERY_SHORT, i);
        let falling = c.close[a] > c.close[b] && c.close[b] > c.close[i];
        let chained = within(c.open[b], c.close[a], c.avg(EQUAL, a)) && within(c.open[i], c.close[b], c.avg(EQUAL, b));
        if all_black && short_bottoms && falling && chained {
            -100
        } else {
            0
        }
    })
}

/// Two long white candles followed by a small one riding the second's close.
pub fn stalled_pattern(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG, BODY_SHORT, SHADOW_VERY_SHORT, NEAR], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        if c.is_white(a)
            && c.is_white(b)
            && c.is_white(i)
            && c.close[i] > c.close[b]
            && c.close[b] > c.close[a]
            && c.body(a) > c.avg(BODY_LONG, a)
            && c.body(b) > c.avg(BODY_LONG, b)
            && c.upper_shadow(b) < c.avg(SHADOW_VERY_SHORT, b)
            && c.open[b] > c.open[a]
            && c.open[b] <= c.close[a] + c.avg(NEAR, a)
            && c.body(i) < c.avg(BODY_SHORT, i)
            && c.open[i] >= c.close[b] - c.body(i) - c.avg(NEAR, b)
        {
            -100
        } else {
            0
        }
    })
}

/// Black, white, black with the outer closes matching.
pub fn stick_sandwich(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        if c.is_black(a)
            && c.is_white(b)
            && c.is_black(i)
            && c.low[b] > c.close[a]
            && within(c.close[i], c.close[a], c.avg(EQUAL, a))
        {
            100
        } else {
            0
        }
    })
}

/// Gap continuation: the third candle retraces into but does not fill the gap.
pub fn tasuki_gap(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[NEAR], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let similar = (c.body(b) - c.body(i)).abs() < c.avg(NEAR, b);
        let upside = c.real_body_gap_up(b, a)
            && c.is_white(b)
            && c.is_black(i)
            && c.open[i] < c.close[b]
            && c.open[i] > c.open[b]
            && c.close[i] < c.open[b]
            && c.close[i] > c.body_top(a);
        let downside = c.real_body_gap_down(b, a)
            && c.is_black(b)
            && c.is_white(i)
            && c.open[i] < c.open[b]
            && c.open[i] > c.close[b]
            && c.close[i] > c.open[b]
            && c.close[i] < c.body_bottom(a);
        if upside && similar {
            100
        } else if downside && similar {
            -100
        } else {
            0
        }
    })
}

/// Three dojis with the middle one gapping away.
pub fn tristar(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        let doji = c.avg(BODY_DOJI, a);
        if !(c.body(a) <= doji && c.body(b) <= doji && c.body(i) <= doji) {
            return 0;
        }
        if c.real_body_gap_up(b, a) && c.body_top(i) < c.body_top(b) {
            -100
        } else if c.real_body_gap_down(b, a) && c.body_bottom(i) > c.body_bottom(b) {
            100
        } else {
            0
        }
    })
}

pub fn unique_three_river(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        if c.is_black(a)
            && c.body(a) > c.avg(BODY_LONG, a)
            && c.is_black(b)
            && c.close[b] > c.close[a]
            && c.open[b] <= c.open[a]
            && c.low[b] < c.low[a]
            && c.body(i) < c.avg(BODY_SHORT, i)
            && c.is_white(i)
            && c.open[i] > c.low[b]
        {
            100
        } else {
            0
        }
    })
}

pub fn upside_gap_two_crows(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 2), |i| {
        let (a, b) = (i - 2, i - 1);
        if c.is_white(a)
            && c.body(a) > c.avg(BODY_LONG, a)
            && c.is_black(b)
            && c.body(b) <= c.avg(BODY_SHORT, b)
            && c.real_body_gap_up(b, a)
            && c.is_black(i)
            && c.open[i] > c.open[b]
            && c.close[i] < c.close[b]
            && c.close[i] > c.close[a]
        {
            -100
        } else {
            0
        }
    })
}

/// Two same-color candles with a gap, the third closing into the gap.
pub fn x_side_gap_three_methods(c: &Candles) -> Vec<i32> {
    c.scan(2, |i| {
        let (a, b) = (i - 2, i - 1);
        let gapped = (c.is_white(a) && c.real_body_gap_up(b, a)) || (c.is_black(a) && c.real_body_gap_down(b, a));
        if c.color(a) == c.color(b)
            && c.color(b) == -c.color(i)
            && c.open[i] < c.body_top(b)
            && c.open[i] > c.body_bottom(b)
            && c.close[i] < c.body_top(a)
            && c.close[i] > c.body_bottom(a)
            && gapped
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

    // ---- stars -----------------------------------------------------------

    #[test]
    fn morning_star_and_doji_variant() {
        let star = history(&[
            (105.0, 105.2, 100.8, 101.0),
            (100.0, 100.6, 99.7, 100.5),
            (101.0, 104.5, 100.9, 104.0),
        ]);
        assert_eq!(last(morning_star, &star), 100);
        assert_eq!(last(morning_doji_star, &star), 0);

        let doji = history(&[
            (105.0, 105.2, 100.8, 101.0),
            (100.45, 100.6, 99.9, 100.5),
            (101.0, 104.5, 100.9, 104.0),
        ]);
        assert_eq!(last(morning_doji_star, &doji), 100);
        assert_eq!(last(morning_star, &doji), 100);
    }

    #[test]
    fn evening_star_mirrors_morning() {
        let star = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (104.5, 105.2, 104.3, 104.9),
            (104.0, 104.1, 100.5, 101.0),
        ]);
        assert_eq!(last(evening_star, &star), -100);
        assert_eq!(last(morning_star, &star), 0);
    }

    #[test]
    fn abandoned_baby_needs_full_gaps() {
        let bottom = history(&[
            (105.0, 105.2, 100.8, 101.0),
            (100.0, 100.3, 99.8, 100.05),
            (101.0, 104.5, 100.9, 104.0),
        ]);
        assert_eq!(last(abandoned_baby, &bottom), 100);

        // doji overlapping the first candle's range: no baby
        let overlap = history(&[
            (105.0, 105.2, 100.8, 101.0),
            (100.9, 101.0, 100.5, 100.95),
            (101.2, 104.5, 101.1, 104.0),
        ]);
        assert_eq!(last(abandoned_baby, &overlap), 0);
    }

    // ---- soldiers and crows ----------------------------------------------

    #[test]
    fn three_white_soldiers_fire() {
        let cols = history(&[
            (100.0, 102.05, 99.9, 102.0),
            (101.5, 103.55, 101.4, 103.5),
            (103.0, 105.05, 102.9, 105.0),
        ]);
        assert_eq!(last(three_white_soldiers, &cols), 100);
    }

    #[test]
    fn identical_three_crows_fire() {
        let cols = history(&[
            (105.0, 105.1, 102.95, 103.0),
            (103.0, 103.1, 100.95, 101.0),
            (101.0, 101.1, 98.95, 99.0),
        ]);
        assert_eq!(last(identical_three_crows, &cols), -100);
    }

    #[test]
    fn three_outside_up() {
        let cols = history(&[(101.0, 101.2, 99.8, 100.0), (99.5, 102.0, 99.4, 101.5), (101.5, 103.0, 101.4, 102.5)]);
        assert_eq!(last(three_outside, &cols), 100);
    }

    #[test]
    fn three_inside_up() {
        let cols = history(&[(104.0, 104.2, 99.8, 100.0), (101.0, 102.0, 100.8, 101.5), (101.5, 105.0, 101.4, 104.5)]);
        assert_eq!(last(three_inside, &cols), 100);
    }

    #[test]
    fn two_crows_and_upside_gap() {
        let cols = history(&[(100.0, 104.2, 99.8, 104.0), (105.5, 106.0, 104.8, 105.0), (105.3, 105.4, 101.5, 102.0)]);
        assert_eq!(last(two_crows, &cols), -100);

        let ug = history(&[(100.0, 104.2, 99.8, 104.0), (105.5, 106.0, 104.8, 105.0), (105.8, 106.0, 104.3, 104.5)]);
        assert_eq!(last(upside_gap_two_crows, &ug), -100);
    }

    #[test]
    fn stick_sandwich_fires() {
        let cols = history(&[(103.0, 103.1, 99.9, 100.0), (100.5, 102.5, 100.2, 102.0), (103.0, 103.2, 99.95, 100.05)]);
        assert_eq!(last(stick_sandwich, &cols), 100);
    }

    #[test]
    fn tristar_bottom() {
        let cols = history(&[(100.0, 100.3, 99.7, 100.02), (98.0, 98.3, 97.7, 98.02), (99.0, 99.3, 98.7, 99.02)]);
        assert_eq!(last(tristar, &cols), 100);
    }

    #[test]
    fn evening_doji_star_needs_a_doji() {
        let doji = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (104.6, 105.2, 104.3, 104.7),
            (104.0, 104.1, 100.5, 101.0),
        ]);
        assert_eq!(last(evening_doji_star, &doji), -100);

        // star body 0.4 is short but not a doji
        let star = history(&[
            (100.0, 104.2, 99.8, 104.0),
            (104.5, 105.2, 104.3, 104.9),
            (104.0, 104.1, 100.5, 101.0),
        ]);
        assert_eq!(last(evening_doji_star, &star), 0);
        assert_eq!(last(evening_star, &star), -100);
    }

    #[test]
    fn three_stars_in_south_fires() {
        let cols = history(&[
            (104.0, 104.1, 99.5, 102.0),
            (103.0, 103.1, 100.5, 102.2),
            (101.5, 101.6, 101.1, 101.2),
        ]);
        assert_eq!(last(three_stars_in_south, &cols), 100);

        // third candle with a real lower shadow
        let shadowed = history(&[
            (104.0, 104.1, 99.5, 102.0),
            (103.0, 103.1, 100.5, 102.2),
            (101.5, 101.6, 100.6, 101.2),
        ]);
        assert_eq!(last(three_stars_in_south, &shadowed), 0);
    }

    #[test]
    fn advance_block_on_fading_third_candle() {
        let cols = history(&[
            (100.0, 103.2, 99.9, 103.0),
            (102.0, 105.0, 101.9, 104.5),
            (104.0, 106.5, 103.9, 105.0),
        ]);
        assert_eq!(last(advance_block, &cols), -100);

        // third body grows and closes near its high: no loss of momentum
        let strong = history(&[
            (100.0, 103.2, 99.9, 103.0),
            (102.0, 105.0, 101.9, 104.5),
            (104.0, 107.1, 103.9, 107.0),
        ]);
        assert_eq!(last(advance_block, &strong), 0);
    }

    #[test]
    fn gap_side_side_white_needs_matching_opens() {
        let cols = history(&[
            (100.0, 103.2, 99.9, 103.0),
            (103.5, 104.6, 103.4, 104.5),
            (103.55, 104.7, 103.4, 104.6),
        ]);
        assert_eq!(last(gap_side_side_white, &cols), 100);

        let apart = history(&[
            (100.0, 103.2, 99.9, 103.0),
            (103.5, 104.6, 103.4, 104.5),
            (104.2, 105.3, 104.1, 105.2),
        ]);
        assert_eq!(last(gap_side_side_white, &apart), 0);
    }

    #[test]
    fn stalled_pattern_needs_small_third_body() {
        let cols = history(&[
            (100.0, 103.1, 99.9, 103.0),
            (102.8, 105.6, 102.7, 105.5),
            (105.4, 105.8, 105.3, 105.7),
        ]);
        assert_eq!(last(stalled_pattern, &cols), -100);

        let long_third = history(&[
            (100.0, 103.1, 99.9, 103.0),
            (102.8, 105.6, 102.7, 105.5),
            (105.4, 107.6, 105.3, 107.5),
        ]);
        assert_eq!(last(stalled_pattern, &long_third), 0);
    }

    #[test]
    fn upside_tasuki_gap_leaves_gap_open() {
        let cols = history(&[
            (100.0, 102.1, 99.9, 102.0),
            (102.5, 104.1, 102.4, 104.0),
            (103.8, 103.9, 102.2, 102.3),
        ]);
        assert_eq!(last(tasuki_gap, &cols), 100);

        // third candle closes below the first body and fills the gap
        let filled = history(&[
            (100.0, 102.1, 99.9, 102.0),
            (102.5, 104.1, 102.4, 104.0),
            (103.8, 103.9, 101.7, 101.8),
        ]);
        assert_eq!(last(tasuki_gap, &filled), 0);
    }

    #[test]
    fn unique_three_river_needs_new_low() {
        let cols = history(&[
            (104.0, 104.1, 100.9, 101.0),
            (103.0, 103.1, 99.5, 101.5),
            (100.5, 101.0, 100.4, 100.8),
        ]);
        assert_eq!(last(unique_three_river, &cols), 100);

        let no_new_low = history(&[
            (104.0, 104.1, 100.9, 101.0),
            (103.0, 103.1, 101.2, 101.5),
            (100.5, 101.0, 100.4, 100.8),
        ]);
        assert_eq!(last(unique_three_river, &no_new_low), 0);
    }

    #[test]
    fn upside_gap_three_methods_closes_inside_first_body() {
        let cols = history(&[
            (100.0, 102.1, 99.9, 102.0),
            (102.5, 104.1, 102.4, 104.0),
            (103.5, 103.6, 100.9, 101.0),
        ]);
        assert_eq!(last(x_side_gap_three_methods, &cols), 100);

        let overshoot = history(&[
            (100.0, 102.1, 99.9, 102.0),
            (102.5, 104.1, 102.4, 104.0),
            (103.5, 103.6, 99.4, 99.5),
        ]);
        assert_eq!(last(x_side_gap_three_methods, &overshoot), 0);
    }

    // ---- hikkake ---------------------------------------------------------

    #[test]
    fn hikkake_breakout_then_confirmation() {
        let cols = history(&[
            (100.0, 103.0, 97.0, 101.0), // mother bar
            (100.5, 102.0, 98.0, 101.0), // inside bar
            (99.0, 101.5, 97.5, 98.0),   // false breakdown -> +100
            (98.5, 102.5, 98.2, 102.3),  // close above inside high -> +200
        ]);
        let out = run(hikkake, &cols);
        let n = out.len();
        assert_eq!(out[n - 2], 100);
        assert_eq!(out[n - 1], 200);
    }

    #[test]
    fn hikkake_confirmation_window_expires() {
        let cols = history(&[
            (100.0, 103.0, 97.0, 101.0),
            (100.5, 102.0, 98.0, 101.0),
            (99.0, 101.5, 97.5, 98.0),
            (98.0, 99.0, 97.6, 98.5),
            (98.0, 99.0, 97.6, 98.5),
            (98.0, 99.0, 97.6, 98.5),
            (98.5, 102.5, 98.2, 102.3),
        ]);
        let out = run(hikkake, &cols);
        assert_eq!(*out.last().unwrap(), 0);
    }

    #[test]
    fn deterministic_output() {
        let cols = history(&[(105.0, 105.2, 100.8, 101.0), (100.3, 100.6, 99.7, 100.5), (101.0, 104.5, 100.9, 104.0)]);
        assert_eq!(run(morning_star, &cols), run(morning_star, &cols));
    }
}
