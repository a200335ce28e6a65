// =============================================================================
// Two-bar candlestick patterns
// =============================================================================
//
// CDLCOUNTERATTACK, CDLDARKCLOUDCOVER, CDLDOJISTAR, CDLENGULFING, CDLHAMMER,
// CDLHANGINGMAN, CDLHARAMI, CDLHARAMICROSS, CDLHOMINGPIGEON, CDLINNECK,
// CDLINVERTEDHAMMER, CDLKICKING, CDLKICKINGBYLENGTH, CDLMATCHINGLOW,
// CDLONNECK, CDLPIERCING, CDLSEPARATINGLINES, CDLSHOOTINGSTAR, CDLTHRUSTING
//
// Bar `i - 1` is the setup candle, bar `i` the signal candle. Averages for the
// setup candle are taken at its own position.
// =============================================================================

use super::candle::{
    lookback, Candles, BODY_DOJI, BODY_LONG, BODY_SHORT, EQUAL, NEAR, SHADOW_LONG,
    SHADOW_VERY_SHORT,
};

const DARK_CLOUD_PENETRATION: f64 = 0.5;

fn within(value: f64, anchor: f64, tolerance: f64) -> bool {
    value <= anchor + tolerance && value >= anchor - tolerance
}

/// Two long candles of opposite color closing at the same level.
pub fn counterattack(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL, BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.color(p) == -c.color(i)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.body(i) > c.avg(BODY_LONG, i)
            && within(c.close[i], c.close[p], c.avg(EQUAL, p))
        {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Long white candle, then a black one opening above its high and closing
/// deep inside its body.
pub fn dark_cloud_cover(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_white(p)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.is_black(i)
            && c.open[i] > c.high[p]
            && c.close[i] > c.open[p]
            && c.close[i] < c.close[p] - c.body(p) * DARK_CLOUD_PENETRATION
        {
            -100
        } else {
            0
        }
    })
}

/// Long candle followed by a doji gapping away in the trend direction.
pub fn doji_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, BODY_LONG], 1), |i| {
        let p = i - 1;
        let gapped = (c.is_white(p) && c.real_body_gap_up(i, p))
            || (c.is_black(p) && c.real_body_gap_down(i, p));
        if c.body(p) > c.avg(BODY_LONG, p) && c.body(i) <= c.avg(BODY_DOJI, i) && gapped {
            -100 * c.color(p)
        } else {
            0
        }
    })
}

/// Second real body swallows the first. Scores 80 when one edge only
/// matches instead of strictly exceeding.
pub fn engulfing(c: &Candles) -> Vec<i32> {
    c.scan(2, |i| {
        let p = i - 1;
        let (o, cl, po, pc) = (c.open[i], c.close[i], c.open[p], c.close[p]);
        let bullish = c.is_white(i)
            && c.is_black(p)
            && ((cl >= po && o < pc) || (cl > po && o <= pc));
        let bearish = c.is_black(i)
            && c.is_white(p)
            && ((o >= pc && cl < po) || (o > pc && cl <= po));
        if !(bullish || bearish) {
            0
        } else if o != pc && cl != po {
            100 * c.color(i)
        } else {
            80 * c.color(i)
        }
    })
}

fn hammer_shape(c: &Candles, i: usize) -> bool {
    c.body(i) < c.avg(BODY_SHORT, i)
        && c.lower_shadow(i) > c.avg(SHADOW_LONG, i)
        && c.upper_shadow(i) < c.avg(SHADOW_VERY_SHORT, i)
}

/// Small body, long lower shadow, at or below the prior low.
pub fn hammer(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_LONG, SHADOW_VERY_SHORT, NEAR], 1), |i| {
        let p = i - 1;
        if hammer_shape(c, i) && c.body_bottom(i) <= c.low[p] + c.avg(NEAR, p) {
            100
        } else {
            0
        }
    })
}

/// Hammer shape printed at or above the prior high.
pub fn hanging_man(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_LONG, SHADOW_VERY_SHORT, NEAR], 1), |i| {
        let p = i - 1;
        if hammer_shape(c, i) && c.body_bottom(i) >= c.high[p] - c.avg(NEAR, p) {
            -100
        } else {
            0
        }
    })
}

fn harami_with(c: &Candles, i: usize, small_body: f64) -> i32 {
    let p = i - 1;
    if !(c.body(p) > c.avg(BODY_LONG, p) && c.body(i) <= small_body) {
        return 0;
    }
    if c.body_top(i) < c.body_top(p) && c.body_bottom(i) > c.body_bottom(p) {
        -100 * c.color(p)
    } else if c.body_top(i) <= c.body_top(p) && c.body_bottom(i) >= c.body_bottom(p) {
        -80 * c.color(p)
    } else {
        0
    }
}

/// Short body contained in the prior long body.
pub fn harami(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 1), |i| {
        harami_with(c, i, c.avg(BODY_SHORT, i))
    })
}

/// Doji contained in the prior long body.
pub fn harami_cross(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, BODY_LONG], 1), |i| {
        harami_with(c, i, c.avg(BODY_DOJI, i))
    })
}

/// Black harami: both candles black, the second inside the first.
pub fn homing_pigeon(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_black(p)
            && c.is_black(i)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.body(i) <= c.avg(BODY_SHORT, i)
            && c.open[i] < c.open[p]
            && c.close[i] > c.close[p]
        {
            100
        } else {
            0
        }
    })
}

/// White candle opening below the prior low and closing just into the prior
/// black body.
pub fn in_neck(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL, BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_black(p)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.is_white(i)
            && c.open[i] < c.low[p]
            && c.close[i] <= c.close[p] + c.avg(EQUAL, p)
            && c.close[i] >= c.close[p]
        {
            -100
        } else {
            0
        }
    })
}

fn inverted_hammer_shape(c: &Candles, i: usize) -> bool {
    c.body(i) < c.avg(BODY_SHORT, i)
        && c.upper_shadow(i) > c.avg(SHADOW_LONG, i)
        && c.lower_shadow(i) < c.avg(SHADOW_VERY_SHORT, i)
}

/// Small body with a long upper shadow, gapping down from the prior body.
pub fn inverted_hammer(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_LONG, SHADOW_VERY_SHORT], 1), |i| {
        if inverted_hammer_shape(c, i) && c.real_body_gap_down(i, i - 1) {
            100
        } else {
            0
        }
    })
}

fn marubozu_like(c: &Candles, i: usize) -> bool {
    let svs = c.avg(SHADOW_VERY_SHORT, i);
    c.body(i) > c.avg(BODY_LONG, i) && c.upper_shadow(i) < svs && c.lower_shadow(i) < svs
}

fn kicking_shape(c: &Candles, i: usize) -> bool {
    let p = i - 1;
    c.color(p) == -c.color(i)
        && marubozu_like(c, p)
        && marubozu_like(c, i)
        && ((c.is_black(p) && c.candle_gap_up(i, p)) || (c.is_white(p) && c.candle_gap_down(i, p)))
}

/// Two opposite marubozu separated by a full gap.
pub fn kicking(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, BODY_LONG], 1), |i| {
        if kicking_shape(c, i) {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Kicking, with direction taken from the longer of the two marubozu.
pub fn kicking_by_length(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, BODY_LONG], 1), |i| {
        if !kicking_shape(c, i) {
            return 0;
        }
        let longer = if c.body(i) > c.body(i - 1) { i } else { i - 1 };
        100 * c.color(longer)
    })
}

/// Two black candles closing at the same level.
pub fn matching_low(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL], 1), |i| {
        let p = i - 1;
        if c.is_black(p) && c.is_black(i) && within(c.close[i], c.close[p], c.avg(EQUAL, p)) {
            100
        } else {
            0
        }
    })
}

/// White candle opening below the prior low and closing at that low.
pub fn on_neck(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL, BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_black(p)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.is_white(i)
            && c.open[i] < c.low[p]
            && within(c.close[i], c.low[p], c.avg(EQUAL, p))
        {
            -100
        } else {
            0
        }
    })
}

/// Long black, then a long white opening below its low and closing above
/// its midpoint.
pub fn piercing(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_black(p)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.is_white(i)
            && c.body(i) > c.avg(BODY_LONG, i)
            && c.open[i] < c.low[p]
            && c.close[i] < c.open[p]
            && c.close[i] > c.close[p] + c.body(p) * 0.5
        {
            100
        } else {
            0
        }
    })
}

/// Opposite colors opening at the same price; the second is a belt hold.
pub fn separating_lines(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[SHADOW_VERY_SHORT, BODY_LONG, EQUAL], 1), |i| {
        let p = i - 1;
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        let belt = (c.is_white(i) && c.lower_shadow(i) < svs) || (c.is_black(i) && c.upper_shadow(i) < svs);
        if c.color(p) == -c.color(i)
            && within(c.open[i], c.open[p], c.avg(EQUAL, p))
            && c.body(i) > c.avg(BODY_LONG, i)
            && belt
        {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Inverted-hammer shape gapping up from the prior body.
pub fn shooting_star(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_LONG, SHADOW_VERY_SHORT], 1), |i| {
        if inverted_hammer_shape(c, i) && c.real_body_gap_up(i, i - 1) {
            -100
        } else {
            0
        }
    })
}

/// Like in-neck, but the white close pushes further without reaching the
/// midpoint of the black body.
pub fn thrusting(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[EQUAL, BODY_LONG], 1), |i| {
        let p = i - 1;
        if c.is_black(p)
            && c.body(p) > c.avg(BODY_LONG, p)
            && c.is_white(i)
            && c.open[i] < c.low[p]
            && c.close[i] > c.close[p] + c.avg(EQUAL, p)
            && c.close[i] <= c.close[p] + c.body(p) * 0.5
        {
            -100
        } else {
            0
        }
    })
}
