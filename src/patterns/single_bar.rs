// =============================================================================
// Single-bar candlestick patterns
// =============================================================================
//
// CDLBELTHOLD, CDLCLOSINGMARUBOZU, CDLDOJI, CDLDRAGONFLYDOJI, CDLGRAVESTONEDOJI,
// CDLHIGHWAVE, CDLLONGLEGGEDDOJI, CDLLONGLINE, CDLMARUBOZU, CDLRICKSHAWMAN,
// CDLSHORTLINE, CDLSPINNINGTOP, CDLTAKURI
//
// Each detector looks at bar `i` alone against the trailing candle averages.
// Directional shapes report the candle color (+100 white / -100 black).
// =============================================================================

use super::candle::{
    lookback, Candles, BODY_DOJI, BODY_LONG, BODY_SHORT, NEAR, SHADOW_LONG, SHADOW_SHORT,
    SHADOW_VERY_LONG, SHADOW_VERY_SHORT,
};

/// Long body with no shadow on the opening side.
pub fn belt_hold(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG, SHADOW_VERY_SHORT], 0), |i| {
        let long = c.body(i) > c.avg(BODY_LONG, i);
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        let opening_shadow = if c.is_white(i) {
            c.lower_shadow(i)
        } else {
            c.upper_shadow(i)
        };
        if long && opening_shadow < svs {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Long body with no shadow on the closing side.
pub fn closing_marubozu(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG, SHADOW_VERY_SHORT], 0), |i| {
        let long = c.body(i) > c.avg(BODY_LONG, i);
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        let closing_shadow = if c.is_white(i) {
            c.upper_shadow(i)
        } else {
            c.lower_shadow(i)
        };
        if long && closing_shadow < svs {
            100 * c.color(i)
        } else {
            0
        }
    })
}

pub fn doji(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI], 0), |i| {
        if c.body(i) <= c.avg(BODY_DOJI, i) {
            100
        } else {
            0
        }
    })
}

/// Doji with a long lower shadow and no upper shadow.
pub fn dragonfly_doji(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, SHADOW_VERY_SHORT], 0), |i| {
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        if c.body(i) <= c.avg(BODY_DOJI, i) && c.upper_shadow(i) < svs && c.lower_shadow(i) > svs {
            100
        } else {
            0
        }
    })
}

/// Doji with a long upper shadow and no lower shadow.
pub fn gravestone_doji(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, SHADOW_VERY_SHORT], 0), |i| {
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        if c.body(i) <= c.avg(BODY_DOJI, i) && c.lower_shadow(i) < svs && c.upper_shadow(i) > svs {
            100
        } else {
            0
        }
    })
}

/// Short body with very long shadows on both sides.
pub fn high_wave(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_VERY_LONG], 0), |i| {
        let svl = c.avg(SHADOW_VERY_LONG, i);
        if c.body(i) < c.avg(BODY_SHORT, i) && c.upper_shadow(i) > svl && c.lower_shadow(i) > svl {
            100 * c.color(i)
        } else {
            0
        }
    })
}

pub fn long_legged_doji(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, SHADOW_LONG], 0), |i| {
        let sl = c.avg(SHADOW_LONG, i);
        if c.body(i) <= c.avg(BODY_DOJI, i) && (c.lower_shadow(i) > sl || c.upper_shadow(i) > sl) {
            100
        } else {
            0
        }
    })
}

pub fn long_line(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG, SHADOW_SHORT], 0), |i| {
        let ss = c.avg(SHADOW_SHORT, i);
        if c.body(i) > c.avg(BODY_LONG, i) && c.upper_shadow(i) < ss && c.lower_shadow(i) < ss {
            100 * c.color(i)
        } else {
            0
        }
    })
}

pub fn marubozu(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_LONG, SHADOW_VERY_SHORT], 0), |i| {
        let svs = c.avg(SHADOW_VERY_SHORT, i);
        if c.body(i) > c.avg(BODY_LONG, i) && c.upper_shadow(i) < svs && c.lower_shadow(i) < svs {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Long-legged doji whose body sits near the middle of the range.
pub fn rickshaw_man(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, SHADOW_LONG, NEAR], 0), |i| {
        let sl = c.avg(SHADOW_LONG, i);
        let near = c.avg(NEAR, i);
        let mid = c.low[i] + c.hl_range(i) / 2.0;
        let doji = c.body(i) <= c.avg(BODY_DOJI, i);
        let legs = c.lower_shadow(i) > sl && c.upper_shadow(i) > sl;
        let centred = c.body_bottom(i) <= mid + near && c.body_top(i) >= mid - near;
        if doji && legs && centred {
            100
        } else {
            0
        }
    })
}

pub fn short_line(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT, SHADOW_SHORT], 0), |i| {
        let ss = c.avg(SHADOW_SHORT, i);
        if c.body(i) < c.avg(BODY_SHORT, i) && c.upper_shadow(i) < ss && c.lower_shadow(i) < ss {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Short body with shadows longer than the body.
pub fn spinning_top(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_SHORT], 0), |i| {
        let body = c.body(i);
        if body < c.avg(BODY_SHORT, i) && c.upper_shadow(i) > body && c.lower_shadow(i) > body {
            100 * c.color(i)
        } else {
            0
        }
    })
}

/// Dragonfly doji with a very long lower shadow.
pub fn takuri(c: &Candles) -> Vec<i32> {
    c.scan(lookback(&[BODY_DOJI, SHADOW_VERY_SHORT, SHADOW_VERY_LONG], 0), |i| {
        let doji = c.body(i) <= c.avg(BODY_DOJI, i);
        if doji
            && c.upper_shadow(i) < c.avg(SHADOW_VERY_SHORT, i)
            && c.lower_shadow(i) > c.avg(SHADOW_VERY_LONG, i)
        {
            100
        } else {
            0
        }
    })
}
