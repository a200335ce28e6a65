// =============================================================================
// Candle geometry and TA-Lib candle settings
// =============================================================================
//
// Every detector classifies bodies and shadows *relative to recent history*:
// "long body" means longer than the average body of the preceding ten bars,
// "near" means within a fraction of the average high-low range of the
// preceding five bars, and so on. The averages are governed by a small table
// of settings (range type, averaging period, factor) with TA-Lib's defaults.
//
//   avg(S, i) = factor * mean(range_S(j) for j in [i - period, i))
//             = factor * range_S(i)                 when period == 0
//   Shadows-type averages are additionally halved.
// =============================================================================

/// Which measurement a candle setting averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeType {
    RealBody,
    HighLow,
    /// Sum of upper and lower shadow.
    Shadows,
}

#[derive(Debug, Clone, Copy)]
pub struct CandleSetting {
    pub range_type: RangeType,
    pub avg_period: usize,
    pub factor: f64,
}

const fn setting(range_type: RangeType, avg_period: usize, factor: f64) -> CandleSetting {
    CandleSetting {
        range_type,
        avg_period,
        factor,
    }
}

pub const BODY_LONG: CandleSetting = setting(RangeType::RealBody, 10, 1.0);
pub const BODY_SHORT: CandleSetting = setting(RangeType::RealBody, 10, 1.0);
pub const BODY_DOJI: CandleSetting = setting(RangeType::HighLow, 10, 0.1);
pub const SHADOW_LONG: CandleSetting = setting(RangeType::RealBody, 0, 1.0);
pub const SHADOW_VERY_LONG: CandleSetting = setting(RangeType::RealBody, 0, 2.0);
pub const SHADOW_SHORT: CandleSetting = setting(RangeType::Shadows, 10, 1.0);
pub const SHADOW_VERY_SHORT: CandleSetting = setting(RangeType::HighLow, 10, 0.1);
pub const NEAR: CandleSetting = setting(RangeType::HighLow, 5, 0.2);
pub const FAR: CandleSetting = setting(RangeType::HighLow, 5, 0.6);
pub const EQUAL: CandleSetting = setting(RangeType::HighLow, 5, 0.05);

/// Index of the first bar a detector may score: the longest averaging period
/// among its settings plus the bars the shape spans beyond the current one.
pub fn lookback(settings: &[CandleSetting], extra_bars: usize) -> usize {
    settings.iter().map(|s| s.avg_period).max().unwrap_or(0) + extra_bars
}

// -----------------------------------------------------------------------------
// Candles -- borrowed OHLC columns with per-bar geometry
// -----------------------------------------------------------------------------

/// Aligned OHLC columns. All slices have the same length.
#[derive(Debug, Clone, Copy)]
pub struct Candles<'a> {
    pub open: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
}

impl<'a> Candles<'a> {
    pub fn new(open: &'a [f64], high: &'a [f64], low: &'a [f64], close: &'a [f64]) -> Self {
        debug_assert!(open.len() == high.len() && high.len() == low.len() && low.len() == close.len());
        Self {
            open,
            high,
            low,
            close,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn body(&self, i: usize) -> f64 {
        (self.close[i] - self.open[i]).abs()
    }

    pub fn hl_range(&self, i: usize) -> f64 {
        self.high[i] - self.low[i]
    }

    pub fn upper_shadow(&self, i: usize) -> f64 {
        self.high[i] - self.body_top(i)
    }

    pub fn lower_shadow(&self, i: usize) -> f64 {
        self.body_bottom(i) - self.low[i]
    }

    pub fn body_top(&self, i: usize) -> f64 {
        self.open[i].max(self.close[i])
    }

    pub fn body_bottom(&self, i: usize) -> f64 {
        self.open[i].min(self.close[i])
    }

    /// +1 for a white (close >= open) candle, -1 for a black one.
    pub fn color(&self, i: usize) -> i32 {
        if self.close[i] >= self.open[i] {
            1
        } else {
            -1
        }
    }

    pub fn is_white(&self, i: usize) -> bool {
        self.color(i) == 1
    }

    pub fn is_black(&self, i: usize) -> bool {
        self.color(i) == -1
    }

    fn range_of(&self, range_type: RangeType, i: usize) -> f64 {
        match range_type {
            RangeType::RealBody => self.body(i),
            RangeType::HighLow => self.hl_range(i),
            RangeType::Shadows => self.upper_shadow(i) + self.lower_shadow(i),
        }
    }

    /// The setting's reference value for bar `i` (see module header).
    pub fn avg(&self, s: CandleSetting, i: usize) -> f64 {
        let base = if s.avg_period == 0 {
            self.range_of(s.range_type, i)
        } else {
            let start = i.saturating_sub(s.avg_period);
            let sum: f64 = (start..i).map(|j| self.range_of(s.range_type, j)).sum();
            sum / s.avg_period as f64
        };
        let scaled = s.factor * base;
        if s.range_type == RangeType::Shadows {
            scaled / 2.0
        } else {
            scaled
        }
    }

    /// Real body of `a` entirely above the real body of `b`.
    pub fn real_body_gap_up(&self, a: usize, b: usize) -> bool {
        self.body_bottom(a) > self.body_top(b)
    }

    /// Real body of `a` entirely below the real body of `b`.
    pub fn real_body_gap_down(&self, a: usize, b: usize) -> bool {
        self.body_top(a) < self.body_bottom(b)
    }

    /// Whole candle `a` above candle `b` (low over high).
    pub fn candle_gap_up(&self, a: usize, b: usize) -> bool {
        self.low[a] > self.high[b]
    }

    pub fn candle_gap_down(&self, a: usize, b: usize) -> bool {
        self.high[a] < self.low[b]
    }

    /// Run `score` for every bar from `first` on; earlier bars stay 0.
    pub fn scan(&self, first: usize, mut score: impl FnMut(usize) -> i32) -> Vec<i32> {
        let mut out = vec![0; self.len()];
        for (i, slot) in out.iter_mut().enumerate().skip(first) {
            *slot = score(i);
        }
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_of_a_white_candle() {
        let (o, h, l, c) = ([10.0], [13.0], [9.0], [12.0]);
        let k = Candles::new(&o, &h, &l, &c);
        assert_eq!(k.body(0), 2.0);
        assert_eq!(k.upper_shadow(0), 1.0);
        assert_eq!(k.lower_shadow(0), 1.0);
        assert_eq!(k.hl_range(0), 4.0);
        assert_eq!(k.color(0), 1);
    }

    #[test]
    fn doji_with_equal_open_close_counts_as_white() {
        let (o, h, l, c) = ([10.0], [11.0], [9.0], [10.0]);
        let k = Candles::new(&o, &h, &l, &c);
        assert!(k.is_white(0));
        assert_eq!(k.body(0), 0.0);
    }

    #[test]
    fn trailing_average_excludes_current_bar() {
        let open = [0.0; 12];
        let close: Vec<f64> = (0..12).map(|i| if i < 10 { 1.0 } else { 50.0 }).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low = [-1.0; 12];
        let k = Candles::new(&open, &high, &low, &close);
        // bars 0..10 all have body 1
        assert!((k.avg(BODY_LONG, 10) - 1.0).abs() < 1e-12);
        assert!((k.avg(setting(RangeType::RealBody, 10, 3.0), 10) - 3.0).abs() < 1e-12);
        // period 0 settings use the bar itself
        assert!((k.avg(SHADOW_VERY_LONG, 11) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn shadows_average_is_halved() {
        let open = [10.0; 11];
        let close = [10.0; 11];
        let high = [12.0; 11];
        let low = [8.0; 11];
        let k = Candles::new(&open, &high, &low, &close);
        // shadows sum = 4 per bar, halved
        assert!((k.avg(SHADOW_SHORT, 10) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn gaps() {
        let open = [10.0, 12.5];
        let close = [12.0, 13.0];
        let high = [12.6, 13.5];
        let low = [9.5, 12.4];
        let k = Candles::new(&open, &high, &low, &close);
        assert!(k.real_body_gap_up(1, 0));
        assert!(!k.candle_gap_up(1, 0));
        assert!(k.real_body_gap_down(0, 1));
    }

    #[test]
    fn lookback_takes_longest_period() {
        assert_eq!(lookback(&[NEAR, BODY_LONG], 2), 12);
        assert_eq!(lookback(&[SHADOW_LONG], 0), 0);
        assert_eq!(lookback(&[], 3), 3);
    }

    #[test]
    fn scan_leaves_prefix_zero() {
        let v = [1.0; 5];
        let k = Candles::new(&v, &v, &v, &v);
        assert_eq!(k.scan(3, |_| 100), vec![0, 0, 0, 100, 100]);
        assert_eq!(k.scan(9, |_| 100), vec![0; 5]);
    }
}
