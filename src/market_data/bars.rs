use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Absent when the provider does not report volume for the instrument.
    pub volume: Option<f64>,
}

impl PriceBar {
    fn has_complete_ohlc(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

// ---------------------------------------------------------------------------
// BarSeries -- validated, date-ordered history for one ticker
// ---------------------------------------------------------------------------

/// A validated daily price history.
///
/// Construction guarantees the series is non-empty, strictly ordered by date
/// and that every bar carries finite OHLC values. Downstream stages rely on
/// this and never re-check.
#[derive(Debug, Clone)]
pub struct BarSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl BarSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, DataError> {
        let ticker = ticker.into();
        if bars.is_empty() {
            return Err(DataError::NoData { ticker });
        }
        if let Some(bad) = bars.iter().find(|b| !b.has_complete_ohlc()) {
            return Err(DataError::NonNumeric {
                ticker,
                date: bad.date,
            });
        }
        if bars.windows(2).any(|w| w[1].date <= w[0].date) {
            return Err(DataError::Unsorted { ticker });
        }
        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volume column, or `None` when no bar reports a volume at all.
    /// Individual gaps come through as NaN.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        if self.bars.iter().all(|b| b.volume.is_none()) {
            return None;
        }
        Some(
            self.bars
                .iter()
                .map(|b| b.volume.unwrap_or(f64::NAN))
                .collect(),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(10.0),
        }
    }

    #[test]
    fn rejects_empty_history() {
        assert!(matches!(
            BarSeries::new("AAPL", vec![]),
            Err(DataError::NoData { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_ohlc() {
        let mut b = bar(2, 10.0);
        b.low = f64::NAN;
        let err = BarSeries::new("AAPL", vec![bar(1, 10.0), b]).unwrap_err();
        assert!(matches!(err, DataError::NonNumeric { .. }));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = BarSeries::new("AAPL", vec![bar(2, 10.0), bar(1, 11.0)]).unwrap_err();
        assert!(matches!(err, DataError::Unsorted { .. }));
    }

    #[test]
    fn partial_volume_keeps_column_with_gaps() {
        let mut b = bar(2, 10.0);
        b.volume = None;
        let series = BarSeries::new("AAPL", vec![bar(1, 10.0), b]).unwrap();
        let volume = series.volumes().unwrap();
        assert_eq!(volume[0], 10.0);
        assert!(volume[1].is_nan());

        let series = BarSeries::new("AAPL", vec![bar(1, 10.0), bar(2, 12.0)]).unwrap();
        assert_eq!(series.volumes().unwrap(), vec![10.0, 10.0]);
        assert_eq!(series.closes(), vec![10.0, 12.0]);
    }

    #[test]
    fn no_volume_anywhere_means_no_column() {
        let mut a = bar(1, 10.0);
        let mut b = bar(2, 11.0);
        a.volume = None;
        b.volume = None;
        let series = BarSeries::new("AAPL", vec![a, b]).unwrap();
        assert!(series.volumes().is_none());
    }
}
