// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator catalog offered by
// the analysis form. Every function returns a series with exactly one value
// per input bar; slots inside an indicator's warm-up window are NaN, so every
// output lines up with the bar dates without re-indexing.

pub mod adx;
pub mod aroon;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod moving_average;
pub mod oscillators;
pub mod price_transform;
pub mod roc;
pub mod rsi;
pub mod sar;
pub mod stochastic;
pub mod volume;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::BarSeries;

// ---------------------------------------------------------------------------
// Series helpers shared by the indicator files
// ---------------------------------------------------------------------------

/// A series of `n` undefined values.
pub(crate) fn nan_series(n: usize) -> Vec<f64> {
    vec![f64::NAN; n]
}

/// Run `f` over the part of `values` after its leading NaN run and pad the
/// result back to full length. Lets one indicator consume another's output.
pub(crate) fn on_defined_tail(values: &[f64], f: impl FnOnce(&[f64]) -> Vec<f64>) -> Vec<f64> {
    let start = values.iter().position(|v| !v.is_nan()).unwrap_or(values.len());
    let mut out = nan_series(start);
    out.extend(f(&values[start..]));
    out
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog section an indicator is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorGroup {
    Overlap,
    Momentum,
    Volume,
    Volatility,
    PriceTransform,
}

/// One selectable indicator. Parameters are fixed per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndicatorId {
    // Overlap studies
    Ma,
    Sma,
    Ema,
    Wma,
    Dema,
    Tema,
    Trima,
    Kama,
    Bbands,
    Sar,
    Midpoint,
    Midprice,
    // Momentum
    Rsi,
    Stoch,
    Stochf,
    StochRsi,
    Macd,
    Trix,
    Willr,
    Adx,
    Adxr,
    Apo,
    Aroon,
    AroonOsc,
    Cci,
    Cmo,
    Mfi,
    Mom,
    Ppo,
    Roc,
    UltOsc,
    // Volume
    Ad,
    AdOsc,
    Obv,
    // Volatility
    TRange,
    Atr,
    Natr,
    // Price transform
    AvgPrice,
    MedPrice,
    TypPrice,
    WclPrice,
}

impl IndicatorId {
    /// Catalog order; also the column order of every indicator table.
    pub const ALL: [IndicatorId; 41] = [
        Self::Ma,
        Self::Sma,
        Self::Ema,
        Self::Wma,
        Self::Dema,
        Self::Tema,
        Self::Trima,
        Self::Kama,
        Self::Bbands,
        Self::Sar,
        Self::Midpoint,
        Self::Midprice,
        Self::Rsi,
        Self::Stoch,
        Self::Stochf,
        Self::StochRsi,
        Self::Macd,
        Self::Trix,
        Self::Willr,
        Self::Adx,
        Self::Adxr,
        Self::Apo,
        Self::Aroon,
        Self::AroonOsc,
        Self::Cci,
        Self::Cmo,
        Self::Mfi,
        Self::Mom,
        Self::Ppo,
        Self::Roc,
        Self::UltOsc,
        Self::Ad,
        Self::AdOsc,
        Self::Obv,
        Self::TRange,
        Self::Atr,
        Self::Natr,
        Self::AvgPrice,
        Self::MedPrice,
        Self::TypPrice,
        Self::WclPrice,
    ];

    /// Selection used when a request names no indicators.
    pub const DEFAULTS: [IndicatorId; 3] = [Self::Macd, Self::Rsi, Self::Bbands];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ma => "MA",
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Wma => "WMA",
            Self::Dema => "DEMA",
            Self::Tema => "TEMA",
            Self::Trima => "TRIMA",
            Self::Kama => "KAMA",
            Self::Bbands => "BBANDS",
            Self::Sar => "SAR",
            Self::Midpoint => "MIDPOINT",
            Self::Midprice => "MIDPRICE",
            Self::Rsi => "RSI",
            Self::Stoch => "STOCH",
            Self::Stochf => "STOCHF",
            Self::StochRsi => "STOCHRSI",
            Self::Macd => "MACD",
            Self::Trix => "TRIX",
            Self::Willr => "WILLR",
            Self::Adx => "ADX",
            Self::Adxr => "ADXR",
            Self::Apo => "APO",
            Self::Aroon => "AROON",
            Self::AroonOsc => "AROONOSC",
            Self::Cci => "CCI",
            Self::Cmo => "CMO",
            Self::Mfi => "MFI",
            Self::Mom => "MOM",
            Self::Ppo => "PPO",
            Self::Roc => "ROC",
            Self::UltOsc => "ULTOSC",
            Self::Ad => "AD",
            Self::AdOsc => "ADOSC",
            Self::Obv => "OBV",
            Self::TRange => "TRANGE",
            Self::Atr => "ATR",
            Self::Natr => "NATR",
            Self::AvgPrice => "AVGPRICE",
            Self::MedPrice => "MEDPRICE",
            Self::TypPrice => "TYPPRICE",
            Self::WclPrice => "WCLPRICE",
        }
    }

    pub fn group(self) -> IndicatorGroup {
        use IndicatorId::*;
        match self {
            Ma | Sma | Ema | Wma | Dema | Tema | Trima | Kama | Bbands | Sar | Midpoint
            | Midprice => IndicatorGroup::Overlap,
            Ad | AdOsc | Obv => IndicatorGroup::Volume,
            TRange | Atr | Natr => IndicatorGroup::Volatility,
            AvgPrice | MedPrice | TypPrice | WclPrice => IndicatorGroup::PriceTransform,
            _ => IndicatorGroup::Momentum,
        }
    }

    /// Output column names, in the order `compute` returns the series.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Ma => &["MA"],
            Self::Sma => &["SMA_30"],
            Self::Ema => &["EMA_30"],
            Self::Wma => &["WMA_30"],
            Self::Dema => &["DEMA_30"],
            Self::Tema => &["TEMA_30"],
            Self::Trima => &["TRIMA_30"],
            Self::Kama => &["KAMA_30"],
            Self::Bbands => &["BBANDS_Upper", "BBANDS_Middle", "BBANDS_Lower"],
            Self::Rsi => &["RSI_14"],
            Self::Stoch => &["STOCH_%K", "STOCH_%D"],
            Self::Stochf => &["STOCHF_%K", "STOCHF_%D"],
            Self::StochRsi => &["STOCHRSI_%K", "STOCHRSI_%D"],
            Self::Macd => &["MACD", "MACD_Signal", "MACD_Hist"],
            Self::Aroon => &["AROON_Up", "AROON_Down"],
            Self::Sar => &["SAR"],
            Self::Midpoint => &["MIDPOINT"],
            Self::Midprice => &["MIDPRICE"],
            Self::Trix => &["TRIX"],
            Self::Willr => &["WILLR"],
            Self::Adx => &["ADX"],
            Self::Adxr => &["ADXR"],
            Self::Apo => &["APO"],
            Self::AroonOsc => &["AROONOSC"],
            Self::Cci => &["CCI"],
            Self::Cmo => &["CMO"],
            Self::Mfi => &["MFI"],
            Self::Mom => &["MOM"],
            Self::Ppo => &["PPO"],
            Self::Roc => &["ROC"],
            Self::UltOsc => &["ULTOSC"],
            Self::Ad => &["AD"],
            Self::AdOsc => &["ADOSC"],
            Self::Obv => &["OBV"],
            Self::TRange => &["TRANGE"],
            Self::Atr => &["ATR"],
            Self::Natr => &["NATR"],
            Self::AvgPrice => &["AVGPRICE"],
            Self::MedPrice => &["MEDPRICE"],
            Self::TypPrice => &["TYPPRICE"],
            Self::WclPrice => &["WCLPRICE"],
        }
    }

    pub fn needs_volume(self) -> bool {
        matches!(self, Self::Mfi | Self::Ad | Self::AdOsc | Self::Obv)
    }

    /// Evaluate with the catalog parameters. `None` when the indicator needs
    /// volume and the columns carry none.
    fn compute(self, p: &PriceColumns) -> Option<Vec<Vec<f64>>> {
        let (o, h, l, c) = (&p.open[..], &p.high[..], &p.low[..], &p.close[..]);
        let out = match self {
            Self::Ma => vec![moving_average::sma(c, 30)],
            Self::Sma => vec![moving_average::sma(c, 30)],
            Self::Ema => vec![ema::ema(c, 30)],
            Self::Wma => vec![moving_average::wma(c, 30)],
            Self::Dema => vec![ema::dema(c, 30)],
            Self::Tema => vec![ema::tema(c, 30)],
            Self::Trima => vec![moving_average::trima(c, 30)],
            Self::Kama => vec![moving_average::kama(c, 30)],
            Self::Bbands => {
                let b = bollinger::bbands(c, 20, 2.0);
                vec![b.upper, b.middle, b.lower]
            }
            Self::Sar => vec![sar::sar(h, l, 0.02, 0.2)],
            Self::Midpoint => vec![moving_average::midpoint(c, 14)],
            Self::Midprice => vec![moving_average::midprice(h, l, 14)],
            Self::Rsi => vec![rsi::rsi(c, 14)],
            Self::Stoch => {
                let (k, d) = stochastic::stoch(h, l, c, 5, 3, 3);
                vec![k, d]
            }
            Self::Stochf => {
                let (k, d) = stochastic::stochf(h, l, c, 5, 3);
                vec![k, d]
            }
            Self::StochRsi => {
                let (k, d) = rsi::stochrsi(c, 14, 5, 3);
                vec![k, d]
            }
            Self::Macd => {
                let m = macd::macd(c, 12, 26, 9);
                vec![m.macd, m.signal, m.hist]
            }
            Self::Trix => vec![ema::trix(c, 30)],
            Self::Willr => vec![stochastic::willr(h, l, c, 14)],
            Self::Adx => vec![adx::adx(h, l, c, 14)],
            Self::Adxr => vec![adx::adxr(h, l, c, 14)],
            Self::Apo => vec![macd::apo(c, 12, 26)],
            Self::Aroon => {
                let (up, down) = aroon::aroon(h, l, 14);
                vec![up, down]
            }
            Self::AroonOsc => vec![aroon::aroon_osc(h, l, 14)],
            Self::Cci => vec![oscillators::cci(h, l, c, 14)],
            Self::Cmo => vec![rsi::cmo(c, 14)],
            Self::Mfi => vec![oscillators::mfi(h, l, c, p.volume.as_deref()?, 14)],
            Self::Mom => vec![roc::mom(c, 10)],
            Self::Ppo => vec![macd::ppo(c, 12, 26)],
            Self::Roc => vec![roc::roc(c, 10)],
            Self::UltOsc => vec![oscillators::ultosc(h, l, c, [7, 14, 28])],
            Self::Ad => vec![volume::ad(h, l, c, p.volume.as_deref()?)],
            Self::AdOsc => vec![volume::adosc(h, l, c, p.volume.as_deref()?, 3, 10)],
            Self::Obv => vec![volume::obv(c, p.volume.as_deref()?)],
            Self::TRange => vec![atr::trange(h, l, c)],
            Self::Atr => vec![atr::atr(h, l, c, 14)],
            Self::Natr => vec![atr::natr(h, l, c, 14)],
            Self::AvgPrice => vec![price_transform::avg_price(o, h, l, c)],
            Self::MedPrice => vec![price_transform::med_price(h, l)],
            Self::TypPrice => vec![price_transform::typ_price(h, l, c)],
            Self::WclPrice => vec![price_transform::wcl_price(h, l, c)],
        };
        Some(out)
    }
}

impl std::fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for IndicatorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        IndicatorId::ALL
            .into_iter()
            .find(|id| id.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown indicator: '{wanted}'."))
    }
}

impl TryFrom<String> for IndicatorId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndicatorId> for String {
    fn from(value: IndicatorId) -> Self {
        value.code().to_string()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Column views of a bar series, extracted once per request.
struct PriceColumns {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
}

impl PriceColumns {
    fn from_series(series: &BarSeries) -> Self {
        Self {
            open: series.opens(),
            high: series.highs(),
            low: series.lows(),
            close: series.closes(),
            volume: series.volumes(),
        }
    }
}

/// Named indicator outputs aligned to a bar series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    columns: Vec<(&'static str, Vec<f64>)>,
}

impl IndicatorTable {
    pub fn columns(&self) -> &[(&'static str, Vec<f64>)] {
        &self.columns
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(n, _)| *n).collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Evaluate the selected indicators over `series`.
///
/// Duplicates collapse and columns come out in catalog order whatever order
/// the selection used. Volume indicators are skipped when the series has no
/// volume.
pub fn compute_selected(series: &BarSeries, selected: &[IndicatorId]) -> IndicatorTable {
    let inputs = PriceColumns::from_series(series);
    let mut columns = Vec::new();

    for id in IndicatorId::ALL.into_iter().filter(|id| selected.contains(id)) {
        match id.compute(&inputs) {
            Some(outputs) => columns.extend(id.columns().iter().copied().zip(outputs)),
            None => debug!(ticker = series.ticker(), indicator = id.code(), "no volume, indicator skipped"),
        }
    }

    debug!(
        ticker = series.ticker(),
        bars = series.len(),
        columns = columns.len(),
        "indicators computed"
    );
    IndicatorTable { columns }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::bars::test_support::wavy_series;
    use crate::market_data::{BarSeries, PriceBar};

    fn without_volume(series: &BarSeries) -> BarSeries {
        let bars: Vec<PriceBar> = series
            .bars()
            .iter()
            .cloned()
            .map(|mut b| {
                b.volume = None;
                b
            })
            .collect();
        BarSeries::new(series.ticker(), bars).unwrap()
    }

    // ---- catalog -----------------------------------------------------------

    #[test]
    fn catalog_codes_are_unique_and_parse() {
        let mut codes: Vec<&str> = IndicatorId::ALL.iter().map(|i| i.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), IndicatorId::ALL.len());
        for id in IndicatorId::ALL {
            assert_eq!(id.code().parse::<IndicatorId>().unwrap(), id);
        }
        assert_eq!("macd".parse::<IndicatorId>().unwrap(), IndicatorId::Macd);
        assert!("VWAP".parse::<IndicatorId>().is_err());
    }

    #[test]
    fn groups_cover_the_catalog() {
        let count = |g| IndicatorId::ALL.iter().filter(|i| i.group() == g).count();
        assert_eq!(count(IndicatorGroup::Overlap), 12);
        assert_eq!(count(IndicatorGroup::Momentum), 19);
        assert_eq!(count(IndicatorGroup::Volume), 3);
        assert_eq!(count(IndicatorGroup::Volatility), 3);
        assert_eq!(count(IndicatorGroup::PriceTransform), 4);
    }

    #[test]
    fn serde_uses_code() {
        let id: IndicatorId = serde_json::from_str("\"BBANDS\"").unwrap();
        assert_eq!(id, IndicatorId::Bbands);
        assert_eq!(serde_json::to_string(&IndicatorId::UltOsc).unwrap(), "\"ULTOSC\"");
    }

    // ---- compute_selected --------------------------------------------------

    #[test]
    fn multi_output_indicators_expand() {
        let series = wavy_series(80);
        let table = compute_selected(&series, &[IndicatorId::Macd]);
        assert_eq!(table.names(), vec!["MACD", "MACD_Signal", "MACD_Hist"]);
    }

    #[test]
    fn every_indicator_is_full_length() {
        let series = wavy_series(120);
        let table = compute_selected(&series, &IndicatorId::ALL);
        let expected: usize = IndicatorId::ALL.iter().map(|i| i.columns().len()).sum();
        assert_eq!(table.columns().len(), expected);
        for (name, values) in table.columns() {
            assert_eq!(values.len(), 120, "{name}");
            assert!(values.iter().any(|v| v.is_finite()), "{name} never defined");
        }
    }

    #[test]
    fn selection_order_and_duplicates_do_not_matter() {
        let series = wavy_series(60);
        let table = compute_selected(
            &series,
            &[IndicatorId::Rsi, IndicatorId::Sma, IndicatorId::Rsi],
        );
        assert_eq!(table.names(), vec!["SMA_30", "RSI_14"]);
    }

    #[test]
    fn volume_indicators_skipped_without_volume() {
        let series = without_volume(&wavy_series(60));
        let table = compute_selected(
            &series,
            &[IndicatorId::Obv, IndicatorId::Mfi, IndicatorId::Atr],
        );
        assert_eq!(table.names(), vec!["ATR"]);
    }

    #[test]
    fn one_missing_volume_keeps_volume_indicators() {
        let full = wavy_series(40);
        let mut bars = full.bars().to_vec();
        bars[39].volume = None;
        let series = BarSeries::new(full.ticker(), bars).unwrap();

        let table = compute_selected(&series, &[IndicatorId::Obv, IndicatorId::Ad]);
        assert_eq!(table.names(), vec!["AD", "OBV"]);
        let ad = table.column("AD").unwrap();
        assert!(ad[..39].iter().all(|v| v.is_finite()));
        assert_eq!(ad.len(), 40);
    }

    #[test]
    fn warm_up_is_nan() {
        let series = wavy_series(60);
        let table = compute_selected(&series, &[IndicatorId::Rsi]);
        let rsi = table.column("RSI_14").unwrap();
        assert!(rsi[..14].iter().all(|v| v.is_nan()));
        assert!(rsi[14..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn on_defined_tail_pads_prefix() {
        let out = on_defined_tail(&[f64::NAN, 1.0, 2.0], |x| x.iter().map(|v| v * 2.0).collect());
        assert!(out[0].is_nan());
        assert_eq!(&out[1..], &[2.0, 4.0]);
    }
}
