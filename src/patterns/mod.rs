// =============================================================================
// Candlestick Pattern Module
// =============================================================================
//
// The 61 TA-Lib candlestick recognisers, implemented as pure functions over the
// OHLC columns of a `BarSeries`. Every detector returns one integer per bar:
// 0 when the shape is absent, ±100 for bullish / bearish occurrences, ±80 for
// the weaker engulfing / harami variants and ±200 for confirmed hikkake.
// Bars before a detector's warm-up window are always 0.

pub mod candle;
pub mod multi_bar;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::BarSeries;
use candle::Candles;

type Detector = fn(&Candles) -> Vec<i32>;

/// Static description of one catalog entry.
struct PatternInfo {
    code: &'static str,
    description: &'static str,
    detect: Detector,
}

fn info(code: &'static str, description: &'static str, detect: Detector) -> PatternInfo {
    PatternInfo {
        code,
        description,
        detect,
    }
}

/// One of the 61 TA-Lib candlestick pattern identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternId {
    TwoCrows,
    ThreeBlackCrows,
    ThreeInside,
    ThreeLineStrike,
    ThreeOutside,
    ThreeStarsInSouth,
    ThreeWhiteSoldiers,
    AbandonedBaby,
    AdvanceBlock,
    BeltHold,
    Breakaway,
    ClosingMarubozu,
    ConcealBabySwallow,
    Counterattack,
    DarkCloudCover,
    Doji,
    DojiStar,
    DragonflyDoji,
    Engulfing,
    EveningDojiStar,
    EveningStar,
    GapSideSideWhite,
    GravestoneDoji,
    Hammer,
    HangingMan,
    Harami,
    HaramiCross,
    HighWave,
    Hikkake,
    HikkakeMod,
    HomingPigeon,
    IdenticalThreeCrows,
    InNeck,
    InvertedHammer,
    Kicking,
    KickingByLength,
    LadderBottom,
    LongLeggedDoji,
    LongLine,
    Marubozu,
    MatchingLow,
    MatHold,
    MorningDojiStar,
    MorningStar,
    OnNeck,
    Piercing,
    RickshawMan,
    RiseFallThreeMethods,
    SeparatingLines,
    ShootingStar,
    ShortLine,
    SpinningTop,
    StalledPattern,
    StickSandwich,
    Takuri,
    TasukiGap,
    Thrusting,
    Tristar,
    UniqueThreeRiver,
    UpsideGapTwoCrows,
    XSideGapThreeMethods,
}

impl PatternId {
    /// Every pattern, in catalog (alphabetical code) order.
    pub const ALL: [PatternId; 61] = [
        Self::TwoCrows,
        Self::ThreeBlackCrows,
        Self::ThreeInside,
        Self::ThreeLineStrike,
        Self::ThreeOutside,
        Self::ThreeStarsInSouth,
        Self::ThreeWhiteSoldiers,
        Self::AbandonedBaby,
        Self::AdvanceBlock,
        Self::BeltHold,
        Self::Breakaway,
        Self::ClosingMarubozu,
        Self::ConcealBabySwallow,
        Self::Counterattack,
        Self::DarkCloudCover,
        Self::Doji,
        Self::DojiStar,
        Self::DragonflyDoji,
        Self::Engulfing,
        Self::EveningDojiStar,
        Self::EveningStar,
        Self::GapSideSideWhite,
        Self::GravestoneDoji,
        Self::Hammer,
        Self::HangingMan,
        Self::Harami,
        Self::HaramiCross,
        Self::HighWave,
        Self::Hikkake,
        Self::HikkakeMod,
        Self::HomingPigeon,
        Self::IdenticalThreeCrows,
        Self::InNeck,
        Self::InvertedHammer,
        Self::Kicking,
        Self::KickingByLength,
        Self::LadderBottom,
        Self::LongLeggedDoji,
        Self::LongLine,
        Self::Marubozu,
        Self::MatchingLow,
        Self::MatHold,
        Self::MorningDojiStar,
        Self::MorningStar,
        Self::OnNeck,
        Self::Piercing,
        Self::RickshawMan,
        Self::RiseFallThreeMethods,
        Self::SeparatingLines,
        Self::ShootingStar,
        Self::ShortLine,
        Self::SpinningTop,
        Self::StalledPattern,
        Self::StickSandwich,
        Self::Takuri,
        Self::TasukiGap,
        Self::Thrusting,
        Self::Tristar,
        Self::UniqueThreeRiver,
        Self::UpsideGapTwoCrows,
        Self::XSideGapThreeMethods,
    ];

    fn info(self) -> PatternInfo {
        use multi_bar::*;
        use single_bar::*;
        use three_bar::*;
        use two_bar::*;

        match self {
            Self::TwoCrows => info("CDL2CROWS", "雙鴉（CDL2CROWS）", two_crows),
            Self::ThreeBlackCrows => info("CDL3BLACKCROWS", "三烏鴉（CDL3BLACKCROWS）", three_black_crows),
            Self::ThreeInside => info("CDL3INSIDE", "內困三日上升 / 下降（CDL3INSIDE）", three_inside),
            Self::ThreeLineStrike => info("CDL3LINESTRIKE", "三線打擊（CDL3LINESTRIKE）", three_line_strike),
            Self::ThreeOutside => info("CDL3OUTSIDE", "外側三日上升 / 下降（CDL3OUTSIDE）", three_outside),
            Self::ThreeStarsInSouth => info("CDL3STARSINSOUTH", "南方三星（CDL3STARSINSOUTH）", three_stars_in_south),
            Self::ThreeWhiteSoldiers => info("CDL3WHITESOLDIERS", "三白兵（CDL3WHITESOLDIERS）", three_white_soldiers),
            Self::AbandonedBaby => info("CDLABANDONEDBABY", "棄嬰（CDLABANDONEDBABY）", abandoned_baby),
            Self::AdvanceBlock => info("CDLADVANCEBLOCK", "大敵當前（CDLADVANCEBLOCK）", advance_block),
            Self::BeltHold => info("CDLBELTHOLD", "捉腰帶線（CDLBELTHOLD）", belt_hold),
            Self::Breakaway => info("CDLBREAKAWAY", "脫離（CDLBREAKAWAY）", breakaway),
            Self::ClosingMarubozu => info("CDLCLOSINGMARUBOZU", "收盤缺影線（CDLCLOSINGMARUBOZU）", closing_marubozu),
            Self::ConcealBabySwallow => info("CDLCONCEALBABYSWALL", "藏嬰吞沒（CDLCONCEALBABYSWALL）", conceal_baby_swallow),
            Self::Counterattack => info("CDLCOUNTERATTACK", "反擊線（CDLCOUNTERATTACK）", counterattack),
            Self::DarkCloudCover => info("CDLDARKCLOUDCOVER", "烏雲壓頂（CDLDARKCLOUDCOVER）", dark_cloud_cover),
            Self::Doji => info("CDLDOJI", "十字（CDLDOJI）", doji),
            Self::DojiStar => info("CDLDOJISTAR", "十字星（CDLDOJISTAR）", doji_star),
            Self::DragonflyDoji => info("CDLDRAGONFLYDOJI", "蜻蜓十字（CDLDRAGONFLYDOJI）", dragonfly_doji),
            Self::Engulfing => info("CDLENGULFING", "吞噬模式（CDLENGULFING）", engulfing),
            Self::EveningDojiStar => info("CDLEVENINGDOJISTAR", "十字暮星（CDLEVENINGDOJISTAR）", evening_doji_star),
            Self::EveningStar => info("CDLEVENINGSTAR", "暮星（CDLEVENINGSTAR）", evening_star),
            Self::GapSideSideWhite => info(
                "CDLGAPSIDESIDEWHITE",
                "向上 / 下跳空並列陽線（CDLGAPSIDESIDEWHITE）",
                gap_side_side_white,
            ),
            Self::GravestoneDoji => info("CDLGRAVESTONEDOJI", "墓碑十字（CDLGRAVESTONEDOJI）", gravestone_doji),
            Self::Hammer => info("CDLHAMMER", "錘頭（CDLHAMMER）", hammer),
            Self::HangingMan => info("CDLHANGINGMAN", "上吊線（CDLHANGINGMAN）", hanging_man),
            Self::Harami => info("CDLHARAMI", "母子線（CDLHARAMI）", harami),
            Self::HaramiCross => info("CDLHARAMICROSS", "十字孕線（CDLHARAMICROSS）", harami_cross),
            Self::HighWave => info("CDLHIGHWAVE", "風高浪大線（CDLHIGHWAVE）", high_wave),
            Self::Hikkake => info("CDLHIKKAKE", "陷阱（CDLHIKKAKE）", hikkake),
            Self::HikkakeMod => info("CDLHIKKAKEMOD", "修正陷阱（CDLHIKKAKEMOD）", hikkake_mod),
            Self::HomingPigeon => info("CDLHOMINGPIGEON", "家鴿（CDLHOMINGPIGEON）", homing_pigeon),
            Self::IdenticalThreeCrows => {
                info("CDLIDENTICAL3CROWS", "三胞胎烏鴉（CDLIDENTICAL3CROWS）", identical_three_crows)
            }
            Self::InNeck => info("CDLINNECK", "頸內線（CDLINNECK）", in_neck),
            Self::InvertedHammer => info("CDLINVERTEDHAMMER", "倒錘頭（CDLINVERTEDHAMMER）", inverted_hammer),
            Self::Kicking => info("CDLKICKING", "反衝型態（CDLKICKING）", kicking),
            Self::KickingByLength => info(
                "CDLKICKINGBYLENGTH",
                "由較長缺影線決定的反衝型態（CDLKICKINGBYLENGTH）",
                kicking_by_length,
            ),
            Self::LadderBottom => info("CDLLADDERBOTTOM", "梯底（CDLLADDERBOTTOM）", ladder_bottom),
            Self::LongLeggedDoji => info("CDLLONGLEGGEDDOJI", "長腳十字（CDLLONGLEGGEDDOJI）", long_legged_doji),
            Self::LongLine => info("CDLLONGLINE", "長蠟燭（CDLLONGLINE）", long_line),
            Self::Marubozu => info("CDLMARUBOZU", "光頭光腳 / 缺影線（CDLMARUBOZU）", marubozu),
            Self::MatchingLow => info("CDLMATCHINGLOW", "相同低價（CDLMATCHINGLOW）", matching_low),
            Self::MatHold => info("CDLMATHOLD", "鋪墊（CDLMATHOLD）", mat_hold),
            Self::MorningDojiStar => info("CDLMORNINGDOJISTAR", "十字晨星（CDLMORNINGDOJISTAR）", morning_doji_star),
            Self::MorningStar => info("CDLMORNINGSTAR", "晨星（CDLMORNINGSTAR）", morning_star),
            Self::OnNeck => info("CDLONNECK", "頸上線（CDLONNECK）", on_neck),
            Self::Piercing => info("CDLPIERCING", "刺透（CDLPIERCING）", piercing),
            Self::RickshawMan => info("CDLRICKSHAWMAN", "黃包車伕（CDLRICKSHAWMAN）", rickshaw_man),
            Self::RiseFallThreeMethods => info(
                "CDLRISEFALL3METHODS",
                "上升 / 下降三法（CDLRISEFALL3METHODS）",
                rise_fall_three_methods,
            ),
            Self::SeparatingLines => info("CDLSEPARATINGLINES", "分離線（CDLSEPARATINGLINES）", separating_lines),
            Self::ShootingStar => info("CDLSHOOTINGSTAR", "射擊之星（CDLSHOOTINGSTAR）", shooting_star),
            Self::ShortLine => info("CDLSHORTLINE", "短蠟燭（CDLSHORTLINE）", short_line),
            Self::SpinningTop => info("CDLSPINNINGTOP", "紡錘（CDLSPINNINGTOP）", spinning_top),
            Self::StalledPattern => info("CDLSTALLEDPATTERN", "停頓（CDLSTALLEDPATTERN）", stalled_pattern),
            Self::StickSandwich => info("CDLSTICKSANDWICH", "條形三明治（CDLSTICKSANDWICH）", stick_sandwich),
            Self::Takuri => info("CDLTAKURI", "探水竿（CDLTAKURI）", takuri),
            Self::TasukiGap => info("CDLTASUKIGAP", "跳空並列陰陽線（CDLTASUKIGAP）", tasuki_gap),
            Self::Thrusting => info("CDLTHRUSTING", "插入（CDLTHRUSTING）", thrusting),
            Self::Tristar => info("CDLTRISTAR", "三星（CDLTRISTAR）", tristar),
            Self::UniqueThreeRiver => info("CDLUNIQUE3RIVER", "奇特三河床（CDLUNIQUE3RIVER）", unique_three_river),
            Self::UpsideGapTwoCrows => {
                info("CDLUPSIDEGAP2CROWS", "向上跳空雙烏鴉（CDLUPSIDEGAP2CROWS）", upside_gap_two_crows)
            }
            Self::XSideGapThreeMethods => info(
                "CDLXSIDEGAP3METHODS",
                "上升 / 下降跳空三法（CDLXSIDEGAP3METHODS）",
                x_side_gap_three_methods,
            ),
        }
    }

    /// TA-Lib code, e.g. `"CDLHAMMER"`. Also the CSV / table column name.
    pub fn code(self) -> &'static str {
        self.info().code
    }

    /// Display name shown on chart markers, e.g. `"錘頭（CDLHAMMER）"`.
    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Run this pattern's detector over the given candles.
    pub fn detect(self, candles: &Candles) -> Vec<i32> {
        (self.info().detect)(candles)
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PatternId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PatternId::ALL
            .into_iter()
            .find(|p| p.code() == wanted)
            .ok_or_else(|| format!("Unknown candlestick pattern: '{s}'."))
    }
}

impl TryFrom<String> for PatternId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatternId> for String {
    fn from(value: PatternId) -> Self {
        value.code().to_string()
    }
}

// ---------------------------------------------------------------------------
// PatternMatrix -- every detector's output for one series
// ---------------------------------------------------------------------------

/// Per-date signal values for a set of patterns, aligned with `dates`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatrix {
    dates: Vec<NaiveDate>,
    columns: Vec<(PatternId, Vec<i32>)>,
}

impl PatternMatrix {
    /// Assemble a matrix; every column must be as long as `dates`.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(PatternId, Vec<i32>)>) -> Self {
        debug_assert!(columns.iter().all(|(_, v)| v.len() == dates.len()));
        Self { dates, columns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[(PatternId, Vec<i32>)] {
        &self.columns
    }

    #[cfg(test)]
    pub fn column(&self, id: PatternId) -> Option<&[i32]> {
        self.columns.iter().find(|(p, _)| *p == id).map(|(_, v)| v.as_slice())
    }

    pub fn pattern_ids(&self) -> Vec<PatternId> {
        self.columns.iter().map(|(p, _)| *p).collect()
    }

    /// Number of rows (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Patterns with a non-zero value on row `row`, in column order.
    pub fn fired_at(&self, row: usize) -> Vec<PatternId> {
        self.columns
            .iter()
            .filter(|(_, v)| v[row] != 0)
            .map(|(p, _)| *p)
            .collect()
    }
}

/// Evaluate all 61 detectors over the series.
pub fn detect_all(series: &BarSeries) -> PatternMatrix {
    let (open, high, low, close) = (series.opens(), series.highs(), series.lows(), series.closes());
    let candles = Candles::new(&open, &high, &low, &close);

    let columns: Vec<(PatternId, Vec<i32>)> = PatternId::ALL
        .iter()
        .map(|&id| (id, id.detect(&candles)))
        .collect();

    let hits: usize = columns
        .iter()
        .map(|(_, v)| v.iter().filter(|&&x| x != 0).count())
        .sum();
    debug!(ticker = series.ticker(), bars = series.len(), hits, "pattern scan complete");

    PatternMatrix::new(series.dates(), columns)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::bars::test_support::{series_from_ohlc, wavy_series};
    use std::collections::HashSet;

    #[test]
    fn catalog_has_61_unique_codes() {
        let codes: HashSet<&str> = PatternId::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(codes.len(), 61);
        assert!(PatternId::ALL.iter().all(|p| p.code().starts_with("CDL")));
    }

    #[test]
    fn catalog_is_sorted_by_code() {
        let codes: Vec<&str> = PatternId::ALL.iter().map(|p| p.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn descriptions_embed_their_code() {
        for p in PatternId::ALL {
            assert!(
                p.description().contains(&format!("（{}）", p.code())),
                "{} has description {}",
                p.code(),
                p.description()
            );
        }
        assert_eq!(PatternId::Hammer.description(), "錘頭（CDLHAMMER）");
    }

    #[test]
    fn code_parses_back() {
        assert_eq!("CDLHAMMER".parse::<PatternId>().unwrap(), PatternId::Hammer);
        assert_eq!("cdl3inside".parse::<PatternId>().unwrap(), PatternId::ThreeInside);
        assert!("CDLUNKNOWN".parse::<PatternId>().is_err());
    }

    #[test]
    fn detect_all_covers_every_pattern_and_date() {
        let series = wavy_series(120);
        let m = detect_all(&series);
        assert_eq!(m.columns().len(), 61);
        assert_eq!(m.len(), 120);
        for (id, col) in m.columns() {
            assert_eq!(col.len(), 120, "{id}");
            assert!(col.iter().all(|v| [-200, -100, -80, 0, 80, 100, 200].contains(v)));
        }
    }

    #[test]
    fn detect_all_is_deterministic() {
        let series = wavy_series(80);
        assert_eq!(detect_all(&series), detect_all(&series));
    }

    #[test]
    fn single_bar_history_is_all_zero() {
        let series = series_from_ohlc(&[(10.0, 11.0, 9.0, 10.5)]);
        let m = detect_all(&series);
        assert_eq!(m.len(), 1);
        assert!(m.columns().iter().all(|(_, v)| v == &vec![0]));
        assert!(m.fired_at(0).is_empty());
    }
}
