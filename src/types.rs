// =============================================================================
// Shared types used across the candle-lens analysis service
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trailing lookback window for a price-history request.
///
/// The token form (`"1mo"`, `"3mo"`, ...) is what the data provider and the
/// web form both speak, so serde goes through the token as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    /// Every selectable period, in the order the form lists them.
    pub const ALL: [Period; 4] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::ThreeMonths
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.token() == s.trim())
            .ok_or_else(|| format!("Invalid period: '{s}'. Use one of 1mo, 3mo, 6mo, 1y."))
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.token().to_string()
    }
}

/// Hand-curated pattern group offered by the form.
///
/// The labels are the ones users see and submit ("看漲形態" = bullish,
/// "看跌形態" = bearish); the English aliases are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternCategory {
    Bullish,
    Bearish,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 2] = [PatternCategory::Bullish, PatternCategory::Bearish];

    pub fn label(self) -> &'static str {
        match self {
            Self::Bullish => "看漲形態",
            Self::Bearish => "看跌形態",
        }
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PatternCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "看漲形態" | "bullish" | "Bullish" => Ok(Self::Bullish),
            "看跌形態" | "bearish" | "Bearish" => Ok(Self::Bearish),
            other => Err(format!("Invalid pattern category: '{other}'.")),
        }
    }
}

impl TryFrom<String> for PatternCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatternCategory> for String {
    fn from(value: PatternCategory) -> Self {
        value.label().to_string()
    }
}
