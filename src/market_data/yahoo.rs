// =============================================================================
// Yahoo Finance Chart Client — daily OHLCV history
// =============================================================================
//
// Pulls daily bars from the public v8 chart endpoint:
//   GET {base}/v8/finance/chart/{TICKER}?range={period}&interval=1d
//
// The payload is column-oriented (one array per field, aligned with the
// timestamp array) and may contain nulls for days the provider could not
// price. Rows with incomplete OHLC are dropped; if nothing survives the fetch
// is rejected. Parsing is kept separate from I/O so it can be tested against
// canned responses.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{BarSeries, DataError, PriceBar};
use crate::types::Period;

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// -----------------------------------------------------------------------------
// Wire types
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

// -----------------------------------------------------------------------------
// Client
// -----------------------------------------------------------------------------

/// Thin async client for the Yahoo chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; candle-lens)")
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// `{base}/v8/finance/chart/{ticker}` with the ticker as one escaped
    /// path segment.
    fn chart_url(&self, ticker: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid provider base url {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("provider base url {} cannot take a path", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    /// Fetch the trailing `period` of daily bars for `ticker`.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(&self, ticker: &str, period: Period) -> Result<BarSeries, DataError> {
        let ticker = normalise_ticker(ticker)?;

        let request_error = |reason: String| DataError::Request {
            ticker: ticker.clone(),
            reason,
        };

        let url = self.chart_url(&ticker).map_err(|e| request_error(format!("{e:#}")))?;
        let resp = self
            .client
            .get(url)
            .query(&[
                ("range", period.token()),
                ("interval", "1d"),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| request_error(e.to_string()))?;

        // The provider reports unknown symbols as a 404 with a JSON error
        // object, so try the payload before giving up on the status.
        match parse_chart_response(&ticker, &body) {
            Ok(series) => {
                info!(ticker = %ticker, period = %period, bars = series.len(), "price history fetched");
                Ok(series)
            }
            Err(err @ DataError::Provider { .. }) => Err(err),
            Err(_) if !status.is_success() => {
                warn!(ticker = %ticker, %status, "chart request failed");
                Err(request_error(format!("HTTP {status}")))
            }
            Err(err) => Err(err),
        }
    }
}

/// Trim and upper-case a user-entered ticker; reject blanks and anything
/// outside `[A-Z0-9.^=-]`.
pub fn normalise_ticker(raw: &str) -> Result<String, DataError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(DataError::EmptyTicker);
    }
    let allowed = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || ".^=-".contains(c);
    if !ticker.chars().all(allowed) {
        return Err(DataError::InvalidTicker { ticker });
    }
    Ok(ticker)
}

/// Turn a raw chart payload into a validated [`BarSeries`].
pub fn parse_chart_response(ticker: &str, body: &str) -> Result<BarSeries, DataError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| DataError::Request {
        ticker: ticker.to_string(),
        reason: format!("unreadable response: {e}"),
    })?;

    if let Some(err) = envelope.chart.error {
        return Err(DataError::Provider {
            ticker: ticker.to_string(),
            description: format!("{} - {}", err.code, err.description),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::NoData {
            ticker: ticker.to_string(),
        })?;

    if result.timestamp.is_empty() {
        return Err(DataError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::MissingColumns {
            ticker: ticker.to_string(),
            missing: vec!["Open", "High", "Low", "Close"],
        })?;

    let missing: Vec<&'static str> = [
        ("Open", quote.open.is_none()),
        ("High", quote.high.is_none()),
        ("Low", quote.low.is_none()),
        ("Close", quote.close.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            ticker: ticker.to_string(),
            missing,
        });
    }

    let (open, high, low, close) = (
        quote.open.unwrap_or_default(),
        quote.high.unwrap_or_default(),
        quote.low.unwrap_or_default(),
        quote.close.unwrap_or_default(),
    );
    let volume = quote.volume.unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let field = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten().filter(|v| v.is_finite());

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    let mut dropped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(date) = trading_date(ts, offset) else {
            dropped += 1;
            continue;
        };
        let (Some(o), Some(h), Some(l), Some(c)) =
            (field(&open, i), field(&high, i), field(&low, i), field(&close, i))
        else {
            dropped += 1;
            continue;
        };
        let bar = PriceBar {
            date,
            open: o,
            high: h,
            low: l,
            close: c,
            volume: field(&volume, i),
        };
        // The provider sometimes appends the live session as a second row for
        // the same day; keep the latest.
        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }

    if dropped > 0 {
        debug!(ticker, dropped, "dropped rows with incomplete OHLC");
    }

    BarSeries::new(ticker, bars)
}

fn trading_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.date_naive())
}
