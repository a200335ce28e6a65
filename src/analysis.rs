// =============================================================================
// Analysis pipeline
// =============================================================================
//
// One request, strictly in order:
//
//   fetch bars → detect patterns → compute indicators → filter → present
//
// The fetch is async; everything after it is CPU work plus one file write and
// runs on the blocking pool. Any failure anywhere discards the whole result
// and becomes a one-row error table with no chart and no file.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::indicators::{compute_selected, IndicatorId};
use crate::market_data::{BarSeries, YahooClient};
use crate::patterns::detect_all;
use crate::presentation::{build_figure, export_table, results_table, write_csv, Table};
use crate::selection::filter_patterns;
use crate::types::{PatternCategory, Period};

/// Validated user input for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub period: Period,
    /// Empty means every pattern.
    pub categories: Vec<PatternCategory>,
    /// Minimum absolute signal strength; 0 disables the filter.
    pub threshold: u32,
    pub indicators: Vec<IndicatorId>,
}

/// Everything the page shows for one request.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub table: Table,
    pub chart: Option<Value>,
    pub file: Option<PathBuf>,
}

impl AnalysisOutcome {
    fn failed(message: String) -> Self {
        Self {
            table: Table::error(message),
            chart: None,
            file: None,
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub output_dir: PathBuf,
    pub chart_title: String,
}

/// Run the full pipeline for `request`. Never fails: errors are folded into
/// the returned outcome.
pub async fn analyze_stock(
    client: &YahooClient,
    output: &OutputSettings,
    request: AnalysisRequest,
) -> AnalysisOutcome {
    let request_id = Uuid::new_v4();
    let span = info_span!("analysis", %request_id, ticker = %request.ticker);

    async move {
        match run(client, output, &request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(ticker = %request.ticker, error = %format!("{e:#}"), "analysis failed");
                AnalysisOutcome::failed(format!("{e:#}"))
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(
    client: &YahooClient,
    output: &OutputSettings,
    request: &AnalysisRequest,
) -> Result<AnalysisOutcome> {
    let series = client.fetch_daily(&request.ticker, request.period).await?;

    let request = request.clone();
    let output = output.clone();
    let at = Local::now().naive_local();
    tokio::task::spawn_blocking(move || {
        evaluate(&series, &request, &output.output_dir, &output.chart_title, at)
    })
    .await
    .context("analysis worker stopped unexpectedly")?
}

/// Everything after the fetch: patterns, indicators, filtering, chart, tables
/// and the CSV export stamped with `at`.
pub fn evaluate(
    series: &BarSeries,
    request: &AnalysisRequest,
    output_dir: &Path,
    chart_title: &str,
    at: NaiveDateTime,
) -> Result<AnalysisOutcome> {
    let matrix = detect_all(series);
    let indicators = compute_selected(series, &request.indicators);
    let filtered = filter_patterns(&matrix, &request.categories, request.threshold);

    let chart = build_figure(series, &filtered, &indicators, chart_title);
    let table = results_table(series, &filtered, &indicators);
    let export = export_table(series, &matrix, &indicators);
    let file = write_csv(output_dir, series.ticker(), &export, at)?;

    info!(
        ticker = series.ticker(),
        bars = series.len(),
        pattern_rows = filtered.source_rows().len(),
        indicator_columns = indicators.columns().len(),
        "analysis complete"
    );

    Ok(AnalysisOutcome {
        table,
        chart: Some(chart),
        file: Some(file),
    })
}
