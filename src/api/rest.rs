// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET  /                  analysis form (single HTML page, plotly.js chart)
//   GET  /api/v1/health     liveness
//   GET  /api/v1/catalog    periods, categories, patterns, indicators, defaults
//   POST /api/v1/analyze    run one analysis
//   GET  /files/<name>      exported CSVs
//
// Input problems (bad period, unknown category or indicator, strength outside
// 0..=100) are answered with 400 before the pipeline starts. Pipeline failures
// are not HTTP errors: they come back as a 200 with a one-row error table.
// =============================================================================

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::analysis::{analyze_stock, AnalysisRequest};
use crate::app_state::AppState;
use crate::indicators::IndicatorId;
use crate::patterns::PatternId;
use crate::presentation::Table;
use crate::selection::category_members;
use crate::types::{PatternCategory, Period};

const INDEX_HTML: &str = include_str!("index.html");
const MAX_STRENGTH: i64 = 100;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware, the export file service and
/// shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let files = ServeDir::new(&state.config.output_dir);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/analyze", post(analyze))
        .nest_service("/files", files)
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    uptime_secs: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    Json(HealthResponse {
        status: "ok",
        server_time: now.timestamp_millis(),
        uptime_secs: (now - state.started_at).num_seconds(),
    })
}

// =============================================================================
// Catalog
// =============================================================================

async fn catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories: Vec<Value> = PatternCategory::ALL
        .iter()
        .map(|c| {
            json!({
                "label": c.label(),
                "members": category_members(*c).iter().map(|p| p.code()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let patterns: Vec<Value> = PatternId::ALL
        .iter()
        .map(|p| json!({ "code": p.code(), "description": p.description() }))
        .collect();

    let indicators: Vec<Value> = IndicatorId::ALL
        .iter()
        .map(|i| {
            json!({
                "id": i.code(),
                "group": i.group(),
                "columns": i.columns(),
                "needs_volume": i.needs_volume(),
            })
        })
        .collect();

    Json(json!({
        "periods": Period::ALL.iter().map(|p| p.token()).collect::<Vec<_>>(),
        "categories": categories,
        "patterns": patterns,
        "indicators": indicators,
        "defaults": {
            "period": state.config.default_period,
            "categories": PatternCategory::ALL,
            "strength": 0,
            "indicators": state.config.default_indicators,
        },
    }))
}

// =============================================================================
// Analyze
// =============================================================================

/// Raw form submission. Everything except the ticker is optional; omitted
/// fields take the form defaults.
#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    period: Option<String>,
    /// Omitted = both categories; an explicit empty list = every pattern.
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    strength: Option<i64>,
    #[serde(default)]
    indicators: Option<Vec<String>>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    table: Table,
    chart: Option<Value>,
    file: Option<String>,
}

/// Validate a submission against the catalog.
fn parse_request(body: AnalyzeBody, state: &AppState) -> Result<AnalysisRequest, ApiError> {
    let period = match body.period.as_deref().map(str::trim) {
        None | Some("") => state.config.default_period,
        Some(token) => token.parse::<Period>().map_err(bad_request)?,
    };

    let categories = match body.categories {
        None => PatternCategory::ALL.to_vec(),
        Some(raw) => raw
            .iter()
            .map(|c| c.parse::<PatternCategory>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(bad_request)?,
    };

    let strength = body.strength.unwrap_or(0);
    if !(0..=MAX_STRENGTH).contains(&strength) {
        return Err(bad_request(format!(
            "Invalid strength: {strength}. Use a value between 0 and {MAX_STRENGTH}."
        )));
    }

    let indicators = match body.indicators {
        None => state.config.default_indicators.clone(),
        Some(raw) => raw
            .iter()
            .map(|i| i.parse::<IndicatorId>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(bad_request)?,
    };

    Ok(AnalysisRequest {
        ticker: body.ticker,
        period,
        categories,
        threshold: strength as u32,
        indicators,
    })
}

/// Public URL of an export written under the output directory.
fn file_url(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| format!("/files/{n}"))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = match parse_request(body, &state) {
        Ok(r) => r,
        Err((status, Json(detail))) => {
            warn!(error = %detail["error"], "rejected analysis request");
            return Err((status, Json(detail)));
        }
    };
    info!(
        ticker = %request.ticker,
        period = %request.period,
        threshold = request.threshold,
        indicators = request.indicators.len(),
        "analysis requested"
    );

    let outcome = analyze_stock(&state.yahoo, &state.output_settings(), request).await;
    Ok(Json(AnalyzeResponse {
        table: outcome.table,
        chart: outcome.chart,
        file: outcome.file.as_deref().and_then(file_url),
    }))
}
