// =============================================================================
// Server Configuration — startup settings for the analysis service
// =============================================================================
//
// Loaded once at startup from `candle_lens.json` (missing or broken files fall
// back to defaults), then overridden from the environment:
//
//   CANDLE_LENS_BIND_ADDR    listen address      (default 0.0.0.0:5678)
//   CANDLE_LENS_OUTPUT_DIR   CSV export folder   (default tmp)
//
// All fields carry `#[serde(default)]` so a partial JSON file is enough.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorId;
use crate::market_data::yahoo::DEFAULT_BASE_URL;
use crate::types::Period;

pub const CONFIG_FILE: &str = "candle_lens.json";
pub const ENV_BIND_ADDR: &str = "CANDLE_LENS_BIND_ADDR";
pub const ENV_OUTPUT_DIR: &str = "CANDLE_LENS_OUTPUT_DIR";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5678".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("tmp")
}

fn default_yahoo_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_indicators() -> Vec<IndicatorId> {
    IndicatorId::DEFAULTS.to_vec()
}

fn default_chart_title() -> String {
    "Candlestick Pattern & Technical Indicator Analysis by David888.com".to_string()
}

// =============================================================================
// ServerConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory that receives CSV exports; also served under `/files`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    /// Per-request timeout for the price-history fetch.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Period pre-selected on the form and used when a request omits one.
    #[serde(default)]
    pub default_period: Period,

    /// Indicators pre-checked on the form and used when a request omits them.
    #[serde(default = "default_indicators")]
    pub default_indicators: Vec<IndicatorId>,

    #[serde(default = "default_chart_title")]
    pub chart_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            output_dir: default_output_dir(),
            yahoo_base_url: default_yahoo_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_period: Period::default(),
            default_indicators: default_indicators(),
            chart_title: default_chart_title(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can decide to fall back to
    /// `ServerConfig::default()`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read server config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse server config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            output_dir = %config.output_dir.display(),
            "server config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` in production.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
