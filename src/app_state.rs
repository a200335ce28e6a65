// =============================================================================
// Central Application State
// =============================================================================
//
// Shared across every request handler via `Arc<AppState>`. Nothing in here is
// mutated after startup: the configuration is fixed and the HTTP client pools
// its own connections internally, so requests never contend on a lock.
// =============================================================================

use anyhow::Result;

use crate::analysis::OutputSettings;
use crate::market_data::YahooClient;
use crate::server_config::ServerConfig;

pub struct AppState {
    pub config: ServerConfig,
    pub yahoo: YahooClient,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let yahoo = YahooClient::new(config.yahoo_base_url.clone(), config.request_timeout())?;
        Ok(Self {
            config,
            yahoo,
            started_at: chrono::Utc::now(),
        })
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            output_dir: self.config.output_dir.clone(),
            chart_title: self.config.chart_title.clone(),
        }
    }
}
