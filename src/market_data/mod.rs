pub mod bars;
pub mod yahoo;

use chrono::NaiveDate;
use thiserror::Error;

// Re-export the bar types for convenient access (e.g. `use crate::market_data::BarSeries`).
pub use bars::{BarSeries, PriceBar};
pub use yahoo::YahooClient;

/// Everything that can go wrong while acquiring a price history.
///
/// Each variant renders as a single human-readable sentence; the request
/// boundary shows it verbatim in the error table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Ticker symbol is empty.")]
    EmptyTicker,

    #[error("Invalid ticker symbol: '{ticker}'. Use letters, digits and . ^ = - only.")]
    InvalidTicker { ticker: String },

    #[error("Failed to fetch data for ticker {ticker}. Reason: {reason}")]
    Request { ticker: String, reason: String },

    #[error("Data provider rejected ticker {ticker}: {description}")]
    Provider { ticker: String, description: String },

    #[error("No data found for ticker {ticker} in the selected period.")]
    NoData { ticker: String },

    #[error("Data for ticker {ticker} is missing required columns: {missing:?}")]
    MissingColumns {
        ticker: String,
        missing: Vec<&'static str>,
    },

    #[error("Data for ticker {ticker} contains missing or non-numeric values on {date}.")]
    NonNumeric { ticker: String, date: NaiveDate },

    #[error("Data for ticker {ticker} is not in ascending date order.")]
    Unsorted { ticker: String },
}
