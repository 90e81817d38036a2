//! Error types for market data and rendering operations

use thiserror::Error;

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur while fetching market data or rendering output
#[derive(Error, Debug)]
pub enum MarketError {
    /// External API returned an error
    #[error("API error: {0}")]
    ApiError(String),

    /// The provider had no usable data for a symbol
    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Yahoo Finance client error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Chart rendering failed
    #[error("chart rendering failed: {0}")]
    ChartError(String),

    /// Network request failed
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or parsing failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Language model call failed
    #[error("LLM error: {0}")]
    LlmError(#[from] analyst_llm::LLMError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<MarketError> for analyst_core::Error {
    fn from(err: MarketError) -> Self {
        analyst_core::Error::Generic(err.to_string())
    }
}
