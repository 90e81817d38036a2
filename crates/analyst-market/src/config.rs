//! Configuration for market data providers and chart output

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default directory chart PNGs are written to
pub const DEFAULT_CHARTS_DIR: &str = "charts";

/// Default number of calendar days of price history to chart
pub const DEFAULT_CHART_HISTORY_DAYS: u32 = 365;

/// Default number of headlines kept per ticker
pub const DEFAULT_NEWS_LIMIT: usize = 5;

/// Default timeout for outbound HTTP requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the market data layer
///
/// # Example
///
/// ```rust
/// use analyst_market::MarketConfig;
///
/// let config = MarketConfig::builder()
///     .charts_dir("out/charts")
///     .news_limit(3)
///     .build();
///
/// assert_eq!(config.news_limit, 3);
/// assert_eq!(config.chart_history_days, 365);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Directory chart PNGs are written to
    pub charts_dir: PathBuf,

    /// Number of calendar days of price history to chart
    pub chart_history_days: u32,

    /// NewsAPI key; without one the news provider serves sample headlines
    pub news_api_key: Option<String>,

    /// Maximum number of headlines kept per ticker
    pub news_limit: usize,

    /// Timeout for outbound HTTP requests
    pub request_timeout: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            charts_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            chart_history_days: DEFAULT_CHART_HISTORY_DAYS,
            news_api_key: None,
            news_limit: DEFAULT_NEWS_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl MarketConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::new()
    }

    /// Read the NewsAPI key from the `NEWSAPI_KEY` environment variable
    pub fn with_env_news_key(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWSAPI_KEY") {
            if !key.is_empty() {
                self.news_api_key = Some(key);
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chart_history_days == 0 {
            return Err(MarketError::ConfigError(
                "chart_history_days must be at least 1".to_string(),
            ));
        }
        if self.news_limit == 0 {
            return Err(MarketError::ConfigError(
                "news_limit must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(MarketError::ConfigError(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`MarketConfig`]
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    charts_dir: Option<PathBuf>,
    chart_history_days: Option<u32>,
    news_api_key: Option<String>,
    news_limit: Option<usize>,
    request_timeout: Option<Duration>,
}

impl MarketConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chart output directory
    pub fn charts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.charts_dir = Some(dir.into());
        self
    }

    /// Set the price history window in calendar days
    pub fn chart_history_days(mut self, days: u32) -> Self {
        self.chart_history_days = Some(days);
        self
    }

    /// Set the NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set the maximum number of headlines kept per ticker
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the timeout for outbound HTTP requests
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> MarketConfig {
        let defaults = MarketConfig::default();
        MarketConfig {
            charts_dir: self.charts_dir.unwrap_or(defaults.charts_dir),
            chart_history_days: self.chart_history_days.unwrap_or(defaults.chart_history_days),
            news_api_key: self.news_api_key.or(defaults.news_api_key),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        }
    }
}
