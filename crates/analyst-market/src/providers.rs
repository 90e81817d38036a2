//! Capability traits the analysis stages are built against
//!
//! Each stage depends on one narrow trait rather than a concrete client,
//! so providers can be swapped per deployment and mocked in tests.

use crate::error::Result;
use analyst_core::{AnalysisType, Fundamentals, NewsArticle};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of fundamental metrics for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Fetch the fundamental metric set for `ticker`
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals>;
}

/// Renders a price chart image for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render a price chart for `ticker` into `output_dir` and return the
    /// path of the written file
    async fn render_price_chart(&self, ticker: &str, output_dir: &Path) -> Result<PathBuf>;
}

/// Produces the pros and cons narrative for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate an investment analysis narrative from the fundamentals
    /// gathered earlier in the run
    async fn narrative(
        &self,
        fundamentals: &Fundamentals,
        analysis_type: AnalysisType,
        custom_prompt: &str,
    ) -> Result<String>;
}

/// Source of recent headlines for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch recent news articles mentioning `ticker`
    async fn news(&self, ticker: &str) -> Result<Vec<NewsArticle>>;
}
