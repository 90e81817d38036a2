//! Market data providers and pipeline stages
//!
//! This crate supplies everything an analysis pipeline plugs together:
//!
//! - **Fundamentals** from the Yahoo Finance `quoteSummary` endpoint
//! - **Price charts** rendered to PNG from daily closing prices
//! - **Pros and cons narratives** generated through a chat completion model
//! - **Headlines** from NewsAPI, with sample headlines when no key is set
//!
//! The four [`stages`] wire those providers into `analyst-pipeline`
//! stages. Stages depend on the capability traits in [`providers`], so
//! any piece can be swapped out or mocked.
//!
//! # Example
//!
//! ```rust,no_run
//! use analyst_core::{AnalysisState, AnalysisType};
//! use analyst_market::{
//!     ChartStage, FundamentalsStage, MarketConfig, NewsApiProvider, NewsStage,
//!     PriceChartRenderer, YahooFinanceClient,
//! };
//! use analyst_pipeline::Pipeline;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = MarketConfig::default();
//! let yahoo = Arc::new(YahooFinanceClient::new(config.request_timeout)?);
//!
//! let pipeline = Pipeline::builder()
//!     .add_stage(Arc::new(FundamentalsStage::new(yahoo.clone())))
//!     .add_stage(Arc::new(ChartStage::new(
//!         Arc::new(PriceChartRenderer::new(yahoo, config.chart_history_days)),
//!         config.charts_dir.clone(),
//!     )))
//!     .add_stage(Arc::new(NewsStage::new(Arc::new(NewsApiProvider::new(
//!         config.news_api_key.clone(),
//!         config.news_limit,
//!     )))))
//!     .build()?;
//!
//! let state = AnalysisState::new("AAPL", AnalysisType::Growth, "");
//! let _report = pipeline.execute(state).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod narrative;
pub mod providers;
pub mod stages;

// Re-export main types for convenience
pub use api::newsapi::NewsApiProvider;
pub use api::yahoo::{DailyClose, YahooFinanceClient};
pub use chart::PriceChartRenderer;
pub use config::{MarketConfig, MarketConfigBuilder};
pub use error::{MarketError, Result};
pub use narrative::LlmNarrativeGenerator;
pub use providers::{ChartRenderer, FundamentalsProvider, NarrativeGenerator, NewsProvider};
pub use stages::{ChartStage, FundamentalsStage, NarrativeStage, NewsStage};
