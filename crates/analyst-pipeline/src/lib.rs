//! Pipeline orchestration for analyst-rs
//!
//! This crate runs analysis stages in a fixed order over an accumulating
//! [`analyst_core::AnalysisState`], and drives whole batches of tickers
//! through that pipeline with per-ticker failure isolation.

pub mod batch;
pub mod executor;
pub mod pipeline;

// Re-export for convenience
pub use batch::{
    BatchReport, BatchRunner, BatchSummary, DEFAULT_TICKER, TickerOutcome, normalize_tickers,
};
pub use executor::PipelineFailure;
pub use pipeline::{Pipeline, PipelineBuilder};
