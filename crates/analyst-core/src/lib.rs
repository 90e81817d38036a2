//! Core abstractions for analyst-rs
//!
//! This crate defines the analysis state record, the per-stage update type,
//! and the `Stage` trait implemented by every step of the analysis pipeline.

pub mod error;
pub mod stage;
pub mod state;

pub use error::{Error, Result};
pub use stage::Stage;
pub use state::{AnalysisState, AnalysisType, Fundamentals, NewsArticle, StageKind, StageUpdate};
