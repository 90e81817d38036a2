//! Error types for analyst-core

use crate::state::StageKind;
use thiserror::Error;

/// Result type alias for analyst-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// A pipeline stage failed while producing its update
    #[error("{stage} stage failed: {message}")]
    StageFailed { stage: StageKind, message: String },

    /// Unrecognized analysis type string
    #[error("unknown analysis type '{0}' (expected one of: growth, value, general, dividend, momentum)")]
    InvalidAnalysisType(String),

    /// A pipeline was built without any stages
    #[error("pipeline has no stages")]
    EmptyPipeline,
}

impl Error {
    /// Build a `StageFailed` error for the given stage
    pub fn stage_failed(stage: StageKind, message: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            message: message.into(),
        }
    }
}
