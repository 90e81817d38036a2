//! Core Stage trait definition

use crate::{AnalysisState, Result, StageKind, StageUpdate};
use async_trait::async_trait;

/// Core trait that all pipeline stages implement
///
/// A stage reads the state accumulated so far and produces the update for
/// the one field it owns. Stages never mutate the state themselves; merging
/// is the executor's job, which keeps every intermediate state intact for
/// failure diagnostics.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Which stage this is, and therefore which field its update may carry
    fn kind(&self) -> StageKind;

    /// Produce this stage's update from a read-only view of the state
    async fn run(&self, state: &AnalysisState) -> Result<StageUpdate>;
}
