//! Sequential pipeline execution
//!
//! Execution is a fold over the stage list:
//! 1. Run the next stage against a read-only view of the current state
//! 2. Check the update against the stage's declared kind
//! 3. Merge the update into a new state
//! 4. On the first stage error, stop and surface the partial state

use crate::Pipeline;
use analyst_core::{AnalysisState, Error, StageKind};
use tracing::{debug, instrument};

/// A pipeline run that stopped at a failing stage
///
/// Carries the state as of the last successful merge, so callers can see
/// exactly which fields were populated before the failure.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed for {ticker}: {error}")]
pub struct PipelineFailure {
    /// Ticker the run was analyzing
    pub ticker: String,
    /// The stage that failed
    pub stage: StageKind,
    /// What went wrong
    #[source]
    pub error: Error,
    /// State accumulated before the failing stage
    pub partial: AnalysisState,
}

impl Pipeline {
    /// Run every stage in order, starting from `initial`
    ///
    /// Each successful update is merged before the next stage runs, so a
    /// later stage always sees what earlier stages produced in this same
    /// run. The pipeline itself holds no state between invocations.
    #[instrument(skip(self, initial), fields(ticker = %initial.ticker(), stages = self.stages.len()))]
    pub async fn execute(
        &self,
        initial: AnalysisState,
    ) -> Result<AnalysisState, PipelineFailure> {
        let mut state = initial;

        for stage in &self.stages {
            let kind = stage.kind();
            debug!(stage = %kind, "running stage");

            let update = match stage.run(&state).await {
                Ok(update) => update,
                Err(error) => {
                    return Err(PipelineFailure {
                        ticker: state.ticker().to_string(),
                        stage: kind,
                        error,
                        partial: state,
                    });
                }
            };

            // A stage may only fill the field it owns
            if update.kind() != kind {
                let error = Error::stage_failed(
                    kind,
                    format!("produced a {} update instead", update.kind()),
                );
                return Err(PipelineFailure {
                    ticker: state.ticker().to_string(),
                    stage: kind,
                    error,
                    partial: state,
                });
            }

            state = state.apply(update);
            debug!(stage = %kind, "stage complete");
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::{AnalysisType, Fundamentals, NewsArticle, Result, Stage, StageUpdate};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn sample_fundamentals() -> Fundamentals {
        Fundamentals {
            market_cap: Some(2.0e12),
            pe_ratio: Some(31.0),
            revenue: Some(2.1e11),
            eps: Some(9.7),
            debt_to_equity: Some(0.4),
        }
    }

    struct FakeFundamentals;

    #[async_trait]
    impl Stage for FakeFundamentals {
        fn kind(&self) -> StageKind {
            StageKind::Fundamentals
        }

        async fn run(&self, _state: &AnalysisState) -> Result<StageUpdate> {
            Ok(StageUpdate::Fundamentals(sample_fundamentals()))
        }
    }

    struct FakeChart {
        fail: bool,
    }

    #[async_trait]
    impl Stage for FakeChart {
        fn kind(&self) -> StageKind {
            StageKind::Chart
        }

        async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
            if self.fail {
                return Err(Error::stage_failed(self.kind(), "no price history"));
            }
            Ok(StageUpdate::Charts(vec![PathBuf::from(format!(
                "charts/{}_chart.png",
                state.ticker()
            ))]))
        }
    }

    /// Writes the P/E it observed into the narrative, so tests can assert
    /// that it saw the fundamentals merged earlier in the same run.
    struct FakeNarrative;

    #[async_trait]
    impl Stage for FakeNarrative {
        fn kind(&self) -> StageKind {
            StageKind::Narrative
        }

        async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
            Ok(StageUpdate::ProsCons(format!(
                "pe={:?}",
                state.fundamentals().pe_ratio
            )))
        }
    }

    struct FakeNews;

    #[async_trait]
    impl Stage for FakeNews {
        fn kind(&self) -> StageKind {
            StageKind::News
        }

        async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
            Ok(StageUpdate::News(vec![NewsArticle::new(
                format!("{} in the news", state.ticker()),
                "https://example.com",
            )]))
        }
    }

    /// Claims to be the chart stage but produces a narrative update
    struct MismatchedStage;

    #[async_trait]
    impl Stage for MismatchedStage {
        fn kind(&self) -> StageKind {
            StageKind::Chart
        }

        async fn run(&self, _state: &AnalysisState) -> Result<StageUpdate> {
            Ok(StageUpdate::ProsCons("not a chart".to_string()))
        }
    }

    fn full_pipeline(chart_fails: bool) -> Pipeline {
        Pipeline::builder()
            .add_stage(Arc::new(FakeFundamentals))
            .add_stage(Arc::new(FakeChart { fail: chart_fails }))
            .add_stage(Arc::new(FakeNarrative))
            .add_stage(Arc::new(FakeNews))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_populates_every_field() {
        let pipeline = full_pipeline(false);
        let initial = AnalysisState::new("AAPL", AnalysisType::Growth, "");

        let state = pipeline.execute(initial).await.unwrap();

        assert_eq!(state.fundamentals(), &sample_fundamentals());
        assert_eq!(state.charts(), &[PathBuf::from("charts/AAPL_chart.png")]);
        assert!(!state.pros_cons().is_empty());
        assert_eq!(state.news().len(), 1);
    }

    #[tokio::test]
    async fn test_narrative_sees_fundamentals_from_same_run() {
        let pipeline = full_pipeline(false);
        let initial = AnalysisState::new("MSFT", AnalysisType::Value, "");

        let state = pipeline.execute(initial).await.unwrap();

        assert_eq!(state.pros_cons(), "pe=Some(31.0)");
    }

    #[tokio::test]
    async fn test_failure_preserves_partial_state() {
        let pipeline = full_pipeline(true);
        let initial = AnalysisState::new("TSLA", AnalysisType::Growth, "");

        let failure = pipeline.execute(initial).await.unwrap_err();

        assert_eq!(failure.ticker, "TSLA");
        assert_eq!(failure.stage, StageKind::Chart);
        // Everything before the chart stage is kept, nothing after it ran
        assert_eq!(failure.partial.fundamentals(), &sample_fundamentals());
        assert!(failure.partial.charts().is_empty());
        assert!(failure.partial.pros_cons().is_empty());
        assert!(failure.partial.news().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_update_is_rejected() {
        let pipeline = Pipeline::builder()
            .add_stage(Arc::new(MismatchedStage))
            .build()
            .unwrap();
        let initial = AnalysisState::new("AAPL", AnalysisType::General, "");

        let failure = pipeline.execute(initial).await.unwrap_err();

        assert_eq!(failure.stage, StageKind::Chart);
        assert!(failure.error.to_string().contains("narrative update"));
        assert!(failure.partial.pros_cons().is_empty());
    }

    #[tokio::test]
    async fn test_failure_display_names_stage_and_ticker() {
        let pipeline = full_pipeline(true);
        let initial = AnalysisState::new("TSLA", AnalysisType::Growth, "");

        let failure = pipeline.execute(initial).await.unwrap_err();
        let message = failure.to_string();

        assert!(message.contains("chart"));
        assert!(message.contains("TSLA"));
    }
}
