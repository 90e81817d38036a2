//! Narrative stage

use crate::providers::NarrativeGenerator;
use analyst_core::{AnalysisState, AnalysisType, Result, Stage, StageKind, StageUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Produces the pros and cons narrative for the ticker under analysis
///
/// Narrative generation depends on an external model, so this stage
/// degrades instead of aborting: when the generator fails, a canned
/// analysis carrying the error text is substituted and the run goes on.
pub struct NarrativeStage {
    generator: Arc<dyn NarrativeGenerator>,
}

impl NarrativeStage {
    pub fn new(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self { generator }
    }
}

/// The canned narrative substituted when the generator is unavailable
fn fallback_narrative(ticker: &str, analysis_type: AnalysisType, error: &str) -> String {
    format!(
        "Error generating analysis with the language model: {error}\n\n\
         Analysis for {ticker} as a {analysis_type} investment:\n\n\
         Pros:\n\
         - Strong fundamentals based on available data\n\
         - Historical performance shows potential\n\n\
         Cons:\n\
         - Market volatility may affect short-term performance\n\
         - Further research recommended\n\n\
         Note: This is a simplified fallback analysis produced without the language model."
    )
}

#[async_trait]
impl Stage for NarrativeStage {
    fn kind(&self) -> StageKind {
        StageKind::Narrative
    }

    async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
        let narrative = match self
            .generator
            .narrative(
                state.fundamentals(),
                state.analysis_type(),
                state.custom_prompt(),
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    ticker = %state.ticker(),
                    error = %e,
                    "narrative generation failed, substituting fallback"
                );
                fallback_narrative(state.ticker(), state.analysis_type(), &e.to_string())
            }
        };

        Ok(StageUpdate::ProsCons(narrative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::providers::MockNarrativeGenerator;
    use analyst_core::Fundamentals;

    fn state() -> AnalysisState {
        AnalysisState::new("AAPL", AnalysisType::Growth, "Focus on dividends.")
    }

    #[tokio::test]
    async fn test_produces_pros_cons_update() {
        let mut generator = MockNarrativeGenerator::new();
        generator
            .expect_narrative()
            .withf(|_, analysis_type, prompt| {
                *analysis_type == AnalysisType::Growth && prompt == "Focus on dividends."
            })
            .returning(|_, _, _| Ok("Pros:\n- Strong growth".to_string()));

        let stage = NarrativeStage::new(Arc::new(generator));
        assert_eq!(stage.kind(), StageKind::Narrative);

        let update = stage.run(&state()).await.unwrap();
        match update {
            StageUpdate::ProsCons(text) => assert_eq!(text, "Pros:\n- Strong growth"),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_passes_accumulated_fundamentals() {
        let mut generator = MockNarrativeGenerator::new();
        generator
            .expect_narrative()
            .withf(|fundamentals, _, _| fundamentals.pe_ratio == Some(31.0))
            .returning(|_, _, _| Ok("ok".to_string()));

        let stage = NarrativeStage::new(Arc::new(generator));
        let state = state().apply(StageUpdate::Fundamentals(Fundamentals {
            pe_ratio: Some(31.0),
            ..Fundamentals::default()
        }));

        stage.run(&state).await.unwrap();
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_to_fallback() {
        let mut generator = MockNarrativeGenerator::new();
        generator.expect_narrative().returning(|_, _, _| {
            Err(MarketError::ApiError("connection refused".to_string()))
        });

        let stage = NarrativeStage::new(Arc::new(generator));
        let update = stage.run(&state()).await.unwrap();

        match update {
            StageUpdate::ProsCons(text) => {
                assert!(text.starts_with("Error generating analysis with the language model:"));
                assert!(text.contains("connection refused"));
                assert!(text.contains("Analysis for AAPL as a growth investment:"));
                assert!(text.contains("Pros:"));
                assert!(text.contains("Cons:"));
                assert!(text.contains("simplified fallback analysis"));
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn test_fallback_shape() {
        let text = fallback_narrative("TSLA", AnalysisType::Momentum, "timeout");
        assert!(text.contains("timeout"));
        assert!(text.contains("Analysis for TSLA as a momentum investment:"));
        assert!(text.contains("- Market volatility may affect short-term performance"));
        assert!(text.ends_with(
            "Note: This is a simplified fallback analysis produced without the language model."
        ));
    }
}
