//! Fundamentals stage

use crate::providers::FundamentalsProvider;
use analyst_core::{AnalysisState, Result, Stage, StageKind, StageUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Fetches the fundamental metric set for the ticker under analysis
///
/// The narrative stage builds its prompt from these metrics, so a
/// provider failure here aborts the ticker.
pub struct FundamentalsStage {
    provider: Arc<dyn FundamentalsProvider>,
}

impl FundamentalsStage {
    pub fn new(provider: Arc<dyn FundamentalsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Stage for FundamentalsStage {
    fn kind(&self) -> StageKind {
        StageKind::Fundamentals
    }

    async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
        let fundamentals = self.provider.fundamentals(state.ticker()).await?;
        debug!(ticker = %state.ticker(), "fetched fundamentals");
        Ok(StageUpdate::Fundamentals(fundamentals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::providers::MockFundamentalsProvider;
    use analyst_core::{AnalysisType, Fundamentals};

    fn state() -> AnalysisState {
        AnalysisState::new("AAPL", AnalysisType::Growth, "")
    }

    #[tokio::test]
    async fn test_produces_fundamentals_update() {
        let mut provider = MockFundamentalsProvider::new();
        provider.expect_fundamentals().returning(|_| {
            Ok(Fundamentals {
                pe_ratio: Some(28.5),
                ..Fundamentals::default()
            })
        });

        let stage = FundamentalsStage::new(Arc::new(provider));
        assert_eq!(stage.kind(), StageKind::Fundamentals);

        let update = stage.run(&state()).await.unwrap();
        match update {
            StageUpdate::Fundamentals(fundamentals) => {
                assert_eq!(fundamentals.pe_ratio, Some(28.5));
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_queries_the_state_ticker() {
        let mut provider = MockFundamentalsProvider::new();
        provider
            .expect_fundamentals()
            .withf(|ticker| ticker == "AAPL")
            .returning(|_| Ok(Fundamentals::default()));

        let stage = FundamentalsStage::new(Arc::new(provider));
        stage.run(&state()).await.unwrap();
    }

    #[tokio::test]
    async fn test_provider_error_aborts_the_stage() {
        let mut provider = MockFundamentalsProvider::new();
        provider.expect_fundamentals().returning(|ticker| {
            Err(MarketError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "empty quoteSummary result".to_string(),
            })
        });

        let stage = FundamentalsStage::new(Arc::new(provider));
        let err = stage.run(&state()).await.unwrap_err();
        assert!(err.to_string().contains("no data for AAPL"));
    }
}
