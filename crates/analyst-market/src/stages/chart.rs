//! Chart stage

use crate::providers::ChartRenderer;
use analyst_core::{AnalysisState, Result, Stage, StageKind, StageUpdate};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Renders the price chart for the ticker under analysis
///
/// The chart file is part of the report contract, so a render failure
/// aborts the ticker.
pub struct ChartStage {
    renderer: Arc<dyn ChartRenderer>,
    output_dir: PathBuf,
}

impl ChartStage {
    pub fn new(renderer: Arc<dyn ChartRenderer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Stage for ChartStage {
    fn kind(&self) -> StageKind {
        StageKind::Chart
    }

    async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
        let path = self
            .renderer
            .render_price_chart(state.ticker(), &self.output_dir)
            .await?;
        debug!(ticker = %state.ticker(), path = %path.display(), "chart rendered");
        Ok(StageUpdate::Charts(vec![path]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::providers::MockChartRenderer;
    use analyst_core::AnalysisType;
    use std::path::Path;

    fn state() -> AnalysisState {
        AnalysisState::new("MSFT", AnalysisType::General, "")
    }

    #[tokio::test]
    async fn test_produces_chart_update() {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render_price_chart()
            .withf(|ticker, dir| ticker == "MSFT" && dir == Path::new("charts"))
            .returning(|ticker, dir| Ok(dir.join(format!("{ticker}_chart.png"))));

        let stage = ChartStage::new(Arc::new(renderer), "charts");
        assert_eq!(stage.kind(), StageKind::Chart);

        let update = stage.run(&state()).await.unwrap();
        match update {
            StageUpdate::Charts(paths) => {
                assert_eq!(paths, vec![PathBuf::from("charts/MSFT_chart.png")]);
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_error_aborts_the_stage() {
        let mut renderer = MockChartRenderer::new();
        renderer.expect_render_price_chart().returning(|ticker, _| {
            Err(MarketError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "no price history to chart".to_string(),
            })
        });

        let stage = ChartStage::new(Arc::new(renderer), "charts");
        let err = stage.run(&state()).await.unwrap_err();
        assert!(err.to_string().contains("no price history"));
    }
}
