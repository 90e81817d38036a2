//! News stage

use crate::providers::NewsProvider;
use analyst_core::{AnalysisState, NewsArticle, Result, Stage, StageKind, StageUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Fetches recent headlines for the ticker under analysis
///
/// News is supplementary, so a provider failure records a single
/// error-marker article instead of aborting the run.
pub struct NewsStage {
    provider: Arc<dyn NewsProvider>,
}

impl NewsStage {
    pub fn new(provider: Arc<dyn NewsProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Stage for NewsStage {
    fn kind(&self) -> StageKind {
        StageKind::News
    }

    async fn run(&self, state: &AnalysisState) -> Result<StageUpdate> {
        let articles = match self.provider.news(state.ticker()).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(
                    ticker = %state.ticker(),
                    error = %e,
                    "news fetch failed, recording the error"
                );
                vec![NewsArticle::new(format!("Error fetching news: {e}"), "")]
            }
        };

        Ok(StageUpdate::News(articles))
    }
}
