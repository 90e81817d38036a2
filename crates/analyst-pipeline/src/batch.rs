//! Batch execution across multiple tickers

use crate::executor::PipelineFailure;
use crate::pipeline::Pipeline;
use analyst_core::{AnalysisState, AnalysisType};
use tracing::{error, info};

/// Ticker analyzed when a batch is started without any usable symbols
pub const DEFAULT_TICKER: &str = "AAPL";

/// Normalize raw ticker input into the list the batch will run
///
/// Entries are trimmed and uppercased, empties are dropped, and duplicates
/// collapse to their first occurrence so input order is preserved. When
/// nothing survives, the default ticker is substituted. Normalizing an
/// already-normalized list returns it unchanged.
pub fn normalize_tickers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tickers: Vec<String> = Vec::new();
    for entry in raw {
        let ticker = entry.as_ref().trim().to_uppercase();
        if ticker.is_empty() || tickers.contains(&ticker) {
            continue;
        }
        tickers.push(ticker);
    }
    if tickers.is_empty() {
        tickers.push(DEFAULT_TICKER.to_string());
    }
    tickers
}

/// What happened to one ticker in a batch
#[derive(Debug)]
pub enum TickerOutcome {
    /// The pipeline ran to completion
    Completed(AnalysisState),
    /// The pipeline aborted at some stage
    Failed(PipelineFailure),
}

impl TickerOutcome {
    /// The ticker this outcome belongs to
    pub fn ticker(&self) -> &str {
        match self {
            Self::Completed(state) => state.ticker(),
            Self::Failed(failure) => &failure.ticker,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Success tally for a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Tickers whose pipeline ran to completion
    pub succeeded: usize,
    /// Tickers the batch attempted
    pub attempted: usize,
}

/// Per-ticker outcomes of a batch run, in the order the tickers ran
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<TickerOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[TickerOutcome] {
        &self.outcomes
    }

    /// Final states of the tickers that completed, in run order
    pub fn completed(&self) -> impl Iterator<Item = &AnalysisState> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TickerOutcome::Completed(state) => Some(state),
            TickerOutcome::Failed(_) => None,
        })
    }

    /// Failures recorded during the run, in run order
    pub fn failures(&self) -> impl Iterator<Item = &PipelineFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TickerOutcome::Completed(_) => None,
            TickerOutcome::Failed(failure) => Some(failure),
        })
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            succeeded: self.outcomes.iter().filter(|o| o.is_completed()).count(),
            attempted: self.outcomes.len(),
        }
    }
}

/// Runs the pipeline once per ticker, sequentially
///
/// Each ticker gets a fresh state; nothing carries over between tickers.
/// A failed ticker is recorded and the batch moves on, so one bad symbol
/// never takes down the rest of the run.
pub struct BatchRunner {
    pipeline: Pipeline,
}

impl BatchRunner {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Analyze every ticker in `tickers` (after normalization)
    pub async fn run<I, S>(
        &self,
        tickers: I,
        analysis_type: AnalysisType,
        custom_prompt: &str,
    ) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tickers = normalize_tickers(tickers);
        info!(count = tickers.len(), "starting batch analysis");

        let mut outcomes = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            info!(%ticker, "analyzing ticker");
            let initial = AnalysisState::new(&ticker, analysis_type, custom_prompt);

            match self.pipeline.execute(initial).await {
                Ok(state) => outcomes.push(TickerOutcome::Completed(state)),
                Err(failure) => {
                    error!(%ticker, stage = %failure.stage, error = %failure.error, "analysis failed");
                    outcomes.push(TickerOutcome::Failed(failure));
                }
            }
        }

        BatchReport { outcomes }
    }
}
