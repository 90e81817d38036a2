//! Analysis state and per-stage updates
//!
//! `AnalysisState` is the record that accumulates through a pipeline run.
//! The identity of a run (ticker, analysis type, custom prompt) is fixed at
//! construction; the remaining fields start empty and are filled in one at a
//! time as stages complete. Stages never touch the state directly: each one
//! returns a [`StageUpdate`] and the executor merges it with
//! [`AnalysisState::apply`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The lens applied to a stock analysis
///
/// This is a closed set. Parsing accepts the lowercase names (leading and
/// trailing whitespace and ASCII case are forgiven) and anything else is an
/// [`crate::Error::InvalidAnalysisType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Growth,
    Value,
    #[default]
    General,
    Dividend,
    Momentum,
}

impl AnalysisType {
    /// Lowercase name, as used in prompts and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Value => "value",
            Self::General => "general",
            Self::Dividend => "dividend",
            Self::Momentum => "momentum",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "growth" => Ok(Self::Growth),
            "value" => Ok(Self::Value),
            "general" => Ok(Self::General),
            "dividend" => Ok(Self::Dividend),
            "momentum" => Ok(Self::Momentum),
            other => Err(crate::Error::InvalidAnalysisType(other.to_string())),
        }
    }
}

/// Fundamental metrics for a ticker
///
/// The metric set is fixed. A metric the data source could not supply is
/// `None`, never a missing key, so every report and prompt shows the same
/// five labels. The serde names match the labels used in rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "Market Cap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "P/E Ratio")]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<f64>,
    #[serde(rename = "EPS")]
    pub eps: Option<f64>,
    #[serde(rename = "Debt-to-Equity")]
    pub debt_to_equity: Option<f64>,
}

impl Fundamentals {
    /// The five metrics as (label, value) pairs, in display order
    pub fn metrics(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("Market Cap", self.market_cap),
            ("P/E Ratio", self.pe_ratio),
            ("Revenue", self.revenue),
            ("EPS", self.eps),
            ("Debt-to-Equity", self.debt_to_equity),
        ]
    }

    /// True when no metric carries a value
    pub fn is_empty(&self) -> bool {
        self.metrics().iter().all(|(_, value)| value.is_none())
    }
}

/// A single news headline with its source link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Identifies a pipeline stage and the state field it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Fundamentals,
    Chart,
    Narrative,
    News,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fundamentals => "fundamentals",
            Self::Chart => "chart",
            Self::Narrative => "narrative",
            Self::News => "news",
        };
        f.write_str(name)
    }
}

/// The partial result produced by one stage
///
/// Each variant maps to exactly one accumulator field of
/// [`AnalysisState`], so a stage cannot overwrite another stage's output.
#[derive(Debug, Clone, PartialEq)]
pub enum StageUpdate {
    Fundamentals(Fundamentals),
    Charts(Vec<PathBuf>),
    ProsCons(String),
    News(Vec<NewsArticle>),
}

impl StageUpdate {
    /// The stage this update belongs to
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Fundamentals(_) => StageKind::Fundamentals,
            Self::Charts(_) => StageKind::Chart,
            Self::ProsCons(_) => StageKind::Narrative,
            Self::News(_) => StageKind::News,
        }
    }
}

/// The record accumulated over one pipeline run for one ticker
///
/// # Example
///
/// ```
/// use analyst_core::{AnalysisState, AnalysisType, Fundamentals, StageUpdate};
///
/// let state = AnalysisState::new("AAPL", AnalysisType::Growth, "");
/// let state = state.apply(StageUpdate::Fundamentals(Fundamentals {
///     pe_ratio: Some(28.5),
///     ..Fundamentals::default()
/// }));
///
/// assert_eq!(state.ticker(), "AAPL");
/// assert_eq!(state.fundamentals().pe_ratio, Some(28.5));
/// assert!(state.charts().is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisState {
    ticker: String,
    analysis_type: AnalysisType,
    custom_prompt: String,
    fundamentals: Fundamentals,
    charts: Vec<PathBuf>,
    pros_cons: String,
    news: Vec<NewsArticle>,
}

impl AnalysisState {
    /// Create a fresh state for one ticker
    ///
    /// All accumulator fields start empty.
    pub fn new(
        ticker: impl Into<String>,
        analysis_type: AnalysisType,
        custom_prompt: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            analysis_type,
            custom_prompt: custom_prompt.into(),
            fundamentals: Fundamentals::default(),
            charts: Vec::new(),
            pros_cons: String::new(),
            news: Vec::new(),
        }
    }

    // =========== Identity (fixed at construction) ===========

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn custom_prompt(&self) -> &str {
        &self.custom_prompt
    }

    // =========== Accumulators (written via apply) ===========

    pub fn fundamentals(&self) -> &Fundamentals {
        &self.fundamentals
    }

    pub fn charts(&self) -> &[PathBuf] {
        &self.charts
    }

    pub fn pros_cons(&self) -> &str {
        &self.pros_cons
    }

    pub fn news(&self) -> &[NewsArticle] {
        &self.news
    }

    /// Merge one stage's update, consuming the previous state
    ///
    /// Each update replaces the single field owned by its stage and leaves
    /// every other field untouched.
    pub fn apply(mut self, update: StageUpdate) -> Self {
        match update {
            StageUpdate::Fundamentals(fundamentals) => self.fundamentals = fundamentals,
            StageUpdate::Charts(charts) => self.charts = charts,
            StageUpdate::ProsCons(text) => self.pros_cons = text,
            StageUpdate::News(articles) => self.news = articles,
        }
        self
    }
}
