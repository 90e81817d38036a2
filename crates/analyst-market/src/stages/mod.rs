//! Pipeline stage implementations
//!
//! Each stage wraps one capability trait from [`crate::providers`] and
//! contributes one field of the analysis state. Fundamentals and chart
//! failures abort the ticker; narrative and news degrade in place so a
//! report still comes out.

pub mod chart;
pub mod fundamentals;
pub mod narrative;
pub mod news;

pub use chart::ChartStage;
pub use fundamentals::FundamentalsStage;
pub use narrative::NarrativeStage;
pub use news::NewsStage;
