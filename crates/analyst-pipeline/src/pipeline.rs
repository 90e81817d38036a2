//! Pipeline definition and construction

use analyst_core::{Error, Result, Stage};
use std::sync::Arc;

/// A fixed, ordered sequence of analysis stages
///
/// Pipelines are strictly linear: every stage runs exactly once, in the
/// order it was added, with no branching and no skipping. The stage list
/// is set through the builder and never changes afterwards.
///
/// # Example
///
/// ```no_run
/// use analyst_pipeline::Pipeline;
/// use std::sync::Arc;
///
/// # fn example(
/// #     fundamentals: Arc<dyn analyst_core::Stage>,
/// #     chart: Arc<dyn analyst_core::Stage>,
/// # ) -> analyst_core::Result<()> {
/// let pipeline = Pipeline::builder()
///     .add_stage(fundamentals)
///     .add_stage(chart)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    pub(crate) stages: Vec<Arc<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Number of stages in the pipeline
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the pipeline
    pub fn add_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the pipeline
    ///
    /// Fails with [`Error::EmptyPipeline`] when no stages were added.
    pub fn build(self) -> Result<Pipeline> {
        if self.stages.is_empty() {
            return Err(Error::EmptyPipeline);
        }
        Ok(Pipeline {
            stages: self.stages,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
