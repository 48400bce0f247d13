use crate::buffer::output::OutputBuffer;
use crate::foundation::error::ViewerResult;
use crate::render::backend::{BackendKind, RenderSettings, SinkBackend, create_backend, execute_plan};
use crate::sink::config::SinkConfig;
use crate::sink::plan::{SinkInputs, SinkPlan, compile_plan};

/// Result of one viewer invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkOutcome {
    /// The plan was executed into the output.
    Written(SinkPlan),
    /// Composite output with an empty compositing region; the output was not touched.
    Skipped,
}

/// The viewer node operation: plan, then execute on the owned backend.
pub struct ViewerSink {
    backend: Box<dyn SinkBackend>,
}

impl ViewerSink {
    /// Create a sink on a freshly created backend.
    pub fn new(kind: BackendKind, settings: &RenderSettings) -> ViewerResult<Self> {
        Ok(Self::with_backend(create_backend(kind, settings)?))
    }

    /// Create a sink on an existing backend.
    pub fn with_backend(backend: Box<dyn SinkBackend>) -> Self {
        Self { backend }
    }

    /// Kind of the backend in use.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Compile the plan for an invocation, or `None` when the invocation must be skipped.
    pub fn plan(&self, inputs: &SinkInputs<'_>, config: &SinkConfig) -> Option<SinkPlan> {
        if config.treat_as_composite_output && !config.compositing_region.is_valid() {
            tracing::debug!(
                region = ?config.compositing_region,
                "skipping viewer: invalid compositing region"
            );
            return None;
        }
        Some(compile_plan(inputs, config))
    }

    /// Run one invocation into the caller's `output`.
    #[tracing::instrument(skip_all, fields(backend = ?self.backend.kind()))]
    pub fn execute(
        &mut self,
        inputs: &SinkInputs<'_>,
        config: &SinkConfig,
        output: &mut OutputBuffer,
    ) -> ViewerResult<SinkOutcome> {
        let Some(plan) = self.plan(inputs, config) else {
            return Ok(SinkOutcome::Skipped);
        };
        execute_plan(self.backend.as_mut(), &plan, inputs, output)?;
        Ok(SinkOutcome::Written(plan))
    }

    /// Run one invocation into a freshly allocated, zero-filled output.
    pub fn render(
        &mut self,
        inputs: &SinkInputs<'_>,
        config: &SinkConfig,
    ) -> ViewerResult<Option<OutputBuffer>> {
        let Some(plan) = self.plan(inputs, config) else {
            return Ok(None);
        };
        let mut output = OutputBuffer::for_plan(&plan);
        execute_plan(self.backend.as_mut(), &plan, inputs, &mut output)?;
        Ok(Some(output))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sink/viewer.rs"]
mod tests;
