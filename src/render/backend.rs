use crate::buffer::output::OutputBuffer;
use crate::foundation::error::{ViewerError, ViewerResult};
use crate::sink::plan::{SinkInputs, SinkPlan};

/// Available backend kinds.
///
/// - `Cpu` is always available.
/// - `Gpu` requires the `gpu` cargo feature and a usable adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Data-parallel host loop (rayon).
    #[default]
    Cpu,
    /// Compute dispatch through `wgpu`.
    Gpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Worker threads for the CPU backend. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl RenderSettings {
    /// Return settings with an explicit worker count.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

/// Executes a compiled [`SinkPlan`] into an output buffer.
///
/// Implementations only supply the iteration/dispatch shell; the pixel math and clipping rule
/// live in `sink::kernels`.
pub trait SinkBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Write `plan` over its bounds into `output`, leaving every other texel untouched.
    fn execute_pass(
        &mut self,
        plan: &SinkPlan,
        inputs: &SinkInputs<'_>,
        output: &mut OutputBuffer,
    ) -> ViewerResult<()>;
}

/// Create a backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> ViewerResult<Box<dyn SinkBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(settings)?)),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(crate::render::gpu::GpuBackend::new(settings))),
        #[allow(unreachable_patterns)]
        _ => Err(ViewerError::backend(
            "requested backend is not available (build with the `gpu` feature)",
        )),
    }
}

/// Run `plan` on `backend`. Empty domains and empty outputs are a no-op.
#[tracing::instrument(
    skip_all,
    fields(
        strategy = plan.strategy.name(),
        domain = ?plan.domain,
        bounds = ?plan.bounds,
    )
)]
pub fn execute_plan<B: SinkBackend + ?Sized>(
    backend: &mut B,
    plan: &SinkPlan,
    inputs: &SinkInputs<'_>,
    output: &mut OutputBuffer,
) -> ViewerResult<()> {
    if plan.domain.is_empty() || output.domain().is_empty() {
        tracing::debug!("nothing to write");
        return Ok(());
    }
    backend.execute_pass(plan, inputs, output)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
