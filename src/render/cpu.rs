use rayon::prelude::*;

use crate::buffer::output::OutputBuffer;
use crate::foundation::core::Int2;
use crate::foundation::error::{ViewerError, ViewerResult};
use crate::render::backend::{BackendKind, RenderSettings, SinkBackend};
use crate::sink::kernels::{output_texel, shade, source_texel};
use crate::sink::plan::{SinkInputs, SinkPlan};

/// Host backend: output rows are processed in parallel, each texel written at most once.
pub struct CpuBackend {
    pool: Option<rayon::ThreadPool>,
}

impl CpuBackend {
    /// Create a backend, building a dedicated pool when `settings.threads` is set.
    pub fn new(settings: &RenderSettings) -> ViewerResult<Self> {
        let pool = match settings.threads {
            Some(n) => Some(build_thread_pool(n)?),
            None => None,
        };
        Ok(Self { pool })
    }
}

impl SinkBackend for CpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn execute_pass(
        &mut self,
        plan: &SinkPlan,
        inputs: &SinkInputs<'_>,
        output: &mut OutputBuffer,
    ) -> ViewerResult<()> {
        match &self.pool {
            Some(pool) => pool.install(|| write_rows(plan, inputs, output)),
            None => write_rows(plan, inputs, output),
        }
        Ok(())
    }
}

fn write_rows(plan: &SinkPlan, inputs: &SinkInputs<'_>, output: &mut OutputBuffer) {
    let out_domain = output.domain();
    let width = out_domain.width as usize;
    if width == 0 {
        return;
    }
    let SinkInputs { image, alpha } = *inputs;

    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            if y < plan.bounds.min.y || y > plan.bounds.max.y {
                return;
            }
            for (x, px) in row.iter_mut().enumerate() {
                let out = Int2::new(x as i32, y);
                let Some(texel) = source_texel(out, plan.domain, &plan.bounds, out_domain) else {
                    continue;
                };
                debug_assert_eq!(
                    output_texel(texel, plan.domain, &plan.bounds, out_domain),
                    Some(out)
                );
                *px = shade(plan.strategy, image, alpha, texel, plan.fill);
            }
        });
}

fn build_thread_pool(threads: usize) -> ViewerResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(ViewerError::validation(
            "render settings 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| ViewerError::backend(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
