//! Viewer sink: the terminal stage of an image-compositing node graph.
//!
//! One invocation consumes an "Image" color buffer and an "Alpha" scalar buffer, and writes the
//! result in place into a caller-owned [`OutputBuffer`].
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: inputs + [`SinkConfig`] -> [`Domain`] and [`Bounds`]
//! 2. **Select**: inputs + config -> one [`Strategy`] (`Clear`, `IgnoreAlpha`, `Copy`, `SetAlpha`)
//! 3. **Execute**: a [`SinkBackend`] (CPU by default, GPU with the `gpu` feature) writes the
//!    strategy over the bounds
//!
//! Steps 1 and 2 are pure and produce a [`SinkPlan`]; [`ViewerSink`] wraps all three and skips
//! composite outputs whose compositing region is empty.
//!
//! Both backends share the same clipping rule: input texel `t` in the domain is written to
//! `t + bounds.min` only when that lies inside `bounds` (inclusive) and inside the output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod foundation;
mod sink;

/// Execution backends.
pub mod render;

pub use buffer::convert::{
    alpha_from_image, color_from_image, decode_alpha, decode_color, to_rgba8_image,
};
pub use buffer::output::OutputBuffer;
pub use buffer::pixel::{PixelBuffer, Precision};
pub use foundation::core::{Bounds, CompositingRegion, Domain, Float4, Int2};
pub use foundation::error::{ViewerError, ViewerResult};
pub use render::backend::{
    BackendKind, RenderSettings, SinkBackend, create_backend, execute_plan,
};
pub use render::cpu::CpuBackend;
#[cfg(feature = "gpu")]
pub use render::gpu::GpuBackend;
pub use sink::config::SinkConfig;
pub use sink::kernels::{clear_color, opaque, output_texel, passthrough, set_alpha, shade};
pub use sink::plan::{SinkInputs, SinkPlan, compile_plan};
pub use sink::resolve::{resolve_bounds, resolve_domain};
pub use sink::strategy::{Strategy, select_strategy};
pub use sink::viewer::{SinkOutcome, ViewerSink};
