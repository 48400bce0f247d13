use crate::buffer::pixel::{PixelBuffer, Precision};
use crate::foundation::core::{Bounds, Domain, Float4};
use crate::sink::config::SinkConfig;
use crate::sink::kernels::clear_color;
use crate::sink::resolve::{resolve_bounds, resolve_domain};
use crate::sink::strategy::{Strategy, select_strategy};

/// The two sockets of the viewer, borrowed for one invocation.
#[derive(Clone, Copy, Debug)]
pub struct SinkInputs<'a> {
    /// "Image" socket.
    pub image: &'a PixelBuffer,
    /// "Alpha" socket.
    pub alpha: &'a PixelBuffer,
}

impl<'a> SinkInputs<'a> {
    /// Bundle both sockets.
    pub fn new(image: &'a PixelBuffer, alpha: &'a PixelBuffer) -> Self {
        Self { image, alpha }
    }
}

/// Everything a backend needs besides the inputs themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkPlan {
    /// Chosen strategy.
    pub strategy: Strategy,
    /// Texel grid to iterate.
    pub domain: Domain,
    /// Writable output rectangle.
    pub bounds: Bounds,
    /// Constant written by `Clear`; unused by other strategies.
    pub fill: Float4,
    /// Precision tag the output inherits.
    pub precision: Precision,
    /// Non-color tag the output inherits.
    pub non_color: bool,
}

/// Resolve domain and bounds, then select a strategy. Pure; never fails.
pub fn compile_plan(inputs: &SinkInputs<'_>, config: &SinkConfig) -> SinkPlan {
    let domain = resolve_domain(inputs, config);
    let bounds = resolve_bounds(domain, config);
    let strategy = select_strategy(inputs.image, inputs.alpha, config);
    let fill = match strategy {
        Strategy::Clear => clear_color(inputs.image, inputs.alpha, config),
        _ => [0.0; 4],
    };
    SinkPlan {
        strategy,
        domain,
        bounds,
        fill,
        precision: inputs.image.precision(),
        non_color: inputs.image.is_non_color_data(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sink/plan.rs"]
mod tests;
