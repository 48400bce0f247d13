//! Backend-agnostic per-pixel math and the shared clipping rule.
//!
//! The WGSL kernel in `render::gpu` mirrors these functions one-to-one.

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{Bounds, Domain, Float4, Int2};
use crate::sink::config::SinkConfig;
use crate::sink::strategy::Strategy;

/// The single color a `Clear` writes.
///
/// Ignore-alpha forces opacity; otherwise a linked alpha input overrides the image alpha.
pub fn clear_color(image: &PixelBuffer, alpha: &PixelBuffer, config: &SinkConfig) -> Float4 {
    let mut color = image.single_color_value();
    if config.ignore_alpha {
        color[3] = 1.0;
    } else if config.alpha_input_is_linked {
        color[3] = alpha.single_float_value();
    }
    color
}

/// `IgnoreAlpha`: keep RGB, alpha = 1.
pub fn opaque(color: Float4) -> Float4 {
    [color[0], color[1], color[2], 1.0]
}

/// `Copy`: unchanged.
pub fn passthrough(color: Float4) -> Float4 {
    color
}

/// `SetAlpha`: image RGB with the alpha input's value.
pub fn set_alpha(color: Float4, alpha: f32) -> Float4 {
    [color[0], color[1], color[2], alpha]
}

/// Output value of `strategy` at input `texel`.
///
/// `fill` is the precomputed [`clear_color`], only read by `Clear`.
pub fn shade(
    strategy: Strategy,
    image: &PixelBuffer,
    alpha: &PixelBuffer,
    texel: Int2,
    fill: Float4,
) -> Float4 {
    match strategy {
        Strategy::Clear => fill,
        Strategy::IgnoreAlpha => opaque(image.load_color(texel)),
        Strategy::Copy => passthrough(image.load_color(texel)),
        Strategy::SetAlpha => set_alpha(image.load_color(texel), alpha.load_float(texel)),
    }
}

/// Where input `texel` lands in the output, or `None` if the write is clipped.
///
/// A write happens iff `texel` is inside `domain`, `texel + bounds.min` is inside `bounds`, and the
/// target exists in an `output`-sized buffer.
pub fn output_texel(texel: Int2, domain: Domain, bounds: &Bounds, output: Domain) -> Option<Int2> {
    if !domain.contains(texel) {
        return None;
    }
    let out = texel + bounds.min;
    (bounds.contains(out) && output.contains(out)).then_some(out)
}

/// Inverse of [`output_texel`]: the input texel that writes output `out`, if any.
pub fn source_texel(out: Int2, domain: Domain, bounds: &Bounds, output: Domain) -> Option<Int2> {
    if !output.contains(out) || !bounds.contains(out) {
        return None;
    }
    let texel = out - bounds.min;
    domain.contains(texel).then_some(texel)
}

#[cfg(test)]
#[path = "../../tests/unit/sink/kernels.rs"]
mod tests;
