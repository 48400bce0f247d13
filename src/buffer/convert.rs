use anyhow::Context;

use crate::buffer::output::OutputBuffer;
use crate::buffer::pixel::PixelBuffer;
use crate::foundation::error::ViewerResult;

/// Decode encoded image bytes into a straight-alpha color buffer.
pub fn decode_color(bytes: &[u8]) -> ViewerResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    color_from_image(&dyn_img)
}

/// Decode encoded image bytes into a scalar buffer (luma channel).
pub fn decode_alpha(bytes: &[u8]) -> ViewerResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode alpha image from memory")?;
    alpha_from_image(&dyn_img)
}

/// Convert a decoded image into a color buffer.
pub fn color_from_image(img: &image::DynamicImage) -> ViewerResult<PixelBuffer> {
    let rgba = img.to_rgba32f();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .into_raw()
        .chunks_exact(4)
        .map(|px| [px[0], px[1], px[2], px[3]])
        .collect();
    PixelBuffer::color(width, height, pixels)
}

/// Convert a decoded image into a scalar buffer from its luma channel.
pub fn alpha_from_image(img: &image::DynamicImage) -> ViewerResult<PixelBuffer> {
    let luma = img.to_luma32f();
    let (width, height) = luma.dimensions();
    PixelBuffer::float(width, height, luma.into_raw())
}

/// Quantize an output buffer to straight-alpha RGBA8.
pub fn to_rgba8_image(out: &OutputBuffer) -> image::RgbaImage {
    let mut raw = Vec::with_capacity(out.pixels().len() * 4);
    for px in out.pixels() {
        for &c in px {
            raw.push(unit_to_u8(c));
        }
    }
    image::RgbaImage::from_raw(out.width(), out.height(), raw)
        .unwrap_or_else(|| image::RgbaImage::new(out.width(), out.height()))
}

fn unit_to_u8(v: f32) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/convert.rs"]
mod tests;
