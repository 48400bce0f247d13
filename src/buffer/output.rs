use crate::buffer::pixel::Precision;
use crate::foundation::core::{Domain, Float4, Int2};
use crate::sink::plan::SinkPlan;

/// Caller-owned target of the sink, written in place.
///
/// The sink only writes texels inside the resolved bounds; everything else keeps whatever the
/// caller put there.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputBuffer {
    width: u32,
    height: u32,
    precision: Precision,
    non_color: bool,
    pixels: Vec<Float4>,
}

impl OutputBuffer {
    /// Allocate a zero-filled buffer.
    pub fn new(domain: Domain, precision: Precision, non_color: bool) -> Self {
        Self::filled(domain, precision, non_color, [0.0; 4])
    }

    /// Allocate a buffer with every pixel set to `value`.
    pub fn filled(domain: Domain, precision: Precision, non_color: bool, value: Float4) -> Self {
        Self {
            width: domain.width,
            height: domain.height,
            precision,
            non_color,
            pixels: vec![value; domain.len()],
        }
    }

    /// Allocate the buffer a plan writes into, tagged like the color input.
    ///
    /// Large enough to hold the domain shifted by a non-negative `bounds.min`, so a composite
    /// region away from the origin is not clipped away entirely.
    pub fn for_plan(plan: &SinkPlan) -> Self {
        let shift = |min: i32| u32::try_from(min).unwrap_or(0);
        let domain = Domain::new(
            plan.domain.width.saturating_add(shift(plan.bounds.min.x)),
            plan.domain.height.saturating_add(shift(plan.bounds.min.y)),
        );
        Self::new(domain, plan.precision, plan.non_color)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Extent as a domain.
    pub fn domain(&self) -> Domain {
        Domain::new(self.width, self.height)
    }

    /// Precision tag inherited from the color input.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Non-color-data tag inherited from the color input.
    pub fn is_non_color_data(&self) -> bool {
        self.non_color
    }

    /// Pixel at `(x, y)`, `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Float4> {
        self.domain()
            .index_of(Int2::new(x, y))
            .map(|idx| self.pixels[idx])
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Float4] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    pub fn pixels_mut(&mut self) -> &mut [Float4] {
        &mut self.pixels
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/output.rs"]
mod tests;
