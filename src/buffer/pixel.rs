use crate::foundation::core::{Domain, Float4, Int2};
use crate::foundation::error::{ViewerError, ViewerResult};

/// Storage precision of a pixel buffer.
///
/// Pixels are always held as `f32` here; the precision is metadata that the output inherits from
/// the color input.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 16-bit float storage upstream.
    Half,
    /// 32-bit float storage upstream.
    #[default]
    Full,
}

/// Pixel payload of a [`PixelBuffer`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PixelData {
    /// Four-channel color pixels, row-major.
    Color(Vec<Float4>),
    /// Scalar pixels, row-major.
    Float(Vec<f32>),
}

impl PixelData {
    fn len(&self) -> usize {
        match self {
            PixelData::Color(v) => v.len(),
            PixelData::Float(v) => v.len(),
        }
    }
}

/// Read-only pixel stream handed to the sink by upstream nodes.
///
/// A single-value buffer holds exactly one pixel that is broadcast over any domain; its logical
/// size is 1x1.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    single_value: bool,
    precision: Precision,
    non_color: bool,
    data: PixelData,
}

impl PixelBuffer {
    /// Build a color buffer of `width x height` pixels.
    pub fn color(width: u32, height: u32, pixels: Vec<Float4>) -> ViewerResult<Self> {
        Self::from_data(width, height, PixelData::Color(pixels))
    }

    /// Build a scalar buffer of `width x height` pixels.
    pub fn float(width: u32, height: u32, values: Vec<f32>) -> ViewerResult<Self> {
        Self::from_data(width, height, PixelData::Float(values))
    }

    fn from_data(width: u32, height: u32, data: PixelData) -> ViewerResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ViewerError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(ViewerError::validation(format!(
                "pixel buffer expects {expected} pixels for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            single_value: false,
            precision: Precision::Full,
            non_color: false,
            data,
        })
    }

    /// A color buffer holding one broadcast value.
    pub fn single_color(color: Float4) -> Self {
        Self {
            width: 1,
            height: 1,
            single_value: true,
            precision: Precision::Full,
            non_color: false,
            data: PixelData::Color(vec![color]),
        }
    }

    /// A scalar buffer holding one broadcast value.
    pub fn single_float(value: f32) -> Self {
        Self {
            width: 1,
            height: 1,
            single_value: true,
            precision: Precision::Full,
            non_color: false,
            data: PixelData::Float(vec![value]),
        }
    }

    /// Unlinked "Image" socket value: opaque black.
    pub fn default_image() -> Self {
        Self::single_color([0.0, 0.0, 0.0, 1.0])
    }

    /// Unlinked "Alpha" socket value: fully opaque.
    pub fn default_alpha() -> Self {
        Self::single_float(1.0)
    }

    /// Return the buffer with the given precision tag.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Return the buffer with the given non-color-data tag.
    pub fn with_non_color_data(mut self, non_color: bool) -> Self {
        self.non_color = non_color;
        self
    }

    /// Logical width (1 for single values).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height (1 for single values).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Logical extent.
    pub fn domain(&self) -> Domain {
        Domain::new(self.width, self.height)
    }

    /// Whether the buffer is one broadcast pixel.
    pub fn is_single_value(&self) -> bool {
        self.single_value
    }

    /// Upstream storage precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Whether the pixels carry non-color data (normals, masks, ...).
    pub fn is_non_color_data(&self) -> bool {
        self.non_color
    }

    fn slot(&self, texel: Int2) -> Option<usize> {
        if self.single_value {
            return Some(0);
        }
        self.domain().index_of(texel)
    }

    /// Load `texel` as a color.
    ///
    /// Single values broadcast; texels outside the extent read as zero. Scalars expand to
    /// `(v, v, v, 1)`.
    pub fn load_color(&self, texel: Int2) -> Float4 {
        let Some(idx) = self.slot(texel) else {
            return [0.0; 4];
        };
        match &self.data {
            PixelData::Color(px) => px[idx],
            PixelData::Float(v) => float_to_color(v[idx]),
        }
    }

    /// Load `texel` as a scalar.
    ///
    /// Single values broadcast; texels outside the extent read as zero. Colors reduce to the mean
    /// of their RGB channels.
    pub fn load_float(&self, texel: Int2) -> f32 {
        let Some(idx) = self.slot(texel) else {
            return 0.0;
        };
        match &self.data {
            PixelData::Color(px) => color_to_float(px[idx]),
            PixelData::Float(v) => v[idx],
        }
    }

    /// The broadcast color of a single-value buffer (first pixel otherwise).
    pub fn single_color_value(&self) -> Float4 {
        self.load_color(Int2::ZERO)
    }

    /// The broadcast scalar of a single-value buffer (first pixel otherwise).
    pub fn single_float_value(&self) -> f32 {
        self.load_float(Int2::ZERO)
    }

    /// All pixels as colors, row-major, in the buffer's own extent.
    pub fn to_color_plane(&self) -> Vec<Float4> {
        match &self.data {
            PixelData::Color(px) => px.clone(),
            PixelData::Float(v) => v.iter().copied().map(float_to_color).collect(),
        }
    }

    /// All pixels as scalars, row-major, in the buffer's own extent.
    pub fn to_float_plane(&self) -> Vec<f32> {
        match &self.data {
            PixelData::Color(px) => px.iter().copied().map(color_to_float).collect(),
            PixelData::Float(v) => v.clone(),
        }
    }
}

pub(crate) fn float_to_color(v: f32) -> Float4 {
    [v, v, v, 1.0]
}

pub(crate) fn color_to_float(c: Float4) -> f32 {
    (c[0] + c[1] + c[2]) / 3.0
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
