use std::ops::{Add, Sub};

/// RGBA pixel value as four `f32` channels, straight (non-premultiplied) alpha.
pub type Float4 = [f32; 4];

/// Integer 2D coordinate (texel position or extent).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Int2 {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Int2 {
    /// `(0, 0)`.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a coordinate from components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Same value in both components.
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v }
    }
}

impl Add for Int2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Int2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Logical pixel grid an operation iterates over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Domain {
    /// Domain of a single broadcast value.
    pub const SINGLE: Self = Self {
        width: 1,
        height: 1,
    };

    /// Create a domain of `width x height` pixels.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` for the degenerate 1x1 domain of a single value.
    pub fn is_single(self) -> bool {
        self == Self::SINGLE
    }

    /// Return `true` when the domain has no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels in the domain.
    pub fn len(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Return `true` when `texel` lies in `[0, width) x [0, height)`.
    pub fn contains(self, texel: Int2) -> bool {
        texel.x >= 0
            && texel.y >= 0
            && (texel.x as i64) < i64::from(self.width)
            && (texel.y as i64) < i64::from(self.height)
    }

    /// Row-major index of an in-domain texel.
    pub fn index_of(self, texel: Int2) -> Option<usize> {
        if !self.contains(texel) {
            return None;
        }
        Some((texel.y as usize) * (self.width as usize) + texel.x as usize)
    }

    /// Extent as a signed coordinate, saturating at `i32::MAX`.
    pub fn size(self) -> Int2 {
        Int2::new(
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

/// Sub-rectangle of the output that one invocation writes.
///
/// Both `min` and `max` are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Lowest writable output texel.
    pub min: Int2,
    /// Highest writable output texel.
    pub max: Int2,
}

impl Bounds {
    /// Create bounds from corners.
    pub const fn new(min: Int2, max: Int2) -> Self {
        Self { min, max }
    }

    /// Return `true` when `texel` lies in `[min, max]` on both axes.
    pub fn contains(&self, texel: Int2) -> bool {
        texel.x >= self.min.x
            && texel.y >= self.min.y
            && texel.x <= self.max.x
            && texel.y <= self.max.y
    }
}

/// Externally defined compositing rectangle, `xmax`/`ymax` exclusive of the size computation
/// (`size = max - min`).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CompositingRegion {
    /// Left edge.
    pub xmin: i32,
    /// Bottom edge.
    pub ymin: i32,
    /// Right edge.
    pub xmax: i32,
    /// Top edge.
    pub ymax: i32,
}

impl CompositingRegion {
    /// Create a region from its corners.
    pub const fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Lower-left corner.
    pub fn origin(&self) -> Int2 {
        Int2::new(self.xmin, self.ymin)
    }

    /// Upper corner, `origin + size`.
    pub fn max(&self) -> Int2 {
        Int2::new(self.xmax, self.ymax)
    }

    /// Region extent; negative extents clamp to zero.
    pub fn size(&self) -> Domain {
        let w = i64::from(self.xmax) - i64::from(self.xmin);
        let h = i64::from(self.ymax) - i64::from(self.ymin);
        Domain::new(
            w.clamp(0, i64::from(u32::MAX)) as u32,
            h.clamp(0, i64::from(u32::MAX)) as u32,
        )
    }

    /// Return `true` when the region has a positive area.
    pub fn is_valid(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
