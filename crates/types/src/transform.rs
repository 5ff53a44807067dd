//! Axis-aligned affine maps between the three coordinate spaces an export walks through:
//! layout units of the captured element, pixels of the raster capture, and page units.
//!
//! Each stage is a pure `(scale, offset)` pair so link rectangles can be replayed through the
//! exact transform that was applied to the pixels.

use crate::geometry::{Rect, Size};

/// `p' = offset + p * scale`, applied independently per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for AxisTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AxisTransform {
    pub fn identity() -> Self {
        Self { scale_x: 1.0, scale_y: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }

    pub fn scale(scale_x: f32, scale_y: f32) -> Self {
        Self { scale_x, scale_y, offset_x: 0.0, offset_y: 0.0 }
    }

    /// The ratio between a capture's pixel dimensions and the layout dimensions it was taken
    /// from. Measured rather than derived from the requested scale factor, because rasterizers
    /// round surface sizes to whole pixels.
    ///
    /// Returns `None` when the layout size is empty.
    pub fn measured(raster: Size, layout: Size) -> Option<Self> {
        if layout.is_empty() {
            return None;
        }
        Some(Self::scale(raster.width / layout.width, raster.height / layout.height))
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.offset_x + rect.x * self.scale_x,
            self.offset_y + rect.y * self.scale_y,
            rect.width * self.scale_x,
            rect.height * self.scale_y,
        )
    }

    /// Composes two stages: the result maps a point through `self` first, then `next`.
    pub fn then(&self, next: &AxisTransform) -> AxisTransform {
        AxisTransform {
            scale_x: self.scale_x * next.scale_x,
            scale_y: self.scale_y * next.scale_y,
            offset_x: next.offset_x + self.offset_x * next.scale_x,
            offset_y: next.offset_y + self.offset_y * next.scale_y,
        }
    }
}

/// A "contain" fit of a source surface inside a target surface: uniform scale, no cropping,
/// centered on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainFit {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Size of the source after scaling.
    pub scaled: Size,
    pub target: Size,
}

impl ContainFit {
    /// Returns `None` if either surface has no area.
    pub fn compute(source: Size, target: Size) -> Option<Self> {
        if source.is_empty() || target.is_empty() {
            return None;
        }
        let scale = (target.width / source.width).min(target.height / source.height);
        let scaled = source.scale(scale);
        Some(Self {
            scale,
            offset_x: (target.width - scaled.width) / 2.0,
            offset_y: (target.height - scaled.height) / 2.0,
            scaled,
            target,
        })
    }

    pub fn as_transform(&self) -> AxisTransform {
        AxisTransform {
            scale_x: self.scale,
            scale_y: self.scale,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// The area of the target covered by the scaled source.
    pub fn placement(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.scaled.width, self.scaled.height)
    }
}
