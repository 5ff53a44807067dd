use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use trialsheet_traits::{CaptureError, CaptureOptions, CaptureSource, DisplayItem, RasterImage, Rasterizer};
use trialsheet_types::{Color, Rect};

/// Largest surface edge, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 32_767;
/// Largest surface area, in pixels.
pub const DEFAULT_MAX_PIXELS: u64 = 268_435_456;

/// Paints a source's display list into an RGBA surface.
///
/// The surface covers the source's bounding rectangle at `options.scale` pixels per layout unit,
/// pre-filled with `options.background`. Items are painted in order with source-over blending.
#[derive(Debug, Clone)]
pub struct DisplayListRasterizer {
    max_dimension: u32,
    max_pixels: u64,
}

impl Default for DisplayListRasterizer {
    fn default() -> Self {
        Self { max_dimension: DEFAULT_MAX_DIMENSION, max_pixels: DEFAULT_MAX_PIXELS }
    }
}

impl DisplayListRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces above either limit fail with [`CaptureError::SurfaceAllocation`].
    pub fn with_limits(max_dimension: u32, max_pixels: u64) -> Self {
        Self { max_dimension, max_pixels }
    }

    fn allocate(&self, width: u64, height: u64, background: Color) -> Result<RgbaImage, CaptureError> {
        let too_large = width > u64::from(self.max_dimension)
            || height > u64::from(self.max_dimension)
            || width.saturating_mul(height) > self.max_pixels;
        if too_large {
            return Err(CaptureError::SurfaceAllocation { width, height });
        }
        // Bounded by `max_dimension` above.
        let (w, h) = (width as u32, height as u32);
        Ok(RgbaImage::from_pixel(w, h, Rgba(background.to_rgba8())))
    }
}

impl Rasterizer for DisplayListRasterizer {
    fn rasterize(
        &self,
        source: &dyn CaptureSource,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        let bounds = source.bounding_rect();
        if bounds.is_empty() {
            return Err(CaptureError::EmptySource { width: bounds.width, height: bounds.height });
        }
        let scale = options.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptureError::Rasterizer(format!("invalid capture scale {}", scale)));
        }

        let width = ((bounds.width * scale).round() as u64).max(1);
        let height = ((bounds.height * scale).round() as u64).max(1);
        let mut surface = self.allocate(width, height, options.background)?;

        // Display items are in document coordinates; the element's document origin is its
        // viewport position plus the scroll offset.
        let origin_x = bounds.x;
        let origin_y = bounds.y + options.scroll_y;
        let to_surface = |rect: &Rect| {
            Rect::new(
                (rect.x - origin_x) * scale,
                (rect.y - origin_y) * scale,
                rect.width * scale,
                rect.height * scale,
            )
        };

        let mut skipped = 0usize;
        for item in source.display_list() {
            match item {
                DisplayItem::Fill { rect, color } => {
                    fill_rect(&mut surface, &to_surface(&rect), color);
                }
                DisplayItem::Stroke { rect, color, width } => {
                    if width.is_nan() || width <= 0.0 {
                        continue;
                    }
                    stroke_rect(&mut surface, &to_surface(&rect), color, (width * scale).max(1.0));
                }
                DisplayItem::Image { rect, image, cross_origin } => {
                    if cross_origin && !options.allow_cross_origin {
                        skipped += 1;
                        continue;
                    }
                    draw_image(&mut surface, &to_surface(&rect), &image);
                }
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {} cross-origin image(s)", skipped);
        }

        Ok(RasterImage::new(surface))
    }

    fn name(&self) -> &'static str {
        "DisplayListRasterizer"
    }
}

/// Whole-pixel span covered by `rect`, clipped to the surface.
fn pixel_span(surface: &RgbaImage, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x.round().max(0.0);
    let y0 = rect.y.round().max(0.0);
    let x1 = rect.right().round().min(surface.width() as f32);
    let y1 = rect.bottom().round().min(surface.height() as f32);
    if x1 > x0 && y1 > y0 {
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    } else {
        None
    }
}

fn fill_rect(surface: &mut RgbaImage, rect: &Rect, color: Color) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };
    let pixel = Rgba(color.to_rgba8());
    let opaque = color.is_opaque();
    for y in y0..y1 {
        for x in x0..x1 {
            if opaque {
                surface.put_pixel(x, y, pixel);
            } else {
                surface.get_pixel_mut(x, y).blend(&pixel);
            }
        }
    }
}

fn stroke_rect(surface: &mut RgbaImage, rect: &Rect, color: Color, width: f32) {
    let w = width.min(rect.width / 2.0).min(rect.height / 2.0);
    if w <= 0.0 {
        return;
    }
    fill_rect(surface, &Rect::new(rect.x, rect.y, rect.width, w), color);
    fill_rect(surface, &Rect::new(rect.x, rect.bottom() - w, rect.width, w), color);
    fill_rect(surface, &Rect::new(rect.x, rect.y + w, w, rect.height - 2.0 * w), color);
    fill_rect(surface, &Rect::new(rect.right() - w, rect.y + w, w, rect.height - 2.0 * w), color);
}

fn draw_image(surface: &mut RgbaImage, rect: &Rect, image: &RgbaImage) {
    let width = rect.width.round();
    let height = rect.height.round();
    if width < 1.0 || height < 1.0 || image.width() == 0 || image.height() == 0 {
        return;
    }
    let (width, height) = (width as u32, height as u32);
    let x = rect.x.round() as i64;
    let y = rect.y.round() as i64;
    if image.dimensions() == (width, height) {
        imageops::overlay(surface, image, x, y);
    } else {
        let scaled = imageops::resize(image, width, height, FilterType::Triangle);
        imageops::overlay(surface, &scaled, x, y);
    }
}
