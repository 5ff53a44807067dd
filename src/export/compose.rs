//! Contain-fit composition of a raster capture onto the fixed-size page canvas.

use crate::error::ExportError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, RgbImage};
use std::io::Cursor;
use trialsheet_render_core::RenderError;
use trialsheet_traits::CaptureError;
use trialsheet_types::{Color, ContainFit, Rect, Size};

/// The page-sized canvas with the capture drawn on it, plus the fit that placed it.
#[derive(Debug, Clone)]
pub struct PageCanvas {
    pub image: RgbaImage,
    pub fit: ContainFit,
}

/// Scales `raster` uniformly to fit inside a `page_width` x `page_height` canvas filled with
/// `background`, centered on the free axis.
pub fn compose_page(
    raster: &RgbaImage,
    page_width: u32,
    page_height: u32,
    background: Color,
) -> Result<PageCanvas, ExportError> {
    let source = Size::from(raster.dimensions());
    let target = Size::from((page_width, page_height));
    let fit = ContainFit::compute(source, target).ok_or(CaptureError::EmptySource {
        width: source.width,
        height: source.height,
    })?;

    let mut canvas = RgbaImage::from_pixel(page_width, page_height, Rgba(background.to_rgba8()));

    let scaled_width = (fit.scaled.width.round() as u32).clamp(1, page_width);
    let scaled_height = (fit.scaled.height.round() as u32).clamp(1, page_height);
    let scaled = imageops::resize(raster, scaled_width, scaled_height, FilterType::Triangle);
    imageops::overlay(
        &mut canvas,
        &scaled,
        fit.offset_x.round() as i64,
        fit.offset_y.round() as i64,
    );

    log::debug!(
        "Placed {}x{} capture at ({:.1}, {:.1}) scaled {:.4} onto {}x{} page",
        raster.width(),
        raster.height(),
        fit.offset_x,
        fit.offset_y,
        fit.scale,
        page_width,
        page_height
    );

    Ok(PageCanvas { image: canvas, fit })
}

impl PageCanvas {
    /// Draws a `thickness`-pixel border just inside `rect`, clipped to the canvas.
    pub fn outline(&mut self, rect: &Rect, color: Color, thickness: u32) {
        let t = thickness as f32;
        let edges = [
            Rect::new(rect.x, rect.y, rect.width, t),
            Rect::new(rect.x, rect.bottom() - t, rect.width, t),
            Rect::new(rect.x, rect.y, t, rect.height),
            Rect::new(rect.right() - t, rect.y, t, rect.height),
        ];
        let pixel = Rgba(color.to_rgba8());
        for edge in &edges {
            fill_rect(&mut self.image, edge, pixel);
        }
    }

    /// The canvas without its alpha channel, as embedded in the PDF.
    pub fn to_rgb(&self) -> RgbImage {
        DynamicImage::ImageRgba8(self.image.clone()).into_rgb8()
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| RenderError::Image(e.to_string()))?;
        Ok(bytes)
    }
}

fn fill_rect(image: &mut RgbaImage, rect: &Rect, pixel: Rgba<u8>) {
    let bounds = Rect::new(0.0, 0.0, image.width() as f32, image.height() as f32);
    let Some(clipped) = rect.intersection(&bounds) else {
        return;
    };
    let x0 = clipped.x.floor() as u32;
    let y0 = clipped.y.floor() as u32;
    let x1 = (clipped.right().ceil() as u32).min(image.width());
    let y1 = (clipped.bottom().ceil() as u32).min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, pixel);
        }
    }
}
