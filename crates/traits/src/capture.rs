//! Capture abstractions: the element being exported and the rasterizer that turns it into pixels.
//!
//! Rasterization destroys structure, so a `CaptureSource` exposes its link markers separately
//! from its pixels. The exporter queries markers first, rasterizes second.

use image::RgbaImage;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use trialsheet_types::{Color, LinkId, LinkUrl, Rect, Size};

/// Error type for rasterization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Capture source has no area ({width}x{height})")]
    EmptySource { width: f32, height: f32 },

    #[error("Failed to allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u64, height: u64 },

    #[error("Rasterizer failed: {0}")]
    Rasterizer(String),
}

/// A region of the captured view that should stay clickable in the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkMarker {
    pub id: LinkId,
    /// Bounding rectangle in the same viewport-relative layout space as
    /// [`CaptureSource::bounding_rect`].
    pub rect: Rect,
    pub href: Option<String>,
    /// Explicit export target; takes precedence over `href` when non-empty.
    pub data_href: Option<String>,
}

impl LinkMarker {
    pub fn new(id: impl Into<LinkId>, rect: Rect, href: impl Into<String>) -> Self {
        Self { id: id.into(), rect, href: Some(href.into()), data_href: None }
    }

    /// The URL the annotation should target: `data_href` if present and non-empty, else `href`.
    pub fn resolved_url(&self) -> Option<LinkUrl> {
        self.data_href
            .as_deref()
            .and_then(LinkUrl::parse)
            .or_else(|| self.href.as_deref().and_then(LinkUrl::parse))
    }
}

/// One paint operation of a capture source, positioned in document coordinates
/// (viewport-relative layout position plus the current scroll offset).
#[derive(Debug, Clone)]
pub enum DisplayItem {
    Fill { rect: Rect, color: Color },
    Stroke { rect: Rect, color: Color, width: f32 },
    Image {
        rect: Rect,
        image: Arc<RgbaImage>,
        /// Loaded from another origin; only painted when the capture allows it.
        cross_origin: bool,
    },
}

/// A live, laid-out visual element that can be exported.
///
/// Implementations are read-only from the exporter's point of view.
pub trait CaptureSource: Send + Sync + Debug {
    /// The element's bounding rectangle, relative to the viewport.
    fn bounding_rect(&self) -> Rect;

    /// The element's inner layout size (`clientWidth` x `clientHeight`).
    fn client_size(&self) -> Size;

    /// Looks up a link marker by its stable identifier. Absent markers are not an error.
    fn find_link(&self, id: &LinkId) -> Option<LinkMarker>;

    /// The paint operations that make up the element, in document coordinates.
    fn display_list(&self) -> Vec<DisplayItem>;

    /// Physical pixels per layout unit reported by the host.
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Current vertical scroll offset of the host viewport.
    fn scroll_y(&self) -> f32 {
        0.0
    }
}

/// Parameters handed to a [`Rasterizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Raster pixels per layout unit.
    pub scale: f32,
    /// Opaque fill painted underneath the element.
    pub background: Color,
    /// Vertical scroll offset to compensate for, so the capture lines up with the element.
    pub scroll_y: f32,
    pub allow_cross_origin: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { scale: 1.0, background: Color::WHITE, scroll_y: 0.0, allow_cross_origin: true }
    }
}

/// Pixels produced by rasterizing a [`CaptureSource`].
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::from(self.pixels.dimensions())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Turns a capture source into pixels.
///
/// Rasterization is blocking, CPU-bound work; async callers run it on a blocking pool.
pub trait Rasterizer: Send + Sync + Debug {
    fn rasterize(
        &self,
        source: &dyn CaptureSource,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError>;

    /// Returns a human-readable name for this rasterizer (for logging/debugging).
    fn name(&self) -> &'static str;
}
