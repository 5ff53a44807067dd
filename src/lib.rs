//! Exports a rendered clinical-trial summary view as a single-page PDF whose hyperlinks stay
//! clickable.
//!
//! The view is rasterized, fitted onto a fixed portrait page, and every link marker found on
//! the view is re-projected through the same transforms so its annotation lands on the pixels
//! that show it.

pub mod error;
pub mod export;
pub mod view;

pub use error::ExportError;
pub use export::{DocumentExporter, ExportConfig, ExportedDocument, ExporterBuilder, PageLinkRegion};
pub use view::{DisplayListRasterizer, ViewNode, ViewTree};

pub use trialsheet_sink::DirectorySink;
pub use trialsheet_traits::{
    CaptureError, CaptureOptions, CaptureSource, DisplayItem, DocumentSink, FontLoadLatch,
    FontReadiness, InMemoryDocumentSink, LinkMarker, RasterImage, Rasterizer, SaveError,
    SavedDocument,
};
pub use trialsheet_types::{AxisTransform, Color, ContainFit, LinkId, LinkUrl, Rect, Size};
