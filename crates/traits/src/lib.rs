pub mod capture;
pub mod readiness;
pub mod sink;

pub use capture::{
    CaptureError, CaptureOptions, CaptureSource, DisplayItem, LinkMarker, RasterImage, Rasterizer,
};
pub use readiness::{FontLoadLatch, FontReadiness, ReadinessError};
pub use sink::{
    validate_file_name, DocumentSink, InMemoryDocumentSink, SaveError, SavedDocument,
    SharedDocumentData,
};
