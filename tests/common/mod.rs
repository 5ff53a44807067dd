#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trialsheet::{
    CaptureError, CaptureOptions, CaptureSource, DocumentSink, ExportConfig, ExportedDocument,
    ExporterBuilder, InMemoryDocumentSink, RasterImage, Rasterizer, SaveError,
    SavedDocument, ViewTree,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// The outcome of an export into an in-memory sink.
pub struct ExportRun {
    pub document: ExportedDocument,
    pub pdf: GeneratedPdf,
    pub sink: Arc<InMemoryDocumentSink>,
}

/// Defaults with the settle delay removed so tests don't sleep.
pub fn test_config() -> ExportConfig {
    ExportConfig { settle_delay_ms: 0, ..Default::default() }
}

/// Exports `view` into a fresh in-memory sink and loads the resulting PDF.
pub async fn export_to_memory(
    view: ViewTree,
    identifier: &str,
    config: ExportConfig,
) -> Result<ExportRun, Box<dyn std::error::Error>> {
    let sink = Arc::new(InMemoryDocumentSink::new());
    let exporter = ExporterBuilder::new().with_config(config).with_sink(sink.clone()).build()?;
    let document = exporter.export(Arc::new(view), identifier).await?;
    let bytes = sink
        .get(&document.file_name)
        .ok_or("exported document missing from sink")?;
    let pdf = GeneratedPdf::from_bytes(bytes.to_vec())?;
    Ok(ExportRun { document, pdf, sink })
}

/// Returns a solid image of a fixed size regardless of the requested scale.
#[derive(Debug)]
pub struct FixedSizeRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Rasterizer for FixedSizeRasterizer {
    fn rasterize(
        &self,
        _source: &dyn CaptureSource,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        let pixel = image::Rgba(options.background.to_rgba8());
        Ok(RasterImage::new(image::RgbaImage::from_pixel(self.width, self.height, pixel)))
    }

    fn name(&self) -> &'static str {
        "FixedSizeRasterizer"
    }
}

#[derive(Debug)]
pub struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize(
        &self,
        _source: &dyn CaptureSource,
        _options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureError> {
        Err(CaptureError::Rasterizer("canvas is tainted".to_string()))
    }

    fn name(&self) -> &'static str {
        "FailingRasterizer"
    }
}

/// A sink that rejects every document and counts the attempts.
#[derive(Debug, Default)]
pub struct RejectingSink {
    pub attempts: AtomicUsize,
}

impl DocumentSink for RejectingSink {
    fn save(&self, file_name: &str, _bytes: &[u8]) -> Result<SavedDocument, SaveError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SaveError::Rejected {
            file_name: file_name.to_string(),
            reason: "download blocked".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "RejectingSink"
    }
}

/// Accepts only `.pdf` documents; everything else is rejected.
#[derive(Debug, Default)]
pub struct PdfOnlySink {
    pub inner: InMemoryDocumentSink,
}

impl DocumentSink for PdfOnlySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, SaveError> {
        if !file_name.ends_with(".pdf") {
            return Err(SaveError::Rejected {
                file_name: file_name.to_string(),
                reason: "only PDF documents are accepted".to_string(),
            });
        }
        self.inner.save(file_name, bytes)
    }

    fn name(&self) -> &'static str {
        "PdfOnlySink"
    }
}

/// Asserts that `result` failed with the given `ExportError` variant pattern.
#[macro_export]
macro_rules! assert_export_error {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err(ref e) => assert!(matches!(e, $pattern), "unexpected error: {:?}", e),
            Ok(ref doc) => panic!("expected an error, export produced {:?}", doc),
        }
    };
}
