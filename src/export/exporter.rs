use super::compose::{compose_page, PageCanvas};
use super::config::ExportConfig;
use super::links::{discover_links, project_links, PageLinkRegion};
use super::naming::{debug_image_file_name, document_file_name};
use crate::error::ExportError;
use log::{debug, error, info, warn};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use trialsheet_render_core::{DocumentInfo, LinkAnnotation, PageGeometry};
use trialsheet_render_lopdf::LopdfRenderer;
use trialsheet_traits::{
    CaptureError, CaptureOptions, CaptureSource, DocumentSink, FontReadiness, RasterImage,
    Rasterizer, SavedDocument,
};
use trialsheet_types::{AxisTransform, Color, Size};

const DEBUG_OUTLINE_THICKNESS: u32 = 3;

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub file_name: String,
    /// Where the sink put the document.
    pub location: String,
    pub page_size: Size,
    /// Pixel size of the intermediate capture.
    pub raster_size: Size,
    /// The annotated regions, in annotation order.
    pub link_regions: Vec<PageLinkRegion>,
    pub byte_len: usize,
    /// Name of the debug PNG, when the overlay was enabled and saving it succeeded.
    pub debug_image: Option<String>,
}

/// Captures a rendered view and saves it as a single-page PDF with clickable links.
///
/// Exporters hold no per-export state; concurrent calls share nothing but the collaborators.
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    config: ExportConfig,
    rasterizer: Arc<dyn Rasterizer>,
    sink: Arc<dyn DocumentSink>,
    font_readiness: Option<Arc<dyn FontReadiness>>,
}

impl DocumentExporter {
    pub fn new(
        config: ExportConfig,
        rasterizer: Arc<dyn Rasterizer>,
        sink: Arc<dyn DocumentSink>,
        font_readiness: Option<Arc<dyn FontReadiness>>,
    ) -> Self {
        Self { config, rasterizer, sink, font_readiness }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `root` as `<prefix><identifier>.pdf`.
    ///
    /// Either exactly one document reaches the sink or an error is returned.
    pub async fn export(
        &self,
        root: Arc<dyn CaptureSource>,
        identifier: &str,
    ) -> Result<ExportedDocument, ExportError> {
        match self.run(root, identifier).await {
            Ok(document) => Ok(document),
            Err(e) => {
                error!("Export of '{}' failed: {}", identifier, e);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        root: Arc<dyn CaptureSource>,
        identifier: &str,
    ) -> Result<ExportedDocument, ExportError> {
        let file_name = document_file_name(&self.config.file_prefix, identifier)?;
        let started = Instant::now();

        self.stabilize().await;

        let links = discover_links(root.as_ref(), &self.config.link_ids);
        debug!("Discovered {} of {} link markers", links.len(), self.config.link_ids.len());

        let root_rect = root.bounding_rect();
        if root_rect.is_empty() {
            return Err(CaptureError::EmptySource {
                width: root_rect.width,
                height: root_rect.height,
            }
            .into());
        }

        let raster = self.rasterize(Arc::clone(&root)).await?;
        let raster_size = raster.size();
        let client_size = root.client_size();
        let dom_to_raster = AxisTransform::measured(raster_size, client_size).ok_or(
            CaptureError::EmptySource { width: client_size.width, height: client_size.height },
        )?;
        debug!(
            "Captured {}x{} pixels for a {}x{} layout (ratio {:.4} x {:.4}) in {:.2?}",
            raster.width(),
            raster.height(),
            client_size.width,
            client_size.height,
            dom_to_raster.scale_x,
            dom_to_raster.scale_y,
            started.elapsed()
        );

        let page_width = self.config.page_width;
        let page_height = self.config.page_height;
        let background = self.config.background;
        let debug_overlay = self.config.debug_overlay;
        let title = format!("Clinical trial {}", identifier);

        let (pdf, png, link_regions) = tokio::task::spawn_blocking(
            move || -> Result<(Vec<u8>, Option<Vec<u8>>, Vec<PageLinkRegion>), ExportError> {
                let mut canvas =
                    compose_page(raster.pixels(), page_width, page_height, background)?;
                let regions = project_links(&links, &dom_to_raster, &canvas.fit.as_transform());
                let png = if debug_overlay {
                    Some(debug_page(&mut canvas, &regions)?)
                } else {
                    None
                };
                let pdf = render_pdf(&canvas, &regions, title)?;
                Ok((pdf, png, regions))
            },
        )
        .await??;

        let byte_len = pdf.len();
        let saved = self.save(file_name, pdf).await?;
        info!(
            "Saved '{}' ({} bytes, {} links) to {} in {:.2?}",
            saved.file_name,
            byte_len,
            link_regions.len(),
            saved.location,
            started.elapsed()
        );

        let debug_image = match png {
            Some(png) => self.save_debug_image(identifier, png).await,
            None => None,
        };

        Ok(ExportedDocument {
            file_name: saved.file_name,
            location: saved.location,
            page_size: self.config.page_size(),
            raster_size,
            link_regions,
            byte_len,
            debug_image,
        })
    }

    /// Waits for fonts (bounded) and then for the settle delay. Never fails.
    async fn stabilize(&self) {
        if let Some(readiness) = &self.font_readiness {
            let timeout = self.config.font_wait_timeout();
            match tokio::time::timeout(timeout, readiness.wait_until_ready()).await {
                Ok(Ok(())) => debug!("Fonts ready"),
                Ok(Err(e)) => warn!("Font readiness failed, continuing: {}", e),
                Err(_) => warn!("Fonts not ready after {:?}, continuing", timeout),
            }
        }

        let delay = self.config.settle_delay();
        if !delay.is_zero() {
            debug!("Waiting {:?} for the view to settle", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn rasterize(&self, root: Arc<dyn CaptureSource>) -> Result<RasterImage, ExportError> {
        let options = CaptureOptions {
            scale: self.config.capture_scale(root.device_pixel_ratio()),
            background: self.config.background,
            scroll_y: root.scroll_y(),
            allow_cross_origin: true,
        };
        let rasterizer = Arc::clone(&self.rasterizer);
        debug!("Rasterizing with '{}' at scale {}", rasterizer.name(), options.scale);

        let raster =
            tokio::task::spawn_blocking(move || rasterizer.rasterize(root.as_ref(), &options))
                .await??;
        if raster.is_empty() {
            return Err(CaptureError::EmptySource {
                width: raster.width() as f32,
                height: raster.height() as f32,
            }
            .into());
        }
        Ok(raster)
    }

    async fn save(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<SavedDocument, ExportError> {
        let sink = Arc::clone(&self.sink);
        let saved = tokio::task::spawn_blocking(move || sink.save(&file_name, &bytes)).await??;
        Ok(saved)
    }

    async fn save_debug_image(&self, identifier: &str, png: Vec<u8>) -> Option<String> {
        let name = match debug_image_file_name(&self.config.file_prefix, identifier) {
            Ok(name) => name,
            Err(e) => {
                warn!("Skipping debug image: {}", e);
                return None;
            }
        };
        match self.save(name, png).await {
            Ok(saved) => {
                info!("Saved debug image '{}' to {}", saved.file_name, saved.location);
                Some(saved.file_name)
            }
            Err(e) => {
                warn!("Failed to save debug image: {}", e);
                None
            }
        }
    }
}

fn debug_page(canvas: &mut PageCanvas, regions: &[PageLinkRegion]) -> Result<Vec<u8>, ExportError> {
    for region in regions {
        canvas.outline(&region.rect, Color::RED, DEBUG_OUTLINE_THICKNESS);
    }
    canvas.to_png()
}

fn render_pdf(
    canvas: &PageCanvas,
    regions: &[PageLinkRegion],
    title: String,
) -> Result<Vec<u8>, ExportError> {
    let annotations: Vec<LinkAnnotation> = regions.iter().map(PageLinkRegion::to_annotation).collect();
    let page = PageGeometry { size: canvas.fit.target };
    let info = DocumentInfo {
        title,
        producer: format!("trialsheet {}", env!("CARGO_PKG_VERSION")),
        creation_date: Some(chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    };
    Ok(LopdfRenderer::<Cursor<Vec<u8>>>::render_image_page(&canvas.to_rgb(), &annotations, &page, &info)?)
}
