use crate::error::RenderError;
use crate::types::{DocumentInfo, LinkAnnotation, PageGeometry};
use image::RgbImage;
use lopdf::ObjectId;
use std::io::{Seek, Write};

/// A trait for document renderers, abstracting the PDF-writing primitives.
pub trait DocumentRenderer<W: Write + Seek + Send> {
    fn begin_document(&mut self, writer: W, info: &DocumentInfo) -> Result<(), RenderError>;

    /// Registers an image as a page resource and returns its XObject id.
    fn add_image(&mut self, image: &RgbImage) -> Result<ObjectId, RenderError>;

    /// Writes a content stream that paints `image_id` over the whole page.
    fn render_page_content(
        &mut self,
        image_id: ObjectId,
        page: &PageGeometry,
    ) -> Result<ObjectId, RenderError>;

    fn add_link_annotations(
        &mut self,
        links: &[LinkAnnotation],
        page: &PageGeometry,
    ) -> Result<Vec<ObjectId>, RenderError>;

    fn write_page_object(
        &mut self,
        content_stream_ids: Vec<ObjectId>,
        annotations: Vec<ObjectId>,
        page: &PageGeometry,
    ) -> Result<ObjectId, RenderError>;

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError>;
}
