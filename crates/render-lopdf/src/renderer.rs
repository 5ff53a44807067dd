use crate::helpers;
use crate::writer::StreamingPdfWriter;
use image::RgbImage;
use lopdf::{dictionary, Object, ObjectId};
use std::io::{Cursor, Seek, Write};
use trialsheet_render_core::{DocumentInfo, DocumentRenderer, LinkAnnotation, PageGeometry, RenderError};

/// A PDF renderer using the `lopdf` library that streams image data straight to the output.
pub struct LopdfRenderer<W: Write + Seek + Send> {
    pub(crate) writer: Option<StreamingPdfWriter<W>>,
    image_names: Vec<(ObjectId, String)>,
}

impl<W: Write + Seek + Send> Default for LopdfRenderer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek + Send> LopdfRenderer<W> {
    pub fn new() -> Self {
        Self { writer: None, image_names: Vec::new() }
    }

    fn writer_mut(&mut self) -> Result<&mut StreamingPdfWriter<W>, RenderError> {
        self.writer
            .as_mut()
            .ok_or_else(|| RenderError::Other("Document not started".into()))
    }

    fn image_name(&self, image_id: ObjectId) -> Result<&str, RenderError> {
        self.image_names
            .iter()
            .find(|(id, _)| *id == image_id)
            .map(|(_, name)| name.as_str())
            .ok_or_else(|| RenderError::Other(format!("Unknown image object {:?}", image_id)))
    }
}

impl LopdfRenderer<Cursor<Vec<u8>>> {
    /// Renders a single page showing `image` full-bleed with the given link annotations,
    /// returning the finished PDF bytes.
    pub fn render_image_page(
        image: &RgbImage,
        links: &[LinkAnnotation],
        page: &PageGeometry,
        info: &DocumentInfo,
    ) -> Result<Vec<u8>, RenderError> {
        let mut renderer: Box<Self> = Box::new(Self::new());
        renderer.begin_document(Cursor::new(Vec::new()), info)?;
        let image_id = renderer.add_image(image)?;
        let content_id = renderer.render_page_content(image_id, page)?;
        let annotations = renderer.add_link_annotations(links, page)?;
        let page_id = renderer.write_page_object(vec![content_id], annotations, page)?;
        let cursor = renderer.finish(vec![page_id])?;
        Ok(cursor.into_inner())
    }
}

impl<W: Write + Seek + Send + 'static> DocumentRenderer<W> for LopdfRenderer<W> {
    fn begin_document(&mut self, writer: W, info: &DocumentInfo) -> Result<(), RenderError> {
        let mut pdf_writer = StreamingPdfWriter::new(writer, "1.7")?;
        pdf_writer.set_info(helpers::info_dictionary(info));
        self.writer = Some(pdf_writer);
        self.image_names.clear();
        Ok(())
    }

    fn add_image(&mut self, image: &RgbImage) -> Result<ObjectId, RenderError> {
        let stream = helpers::image_xobject(image)?;
        let name = format!("Im{}", self.image_names.len() + 1);
        let writer = self.writer_mut()?;
        let image_id = writer.write_object(Object::Stream(stream))?;
        writer.register_xobject(&name, image_id);
        log::debug!(
            "Embedded {}x{} page image as /{} ({:?})",
            image.width(),
            image.height(),
            name,
            image_id
        );
        self.image_names.push((image_id, name));
        Ok(image_id)
    }

    fn render_page_content(
        &mut self,
        image_id: ObjectId,
        page: &PageGeometry,
    ) -> Result<ObjectId, RenderError> {
        let content = helpers::full_page_image_content(self.image_name(image_id)?, page).encode()?;
        let content_id = self.writer_mut()?.write_content_stream(content)?;
        Ok(content_id)
    }

    fn add_link_annotations(
        &mut self,
        links: &[LinkAnnotation],
        page: &PageGeometry,
    ) -> Result<Vec<ObjectId>, RenderError> {
        let writer = self.writer_mut()?;
        Ok(links
            .iter()
            .map(|link| writer.buffer_object(helpers::link_annotation(link, page).into()))
            .collect())
    }

    fn write_page_object(
        &mut self,
        content_stream_ids: Vec<ObjectId>,
        annotations: Vec<ObjectId>,
        page: &PageGeometry,
    ) -> Result<ObjectId, RenderError> {
        let writer = self.writer_mut()?;

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width().into(), page.height().into()],
            "Contents" => Object::Array(content_stream_ids.into_iter().map(Object::Reference).collect()),
            "Resources" => writer.resources_id,
        };
        if !annotations.is_empty() {
            page_dict.set(
                "Annots",
                Object::Array(annotations.into_iter().map(Object::Reference).collect()),
            );
        }

        let page_id = writer.write_object(page_dict.into())?;
        Ok(page_id)
    }

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError> {
        let mut renderer = *self;
        let mut writer = renderer.writer.take().ok_or_else(|| {
            RenderError::Other("Document was never started with begin_document".into())
        })?;
        writer.set_page_ids(page_ids);
        Ok(writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialsheet_types::{LinkUrl, Rect};

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Clinical trial NCT06189391".into(),
            producer: "trialsheet".into(),
            creation_date: None,
        }
    }

    #[test]
    fn renders_loadable_single_page_pdf() {
        let image = RgbImage::from_pixel(124, 175, image::Rgb([255, 255, 255]));
        let page = PageGeometry::new(1240.0, 1754.0);
        let links = vec![LinkAnnotation {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            url: LinkUrl::parse("https://example.com").unwrap(),
        }];

        let bytes = LopdfRenderer::<Cursor<Vec<u8>>>::render_image_page(&image, &links, &page, &info()).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.7"));
        assert!(text.trim_end().ends_with("%%EOF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_dict = doc.get_dictionary(pages[&1]).unwrap();
        let annots = page_dict.get(b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 1);
    }

    #[test]
    fn page_without_links_has_no_annots_entry() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0]));
        let page = PageGeometry::new(100.0, 200.0);
        let bytes = LopdfRenderer::<Cursor<Vec<u8>>>::render_image_page(&image, &[], &page, &info()).unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let page_dict = doc.get_dictionary(doc.get_pages()[&1]).unwrap();
        assert!(page_dict.get(b"Annots").is_err());
    }

    #[test]
    fn page_content_paints_the_image_full_page() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0]));
        let page = PageGeometry::new(100.0, 200.0);
        let bytes = LopdfRenderer::<Cursor<Vec<u8>>>::render_image_page(&image, &[], &page, &info()).unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let raw = doc.get_page_content(doc.get_pages()[&1]).unwrap();
        let content = lopdf::content::Content::decode(&raw).unwrap();
        let operators: Vec<&str> = content.operations.iter().map(|op| op.operator.as_str()).collect();
        assert!(operators.contains(&"cm"));
        assert!(operators.contains(&"Do"));
    }

    #[test]
    fn content_for_unknown_image_fails() {
        let mut renderer: LopdfRenderer<Cursor<Vec<u8>>> = LopdfRenderer::new();
        renderer.begin_document(Cursor::new(Vec::new()), &info()).unwrap();
        let result = renderer.render_page_content((99, 0), &PageGeometry::new(10.0, 10.0));
        assert!(matches!(result, Err(RenderError::Other(_))));
    }

    #[test]
    fn finishing_unstarted_document_fails() {
        let renderer: Box<LopdfRenderer<Cursor<Vec<u8>>>> = Box::new(LopdfRenderer::new());
        assert!(renderer.finish(vec![]).is_err());
    }
}
