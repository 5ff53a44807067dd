use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Information about a link annotation
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub rect: [f32; 4],
    pub uri: String,
    pub has_border: bool,
}

fn resolve<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Object> {
    match object.as_reference() {
        Ok(id) => doc.get_object(id).ok(),
        Err(_) => Some(object),
    }
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, object)?.as_dict().ok()
}

fn page_dict(doc: &LopdfDocument, page_num: u32) -> Option<&Dictionary> {
    let page_id = *doc.get_pages().get(&page_num)?;
    doc.get_dictionary(page_id).ok()
}

fn number_array(object: &Object) -> Option<Vec<f32>> {
    object.as_array().ok()?.iter().map(|o| o.as_float().ok()).collect()
}

/// Extract the URI link annotations of a page, in annotation order
pub fn extract_link_annotations(doc: &LopdfDocument, page_num: u32) -> Vec<LinkAnnotation> {
    let Some(page) = page_dict(doc, page_num) else {
        return Vec::new();
    };
    let Some(annots) = page.get(b"Annots").ok().and_then(|a| resolve(doc, a)) else {
        return Vec::new();
    };
    let Ok(annots) = annots.as_array() else {
        return Vec::new();
    };

    let mut annotations = Vec::new();
    for annot in annots {
        let Some(annot) = resolve_dict(doc, annot) else {
            continue;
        };
        if annot.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Link".as_slice()) {
            continue;
        }
        let Some(action) = annot.get(b"A").ok().and_then(|a| resolve_dict(doc, a)) else {
            continue;
        };
        if action.get(b"S").and_then(Object::as_name).ok() != Some(b"URI".as_slice()) {
            continue;
        }
        let uri = action
            .get(b"URI")
            .and_then(Object::as_str)
            .map(|s| String::from_utf8_lossy(s).to_string())
            .unwrap_or_default();
        let rect = annot
            .get(b"Rect")
            .ok()
            .and_then(number_array)
            .filter(|r| r.len() == 4)
            .map(|r| [r[0], r[1], r[2], r[3]])
            .unwrap_or_default();
        let has_border = annot
            .get(b"Border")
            .ok()
            .and_then(number_array)
            .is_none_or(|border| border.iter().any(|w| *w != 0.0));
        annotations.push(LinkAnnotation { rect, uri, has_border });
    }
    annotations
}

/// Get page dimensions (width, height) in user units
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let media_box = number_array(page_dict(doc, page_num)?.get(b"MediaBox").ok()?)?;
    if media_box.len() < 4 {
        return None;
    }
    Some((media_box[2] - media_box[0], media_box[3] - media_box[1]))
}

/// Width and height of every image XObject referenced by the page resources
pub fn image_sizes(doc: &LopdfDocument, page_num: u32) -> Vec<(i64, i64)> {
    let Some(resources) = page_dict(doc, page_num)
        .and_then(|p| p.get(b"Resources").ok())
        .and_then(|r| resolve_dict(doc, r))
    else {
        return Vec::new();
    };
    let Some(xobjects) = resources.get(b"XObject").ok().and_then(|x| resolve_dict(doc, x)) else {
        return Vec::new();
    };
    xobjects
        .iter()
        .filter_map(|(_, object)| resolve(doc, object)?.as_stream().ok())
        .filter(|stream| stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice()))
        .filter_map(|stream| {
            let width = stream.dict.get(b"Width").and_then(Object::as_i64).ok()?;
            let height = stream.dict.get(b"Height").and_then(Object::as_i64).ok()?;
            Some((width, height))
        })
        .collect()
}

/// The `/Title` entry of the document information dictionary
pub fn document_title(doc: &LopdfDocument) -> Option<String> {
    let info = resolve_dict(doc, doc.trailer.get(b"Info").ok()?)?;
    let title = info.get(b"Title").and_then(Object::as_str).ok()?;
    Some(String::from_utf8_lossy(title).to_string())
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert page dimensions within tolerance
#[macro_export]
macro_rules! assert_pdf_page_size {
    ($pdf:expr, $page:expr, $width:expr, $height:expr) => {
        let dims = $crate::common::pdf_assertions::get_page_dimensions(&$pdf.doc, $page);
        assert!(dims.is_some(), "Could not get dimensions for page {}", $page);
        let (w, h) = dims.unwrap();
        assert!(
            (w - $width).abs() < 1.0,
            "Page {} width expected ~{}, got {}",
            $page,
            $width,
            w
        );
        assert!(
            (h - $height).abs() < 1.0,
            "Page {} height expected ~{}, got {}",
            $page,
            $height,
            h
        );
    };
}

/// Assert the number of URI link annotations on a page
#[macro_export]
macro_rules! assert_pdf_link_count {
    ($pdf:expr, $page:expr, $count:expr) => {
        let links = $crate::common::pdf_assertions::extract_link_annotations(&$pdf.doc, $page);
        assert_eq!(
            links.len(),
            $count,
            "Expected {} links on page {}, got {:?}",
            $count,
            $page,
            links
        );
    };
}

/// Assert an annotation rectangle matches `[llx, lly, urx, ury]` within tolerance
#[macro_export]
macro_rules! assert_pdf_rect_near {
    ($actual:expr, $expected:expr) => {
        let actual: [f32; 4] = $actual;
        let expected: [f32; 4] = $expected;
        assert!(
            actual.iter().zip(expected.iter()).all(|(a, e)| (a - e).abs() < 0.01),
            "Rect expected ~{:?}, got {:?}",
            expected,
            actual
        );
    };
}
