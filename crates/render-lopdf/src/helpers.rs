//! Standalone helpers for building the PDF objects of an image page: the image XObject,
//! the content stream that paints it, URI link annotations and the `/Info` dictionary.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, Stream, StringFormat};
use std::io::Write;
use trialsheet_render_core::utils::to_pdf_rect;
use trialsheet_render_core::{DocumentInfo, LinkAnnotation, PageGeometry, RenderError};

/// Compresses raw pixel data with zlib for a `/FlateDecode` stream.
fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    encoder.finish().map_err(|e| RenderError::Image(e.to_string()))
}

/// Builds a DeviceRGB image XObject stream from 8-bit RGB pixels.
pub fn image_xobject(image: &RgbImage) -> Result<Stream, RenderError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(RenderError::Image("cannot embed an empty image".into()));
    }
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width() as i64,
        "Height" => image.height() as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, deflate(image.as_raw())?))
}

/// Content that stretches the named XObject over the full page.
pub fn full_page_image_content(xobject_name: &str, page: &PageGeometry) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page.width().into(),
                    0.into(),
                    0.into(),
                    page.height().into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(xobject_name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// Builds a borderless `/Link` annotation with a `/URI` action.
pub fn link_annotation(link: &LinkAnnotation, page: &PageGeometry) -> Dictionary {
    let rect: Vec<Object> = to_pdf_rect(&link.rect, page.height())
        .into_iter()
        .map(Object::from)
        .collect();
    let action = dictionary! {
        "Type" => "Action",
        "S" => "URI",
        "URI" => Object::String(link.url.as_str().as_bytes().to_vec(), StringFormat::Literal),
    };
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => action,
    }
}

pub fn info_dictionary(info: &DocumentInfo) -> Dictionary {
    let mut dict = dictionary! {
        "Title" => text_string(&info.title),
        "Producer" => text_string(&info.producer),
    };
    if let Some(date) = &info.creation_date {
        dict.set("CreationDate", Object::String(date.as_bytes().to_vec(), StringFormat::Literal));
    }
    dict
}

/// Encodes a PDF text string: ASCII as a literal, anything else as UTF-16BE with a BOM.
pub fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}
