use trialsheet_types::{LinkUrl, Rect, Size};

/// A clickable region on a page, in top-left based page units.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub url: LinkUrl,
}

/// Metadata written into the document's `/Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// A PDF date string (`D:YYYYMMDDHHmmSS+HH'mm'`).
    pub creation_date: Option<String>,
}

/// Placement of a full-bleed image on a page of the given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub size: Size,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Size::new(width, height) }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }
}
