use trialsheet_types::Rect;

/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Converts a top-left based page rectangle into a PDF `[llx lly urx ury]` rectangle.
pub fn to_pdf_rect(rect: &Rect, page_height: f32) -> [f32; 4] {
    [
        rect.x,
        flip_y(rect.bottom(), page_height),
        rect.right(),
        flip_y(rect.y, page_height),
    ]
}
