//! A serde-loadable display list that stands in for a rendered trial card.

use crate::error::ExportError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use trialsheet_traits::{CaptureSource, DisplayItem, LinkMarker};
use trialsheet_types::{Color, LinkId, Rect, Size};

fn default_device_pixel_ratio() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Color,
    pub width: f32,
}

/// A laid-out box. `rect` is in document coordinates (layout units from the top of the page).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewNode {
    /// Marker identifier; nodes whose id is a configured link id become link regions.
    pub id: Option<String>,
    pub rect: Rect,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub href: Option<String>,
    pub data_href: Option<String>,
    /// Image path, resolved relative to the view file by [`ViewTree::resolve_images`].
    pub image_src: Option<String>,
    pub cross_origin: bool,
    #[serde(skip)]
    pub image: Option<Arc<RgbaImage>>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(rect: Rect) -> Self {
        Self { rect, ..Default::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_border(mut self, color: Color, width: f32) -> Self {
        self.border = Some(Border { color, width });
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_data_href(mut self, data_href: impl Into<String>) -> Self {
        self.data_href = Some(data_href.into());
        self
    }

    pub fn with_image(mut self, image: Arc<RgbaImage>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    fn find(&self, id: &str) -> Option<&ViewNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn paint(&self, items: &mut Vec<DisplayItem>) {
        if let Some(color) = self.background {
            items.push(DisplayItem::Fill { rect: self.rect, color });
        }
        if let Some(image) = &self.image {
            items.push(DisplayItem::Image {
                rect: self.rect,
                image: Arc::clone(image),
                cross_origin: self.cross_origin,
            });
        }
        if let Some(border) = self.border {
            items.push(DisplayItem::Stroke { rect: self.rect, color: border.color, width: border.width });
        }
        for child in &self.children {
            child.paint(items);
        }
    }

    fn resolve_images(&mut self, base: &Path) -> usize {
        let mut failures = 0;
        if let (Some(src), None) = (&self.image_src, &self.image) {
            let path = base.join(src);
            match image::open(&path) {
                Ok(decoded) => self.image = Some(Arc::new(decoded.into_rgba8())),
                Err(e) => {
                    log::warn!("Failed to load image '{}': {}", path.display(), e);
                    failures += 1;
                }
            }
        }
        for child in &mut self.children {
            failures += child.resolve_images(base);
        }
        failures
    }
}

/// A rendered view: its root box plus the host state a capture depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTree {
    pub root: ViewNode,
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f32,
    /// Vertical scroll offset of the viewport, in layout units.
    #[serde(default)]
    pub scroll_y: f32,
}

impl ViewTree {
    pub fn new(root: ViewNode) -> Self {
        Self { root, device_pixel_ratio: 1.0, scroll_y: 0.0 }
    }

    pub fn with_scroll_y(mut self, scroll_y: f32) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a view and decodes its images relative to the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!("Failed to read view from '{}': {}", path.display(), e))
        })?;
        let mut tree = Self::from_json(&json)?;
        tree.resolve_images(path.parent().unwrap_or_else(|| Path::new("")));
        Ok(tree)
    }

    /// Decodes every `imageSrc` not yet loaded. Unreadable images are logged and left blank,
    /// the way a browser shows a broken image; returns how many failed.
    pub fn resolve_images(&mut self, base: &Path) -> usize {
        self.root.resolve_images(base)
    }
}

impl CaptureSource for ViewTree {
    fn bounding_rect(&self) -> Rect {
        self.root.rect.translate(0.0, -self.scroll_y)
    }

    fn client_size(&self) -> Size {
        self.root.rect.size()
    }

    fn find_link(&self, id: &LinkId) -> Option<LinkMarker> {
        let node = self.root.find(id.as_str())?;
        Some(LinkMarker {
            id: id.clone(),
            rect: node.rect.translate(0.0, -self.scroll_y),
            href: node.href.clone(),
            data_href: node.data_href.clone(),
        })
    }

    fn display_list(&self) -> Vec<DisplayItem> {
        let mut items = Vec::new();
        self.root.paint(&mut items);
        items
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r##"{
        "root": {
            "rect": {"x": 100, "y": 250, "width": 800, "height": 600},
            "background": "#ffffff",
            "children": [
                {
                    "id": "link1",
                    "rect": {"x": 140, "y": 750, "width": 100, "height": 30},
                    "background": "#1a73e8",
                    "href": "https://clinicaltrials.gov/study/NCT06189391"
                },
                {
                    "id": "link2",
                    "rect": {"x": 300, "y": 750, "width": 100, "height": 30},
                    "href": "https://example.org/fallback",
                    "dataHref": "https://example.org/preferred"
                }
            ]
        },
        "scrollY": 200
    }"##;

    #[test]
    fn markers_are_viewport_relative() {
        let tree = ViewTree::from_json(CARD).unwrap();
        assert_eq!(tree.bounding_rect(), Rect::new(100.0, 50.0, 800.0, 600.0));
        assert_eq!(tree.client_size(), Size::new(800.0, 600.0));
        assert_eq!(tree.device_pixel_ratio(), 1.0);

        let marker = tree.find_link(&LinkId::new("link1")).unwrap();
        assert_eq!(marker.rect, Rect::new(140.0, 550.0, 100.0, 30.0));
        assert_eq!(marker.rect.relative_to(&tree.bounding_rect()), Rect::new(40.0, 500.0, 100.0, 30.0));
    }

    #[test]
    fn data_href_is_carried_to_the_marker() {
        let tree = ViewTree::from_json(CARD).unwrap();
        let marker = tree.find_link(&LinkId::new("link2")).unwrap();
        assert_eq!(marker.resolved_url().unwrap().as_str(), "https://example.org/preferred");
        assert!(tree.find_link(&LinkId::new("link3")).is_none());
    }

    #[test]
    fn display_list_paints_parents_before_children() {
        let tree = ViewTree::from_json(CARD).unwrap();
        let items = tree.display_list();
        assert_eq!(items.len(), 2);
        assert!(matches!(
            &items[0],
            DisplayItem::Fill { rect, .. } if *rect == Rect::new(100.0, 250.0, 800.0, 600.0)
        ));
        assert!(matches!(&items[1], DisplayItem::Fill { color, .. } if *color == Color::rgb(0x1a, 0x73, 0xe8)));
    }

    #[test]
    fn missing_images_are_counted_not_fatal() {
        let mut tree = ViewTree::new(ViewNode {
            image_src: Some("does-not-exist.png".into()),
            ..ViewNode::new(Rect::new(0.0, 0.0, 10.0, 10.0))
        });
        assert_eq!(tree.resolve_images(Path::new("/nonexistent")), 1);
        assert!(tree.root.image.is_none());
    }
}
