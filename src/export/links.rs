//! Link discovery and projection.
//!
//! Markers are located on the live source before rasterization and their rectangles are
//! replayed through the transforms applied to the pixels: layout → raster → page.

use serde::Serialize;
use trialsheet_render_core::LinkAnnotation;
use trialsheet_traits::CaptureSource;
use trialsheet_types::{AxisTransform, LinkId, LinkUrl, Rect};

/// A resolvable link marker, positioned relative to the capture root.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredLink {
    pub id: LinkId,
    pub url: LinkUrl,
    pub rect: Rect,
}

/// A link rectangle in page coordinates (top-left origin, page pixels).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinkRegion {
    pub id: LinkId,
    pub url: LinkUrl,
    pub rect: Rect,
}

impl PageLinkRegion {
    pub fn to_annotation(&self) -> LinkAnnotation {
        LinkAnnotation { rect: self.rect, url: self.url.clone() }
    }
}

/// Looks up each configured marker on `root`.
///
/// Markers that are absent or resolve to an empty URL are skipped.
pub fn discover_links(root: &dyn CaptureSource, ids: &[LinkId]) -> Vec<DiscoveredLink> {
    let root_rect = root.bounding_rect();
    ids.iter()
        .filter_map(|id| {
            let Some(marker) = root.find_link(id) else {
                log::debug!("Link marker '{}' not found; skipping", id);
                return None;
            };
            let Some(url) = marker.resolved_url() else {
                log::debug!("Link marker '{}' has no URL; skipping", id);
                return None;
            };
            Some(DiscoveredLink { id: id.clone(), url, rect: marker.rect.relative_to(&root_rect) })
        })
        .collect()
}

/// Maps root-relative link rectangles into page space.
pub fn project_links(
    links: &[DiscoveredLink],
    dom_to_raster: &AxisTransform,
    raster_to_page: &AxisTransform,
) -> Vec<PageLinkRegion> {
    links
        .iter()
        .map(|link| PageLinkRegion {
            id: link.id.clone(),
            url: link.url.clone(),
            rect: raster_to_page.apply(&dom_to_raster.apply(&link.rect)),
        })
        .collect()
}
