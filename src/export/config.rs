use crate::error::ExportError;
use crate::view::{DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trialsheet_types::{Color, LinkId, Size};

/// Tunables of a [`DocumentExporter`](super::DocumentExporter).
///
/// Deserializes from camelCase JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Page canvas width in pixels. The PDF page uses one user unit per pixel.
    pub page_width: u32,
    pub page_height: u32,
    /// Lower bound for the capture scale; the host's device pixel ratio is used when larger.
    pub min_scale: f32,
    pub settle_delay_ms: u64,
    pub font_wait_timeout_ms: u64,
    /// Identifiers of the link markers to carry into the document, in annotation order.
    pub link_ids: Vec<LinkId>,
    pub background: Color,
    pub file_prefix: String,
    /// Outline every link region in red and also save the composited page as a PNG.
    pub debug_overlay: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width: 1240,
            page_height: 1754,
            min_scale: 2.0,
            settle_delay_ms: 2000,
            font_wait_timeout_ms: 5000,
            link_ids: vec![LinkId::new("link1"), LinkId::new("link2"), LinkId::new("link3")],
            background: Color::WHITE,
            file_prefix: "clinical-trial-".to_string(),
            debug_overlay: false,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!("Failed to read config from '{}': {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.page_width == 0 || self.page_height == 0 {
            return Err(ExportError::Config(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        let too_large = self.page_width > DEFAULT_MAX_DIMENSION
            || self.page_height > DEFAULT_MAX_DIMENSION
            || u64::from(self.page_width) * u64::from(self.page_height) > DEFAULT_MAX_PIXELS;
        if too_large {
            return Err(ExportError::Config(format!(
                "page size {}x{} exceeds the {} px edge or {} px area limit",
                self.page_width, self.page_height, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS
            )));
        }
        if !self.background.is_opaque() {
            return Err(ExportError::Config(format!(
                "background must be opaque, got alpha {}",
                self.background.a
            )));
        }
        if !self.min_scale.is_finite() || self.min_scale < 1.0 {
            return Err(ExportError::Config(format!(
                "minScale must be at least 1, got {}",
                self.min_scale
            )));
        }
        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(ExportError::Config(format!(
                "filePrefix must be a non-empty plain name, got {:?}",
                self.file_prefix
            )));
        }
        Ok(())
    }

    pub fn page_size(&self) -> Size {
        Size::from((self.page_width, self.page_height))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn font_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.font_wait_timeout_ms)
    }

    /// The capture scale for a host reporting `device_pixel_ratio`.
    pub fn capture_scale(&self, device_pixel_ratio: f32) -> f32 {
        if device_pixel_ratio.is_finite() {
            device_pixel_ratio.max(self.min_scale)
        } else {
            self.min_scale
        }
    }
}
