use super::config::ExportConfig;
use super::exporter::DocumentExporter;
use crate::error::ExportError;
use crate::view::DisplayListRasterizer;
use std::sync::Arc;
use std::time::Duration;
use trialsheet_traits::{DocumentSink, FontReadiness, Rasterizer};

/// A builder for creating a `DocumentExporter`.
#[derive(Debug, Default)]
pub struct ExporterBuilder {
    config: ExportConfig,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    sink: Option<Arc<dyn DocumentSink>>,
    font_readiness: Option<Arc<dyn FontReadiness>>,
}

impl ExporterBuilder {
    /// Creates a new `ExporterBuilder` with the default configuration.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the whole configuration. Later `with_*` calls still apply on top of it.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the rasterizer. Defaults to [`DisplayListRasterizer`].
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Where finished documents go. Required.
    pub fn with_sink(mut self, sink: Arc<dyn DocumentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_font_readiness(mut self, readiness: Arc<dyn FontReadiness>) -> Self {
        self.font_readiness = Some(readiness);
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.config.debug_overlay = enabled;
        self
    }

    /// Validates the configuration and assembles the exporter.
    pub fn build(self) -> Result<DocumentExporter, ExportError> {
        self.config.validate()?;
        let sink = self.sink.ok_or_else(|| {
            ExportError::Config("No document sink has been configured. Use `with_sink`.".to_string())
        })?;
        let rasterizer = self.rasterizer.unwrap_or_else(|| Arc::new(DisplayListRasterizer::new()));
        log::debug!("Building exporter with rasterizer '{}' and sink '{}'", rasterizer.name(), sink.name());
        Ok(DocumentExporter::new(self.config, rasterizer, sink, self.font_readiness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialsheet_traits::InMemoryDocumentSink;
    use trialsheet_types::Color;

    #[test]
    fn sink_is_required() {
        let result = ExporterBuilder::new().build();
        assert!(matches!(result, Err(ExportError::Config(_))));
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let exporter = ExporterBuilder::new()
            .with_config(ExportConfig { file_prefix: "trial-".into(), ..Default::default() })
            .with_settle_delay(Duration::from_millis(15))
            .with_debug_overlay(true)
            .with_sink(Arc::new(InMemoryDocumentSink::new()))
            .build()
            .unwrap();
        assert_eq!(exporter.config().file_prefix, "trial-");
        assert_eq!(exporter.config().settle_delay_ms, 15);
        assert!(exporter.config().debug_overlay);
    }

    #[test]
    fn invalid_config_fails_to_build() {
        let invalid = [
            ExportConfig { page_height: 0, ..Default::default() },
            ExportConfig { page_width: u32::MAX, page_height: u32::MAX, ..Default::default() },
            ExportConfig { background: Color { a: 0.0, ..Color::WHITE }, ..Default::default() },
        ];
        for config in invalid {
            let result = ExporterBuilder::new()
                .with_config(config)
                .with_sink(Arc::new(InMemoryDocumentSink::new()))
                .build();
            assert!(matches!(result, Err(ExportError::Config(_))));
        }
    }
}
