//! The export pipeline: stabilize, discover links, rasterize, compose, project, serialize, save.

mod builder;
pub mod compose;
pub mod config;
mod exporter;
pub mod links;
pub mod naming;

pub use builder::ExporterBuilder;
pub use compose::{compose_page, PageCanvas};
pub use config::ExportConfig;
pub use exporter::{DocumentExporter, ExportedDocument};
pub use links::{discover_links, project_links, DiscoveredLink, PageLinkRegion};
pub use naming::{debug_image_file_name, document_file_name};
