//! Image-page PDF renderer using lopdf.
//!
//! This crate writes the exporter's output: one page, one full-bleed image, and a set of
//! clickable URI annotations laid over it.

mod helpers;
mod renderer;
mod writer;

pub use helpers::*;
pub use renderer::LopdfRenderer;
pub use writer::StreamingPdfWriter;
