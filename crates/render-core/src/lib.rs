//! Core rendering abstractions for trialsheet PDF output.
//!
//! This crate provides the fundamental traits and types used by PDF rendering backends:
//! - `DocumentRenderer` trait for abstracting PDF writing operations
//! - Error types for rendering operations
//! - Coordinate conversion between top-left page space and PDF user space

mod error;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use traits::DocumentRenderer;
pub use types::{DocumentInfo, LinkAnnotation, PageGeometry};
