//! Document sinks for the trialsheet exporter.
//!
//! This crate provides platform-specific implementations of the
//! `DocumentSink` trait from trialsheet-traits.
//!
//! ## Available Sinks
//!
//! - [`DirectorySink`]: Atomically writes documents into a local directory
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory sink from trialsheet-traits:
//! - [`InMemoryDocumentSink`]: Keeps saved documents in memory

mod directory;

pub use directory::DirectorySink;

// Re-export the in-memory sink from trialsheet-traits for convenience
pub use trialsheet_traits::InMemoryDocumentSink;
