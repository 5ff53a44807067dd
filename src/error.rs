// src/error.rs
use thiserror::Error;
use trialsheet_render_core::RenderError;
use trialsheet_traits::{CaptureError, SaveError};

/// Everything that can make an export fail.
///
/// Unresolvable link markers are deliberately absent: they are dropped, not reported.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Document identifier must not be empty")]
    InvalidIdentifier,

    #[error("Capture failed: {0}")]
    CaptureFailure(#[from] CaptureError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Saving the document failed: {0}")]
    SaveFailure(#[from] SaveError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExportError::Task(e.to_string())
    }
}
