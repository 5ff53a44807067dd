//! Deterministic artifact names.
//!
//! Identifiers are percent-encoded outside `[A-Za-z0-9-_.~]`, which keeps names path-safe and
//! makes the mapping injective: `%` itself is encoded, so distinct identifiers never collide.

use crate::error::ExportError;
use std::borrow::Cow;

fn encode_identifier(identifier: &str) -> Result<Cow<'_, str>, ExportError> {
    if identifier.is_empty() {
        return Err(ExportError::InvalidIdentifier);
    }
    Ok(urlencoding::encode(identifier))
}

/// `<prefix><identifier>.pdf`
pub fn document_file_name(prefix: &str, identifier: &str) -> Result<String, ExportError> {
    Ok(format!("{}{}.pdf", prefix, encode_identifier(identifier)?))
}

/// `<prefix><identifier>-debug.png`
pub fn debug_image_file_name(prefix: &str, identifier: &str) -> Result<String, ExportError> {
    Ok(format!("{}{}-debug.png", prefix, encode_identifier(identifier)?))
}
