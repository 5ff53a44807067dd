//! DocumentSink trait for abstracting where finished documents go.
//!
//! This is the "download" step of an export: a browser host triggers a save dialog, a native
//! host writes into a directory, tests keep documents in memory.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for saving operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    #[error("Saving '{file_name}' was rejected: {reason}")]
    Rejected { file_name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err.to_string())
    }
}

/// Shared document data type (reference-counted bytes).
pub type SharedDocumentData = Arc<Vec<u8>>;

/// Where a saved document ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDocument {
    pub file_name: String,
    /// Sink-specific location (a filesystem path, a store key, ...).
    pub location: String,
}

/// A destination for finished documents.
///
/// Implementations must be all-or-nothing: when `save` returns an error, no partial document
/// may be visible under `file_name`.
pub trait DocumentSink: Send + Sync + Debug {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, SaveError>;

    /// Returns a human-readable name for this sink (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Rejects names that could escape a flat namespace of files.
pub fn validate_file_name(file_name: &str) -> Result<(), SaveError> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0'])
    {
        return Err(SaveError::InvalidName(file_name.to_string()));
    }
    Ok(())
}

/// An in-memory document sink.
///
/// Saving the same name twice replaces the earlier document.
#[derive(Debug, Default)]
pub struct InMemoryDocumentSink {
    documents: RwLock<HashMap<String, SharedDocumentData>>,
}

impl InMemoryDocumentSink {
    pub fn new() -> Self {
        Self { documents: RwLock::new(HashMap::new()) }
    }

    /// Returns `None` if the lock is poisoned or the document doesn't exist.
    pub fn get(&self, file_name: &str) -> Option<SharedDocumentData> {
        self.documents.read().ok()?.get(file_name).cloned()
    }

    /// Sorted names of every stored document.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .documents
            .read()
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.documents.read().map(|d| d.is_empty()).unwrap_or(true)
    }
}

impl DocumentSink for InMemoryDocumentSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, SaveError> {
        validate_file_name(file_name)?;
        let mut documents = self.documents.write().map_err(|_| SaveError::Rejected {
            file_name: file_name.to_string(),
            reason: "document store lock poisoned".to_string(),
        })?;
        documents.insert(file_name.to_string(), Arc::new(bytes.to_vec()));
        Ok(SavedDocument { file_name: file_name.to_string(), location: file_name.to_string() })
    }

    fn name(&self) -> &'static str {
        "InMemoryDocumentSink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_sink_save_and_get() {
        let sink = InMemoryDocumentSink::new();
        let saved = sink.save("clinical-trial-NCT1.pdf", b"%PDF-1.7").unwrap();

        assert_eq!(saved.file_name, "clinical-trial-NCT1.pdf");
        assert_eq!(&*sink.get("clinical-trial-NCT1.pdf").unwrap(), b"%PDF-1.7");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_in_memory_sink_replaces_same_name() {
        let sink = InMemoryDocumentSink::new();
        sink.save("a.pdf", b"one").unwrap();
        sink.save("a.pdf", b"two").unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(&*sink.get("a.pdf").unwrap(), b"two");
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let sink = InMemoryDocumentSink::new();
        for name in ["", ".", "..", "../x.pdf", "dir/x.pdf", "dir\\x.pdf"] {
            assert!(
                matches!(sink.save(name, b""), Err(SaveError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_file_names_are_sorted() {
        let sink = InMemoryDocumentSink::new();
        sink.save("b.pdf", b"").unwrap();
        sink.save("a.pdf", b"").unwrap();
        assert_eq!(sink.file_names(), vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    }
}
