//! Filesystem-based document sink for native platforms.
//!
//! Documents are written to a temporary file in the target directory and renamed into place
//! once fully flushed, so a failed save never leaves a truncated document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use trialsheet_traits::{validate_file_name, DocumentSink, SaveError, SavedDocument};

/// A sink that stores documents as files inside a single directory.
///
/// The directory is created on first save if it doesn't exist. File names must be plain
/// names; anything containing a path separator is rejected.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Returns the directory documents are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl DocumentSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedDocument, SaveError> {
        validate_file_name(file_name)?;
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(file_name);
        let mut staging = NamedTempFile::new_in(&self.dir)?;
        staging.write_all(bytes)?;
        staging.as_file().sync_all()?;
        staging
            .persist(&target)
            .map_err(|e| SaveError::Io(format!("{}: {}", target.display(), e.error)))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(SavedDocument {
            file_name: file_name.to_string(),
            location: target.display().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "DirectorySink"
    }
}
