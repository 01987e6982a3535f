//! Snapshot source trait and structured error types.
//!
//! A source yields the raw bytes of one snapshot (a headered CSV feed). The
//! pipeline runs only after a fetch has completed; a failed fetch is a
//! precondition failure and nothing downstream proceeds.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from snapshot sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("snapshot source '{location}' unavailable: {reason}")]
    Unavailable { location: String, reason: String },

    #[error("snapshot format error: {0}")]
    Format(String),
}

impl SourceError {
    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        SourceError::Unavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Trait for snapshot sources (local file, HTTP object store, test fixtures).
pub trait SnapshotSource: Send + Sync {
    /// Human-readable location of this source, used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the full snapshot. Either returns every byte or fails.
    fn fetch(&self) -> Result<Vec<u8>, SourceError>;
}

/// A snapshot stored as a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        tracing::debug!(path = %self.path.display(), "reading snapshot file");
        std::fs::read(&self.path).map_err(|e| SourceError::unavailable(&self.name, e))
    }
}
