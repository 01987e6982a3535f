//! Snapshot loading for the runner.
//!
//! Turns a [`SourceConfig`] into a live source, fetches the snapshot once,
//! decodes it, and records a BLAKE3 hash of the raw bytes so every report can
//! be traced back to the exact snapshot it was computed from.

use std::time::Duration;

use thiserror::Error;
use tradedash_core::data::{
    parse_csv, FileSource, HttpOptions, HttpSource, RawRow, SnapshotSource, SourceError,
};

use crate::config::SourceConfig;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("credential environment variable '{var}' is not set")]
    MissingCredential { var: String },

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A decoded snapshot plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub source_name: String,
    pub rows: Vec<RawRow>,
    /// BLAKE3 hex digest of the raw snapshot bytes.
    pub snapshot_hash: String,
    pub byte_len: usize,
}

/// Build the source described by `config`.
///
/// Credentials are resolved here, from the environment variable the config
/// names, and handed to the source explicitly.
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn SnapshotSource>, LoadError> {
    match config {
        SourceConfig::File { path } => Ok(Box::new(FileSource::new(path))),
        SourceConfig::Http {
            url,
            auth_token_env,
            timeout_secs,
            max_retries,
        } => {
            let bearer_token = match auth_token_env {
                Some(var) => Some(std::env::var(var).map_err(|_| LoadError::MissingCredential {
                    var: var.clone(),
                })?),
                None => None,
            };

            let defaults = HttpOptions::default();
            let options = HttpOptions {
                timeout: timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
                max_retries: max_retries.unwrap_or(defaults.max_retries),
                base_delay: defaults.base_delay,
                bearer_token,
            };
            Ok(Box::new(HttpSource::new(url.clone(), options)?))
        }
    }
}

/// Fetch and decode one snapshot.
pub fn load_snapshot(source: &dyn SnapshotSource) -> Result<LoadedSnapshot, LoadError> {
    let bytes = source.fetch()?;
    let snapshot_hash = snapshot_hash(&bytes);
    let rows = parse_csv(&bytes)?;

    let short_hash = &snapshot_hash[..12];
    tracing::info!(
        source = source.name(),
        rows = rows.len(),
        bytes = bytes.len(),
        hash = short_hash,
        "snapshot loaded"
    );

    Ok(LoadedSnapshot {
        source_name: source.name().to_string(),
        rows,
        snapshot_hash,
        byte_len: bytes.len(),
    })
}

/// Deterministic BLAKE3 digest of a snapshot's raw bytes.
pub fn snapshot_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
