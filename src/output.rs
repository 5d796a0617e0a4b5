//! JSON snapshot persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Default directory snapshots are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Timestamp format of the snapshot `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output directory could not be created.
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Records could not be rendered as JSON.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot file could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// On-disk envelope: capture time plus the records.
#[derive(Debug, Serialize)]
struct Snapshot<'a, T: Serialize> {
    date: String,
    data: &'a T,
}

/// Current UTC time in [`DATE_FORMAT`].
#[must_use]
pub fn utc_timestamp() -> String {
    Utc::now().format(DATE_FORMAT).to_string()
}

/// Writes `data` to `<dir>/<filename>.json`, creating `dir` if needed.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns [`OutputError`] if the directory cannot be created, the data
/// cannot be serialized, or the file cannot be written.
pub fn write_snapshot<T: Serialize>(
    dir: &Path,
    filename: &str,
    data: &T,
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let snapshot = Snapshot {
        date: utc_timestamp(),
        data,
    };
    let json = serde_json::to_string_pretty(&snapshot)?;

    let path = dir.join(format!("{filename}.json"));
    fs::write(&path, json).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "snapshot written");
    Ok(path)
}
