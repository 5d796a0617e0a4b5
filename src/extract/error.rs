//! Error types for response extraction.
//!
//! These never leave the extract module: they are logged at the extractor
//! boundary and the offending response or record is dropped.

use thiserror::Error;

/// Errors raised while decoding a response or projecting one of its records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Body is not valid JSON.
    #[error("invalid JSON in response from {url}: {source}")]
    InvalidJson {
        /// URL the body came from.
        url: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Expected JSON path not present (or of the wrong shape).
    #[error("missing `{path}` in response from {url}")]
    MissingPath {
        /// URL the body came from.
        url: String,
        /// JSON pointer that failed to resolve.
        path: &'static str,
    },

    /// A single record could not be mapped to its domain type.
    #[error("could not project {record} from {url}: {reason}")]
    Projection {
        /// URL the record came from.
        url: String,
        /// What kind of record failed (e.g. `ladder position 3`).
        record: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl ExtractError {
    /// Creates an invalid JSON error.
    pub fn invalid_json(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            url: url.into(),
            source,
        }
    }

    /// Creates a missing path error.
    pub fn missing_path(url: impl Into<String>, path: &'static str) -> Self {
        Self::MissingPath {
            url: url.into(),
            path,
        }
    }

    /// Creates a projection error.
    pub fn projection(
        url: impl Into<String>,
        record: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Projection {
            url: url.into(),
            record: record.into(),
            reason: reason.to_string(),
        }
    }
}
