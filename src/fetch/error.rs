//! Error types for the fetch module.
//!
//! Request failures never escape [`HttpClient::get`](super::HttpClient::get);
//! they are logged with full context and turned into an absent response.
//! Limit validation errors are the only ones callers see.

use thiserror::Error;

use super::batch::MAX_CONCURRENCY;

/// Errors that can occur while fetching pages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx response.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response body could not be read.
    #[error("failed reading body of {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Invalid concurrency cap.
    #[error("invalid concurrency value {value}: must be between 1 and {max}", max = MAX_CONCURRENCY)]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// Invalid requests-per-second cap.
    #[error("invalid rate {value} requests/second: must be at least 1")]
    InvalidRate {
        /// The rejected value.
        value: u32,
    },

    /// The HTTP client could not be built (bad header set, TLS backend failure).
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Short label used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { .. } => "status",
            Self::Body { .. } => "body",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidConcurrency { .. } => "invalid_concurrency",
            Self::InvalidRate { .. } => "invalid_rate",
            Self::ClientBuild { .. } => "client_build",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_timeout_display() {
        let error = FetchError::timeout("https://www.nrl.com/players/");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://www.nrl.com/players/"));
        assert_eq!(error.kind(), "timeout");
    }

    #[test]
    fn test_fetch_error_http_status_display() {
        let error = FetchError::http_status("https://www.nrl.com/ladder/data", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://www.nrl.com/ladder/data"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_fetch_error_invalid_url_display() {
        let error = FetchError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"));
    }

    #[test]
    fn test_fetch_error_invalid_concurrency_display() {
        let msg = FetchError::InvalidConcurrency { value: 0 }.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_fetch_error_invalid_rate_display() {
        let msg = FetchError::InvalidRate { value: 0 }.to_string();
        assert!(msg.contains("at least 1"), "Expected bound in: {msg}");
    }
}
