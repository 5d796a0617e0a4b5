//! HTTP client wrapper for single page requests.
//!
//! [`HttpClient::get`] is the recovery boundary for transport and status
//! errors: every failure is logged as a structured warning and surfaces to
//! the caller only as `None`.

use std::time::Duration;

use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use super::error::FetchError;
use super::task::{FetchResponse, FetchTask};

/// HTTP client with a fixed header set.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client sending `headers` on every request, with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend fails to initialise.
    pub fn new(headers: HeaderMap) -> Result<Self, FetchError> {
        Self::with_timeouts(headers, CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend fails to initialise.
    #[instrument(level = "debug", skip(headers), fields(header_count = headers.len()))]
    pub fn with_timeouts(
        headers: HeaderMap,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = base_client_builder(headers, connect_timeout_secs, request_timeout_secs)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Issues one GET for `task`.
    ///
    /// Returns `None` on any transport failure or non-2xx status. When the
    /// task carries an index, a progress line is emitted on success.
    #[instrument(skip(self, task), fields(url = %task.url, index = task.index, label = task.label.as_deref()))]
    pub async fn get(&self, task: &FetchTask) -> Option<FetchResponse> {
        match self.try_get(task).await {
            Ok(response) => {
                if let Some(index) = task.index {
                    info!(target: "progress", "- {index}. {}", task.url);
                }
                Some(response)
            }
            Err(error) => {
                warn!(kind = error.kind(), error = %error, "request failed");
                None
            }
        }
    }

    async fn try_get(&self, task: &FetchTask) -> Result<FetchResponse, FetchError> {
        let url = task.url.as_str();
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        debug!("sending request");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::body(url, e)
            }
        })?;

        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(FetchResponse {
            url: task.url.clone(),
            index: task.index,
            status: status.as_u16(),
            body,
        })
    }
}

/// Identifying User-Agent used when the settings file does not set one.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("nrl-scraper/{version}")
}

fn base_client_builder(
    headers: HeaderMap,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
) -> ClientBuilder {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(request_timeout_secs))
        .gzip(true);
    if !headers.contains_key(USER_AGENT) {
        builder = builder.user_agent(default_user_agent());
    }
    builder.default_headers(headers)
}
