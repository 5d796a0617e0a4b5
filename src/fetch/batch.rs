//! Concurrent batch fetching under a concurrency cap and a rate cap.
//!
//! This module provides the [`BatchFetcher`] which issues a list of GET
//! requests concurrently. Two independent admission gates apply to every
//! request, composed in a single scheduling loop:
//!
//! - a semaphore bounding how many requests are in flight at once
//! - a [`RateLimiter`] bounding how many requests start per second
//!
//! A request starts only once both gates admit it. Failed requests are
//! logged by the [`HttpClient`] and dropped; the batch itself never fails.
//!
//! # Example
//!
//! ```no_run
//! use nrl_scraper_core::fetch::{BatchFetcher, FetchLimits, FetchTask, PageFetcher};
//! use reqwest::header::HeaderMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = BatchFetcher::new(HeaderMap::new());
//! let limits = FetchLimits::new(Some(10), Some(5))?;
//! let tasks = FetchTask::enumerate(["https://www.nrl.com/players/nrl-premiership/broncos/"]);
//! let pages = fetcher.fetch_all(tasks, limits).await;
//! println!("fetched {} pages", pages.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::HeaderMap;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::client::HttpClient;
use super::constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use super::error::FetchError;
use super::rate_limiter::RateLimiter;
use super::task::{FetchResponse, FetchTask};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Admission ceilings for one batch call.
///
/// `None` on either field disables that gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchLimits {
    max_concurrent: Option<usize>,
    max_per_second: Option<u32>,
}

impl FetchLimits {
    /// Validates and creates a limit pair.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidConcurrency`] when `max_concurrent` is
    /// outside 1..=100, and [`FetchError::InvalidRate`] when
    /// `max_per_second` is 0.
    pub fn new(
        max_concurrent: Option<usize>,
        max_per_second: Option<u32>,
    ) -> Result<Self, FetchError> {
        if let Some(value) = max_concurrent
            && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&value)
        {
            return Err(FetchError::InvalidConcurrency { value });
        }
        if let Some(value) = max_per_second
            && value == 0
        {
            return Err(FetchError::InvalidRate { value });
        }
        Ok(Self {
            max_concurrent,
            max_per_second,
        })
    }

    /// No concurrency cap and no rate gate.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Maximum simultaneous in-flight requests.
    #[must_use]
    pub fn max_concurrent(&self) -> Option<usize> {
        self.max_concurrent
    }

    /// Maximum request starts per second.
    #[must_use]
    pub fn max_per_second(&self) -> Option<u32> {
        self.max_per_second
    }
}

/// Outcome counts of one batch call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchStats {
    /// Tasks handed to the batch.
    pub submitted: usize,
    /// Tasks that produced a 2xx response.
    pub succeeded: usize,
    /// Tasks dropped (transport error, status error, task panic).
    pub failed: usize,
}

/// Anything that can fetch a batch of pages.
///
/// The crawl pipelines depend on this trait rather than on [`BatchFetcher`]
/// directly so that stages can be exercised against canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches every task, returning successes only in no particular order.
    async fn fetch_all(&self, tasks: Vec<FetchTask>, limits: FetchLimits) -> Vec<FetchResponse>;
}

/// Network-backed [`PageFetcher`].
///
/// Holds only the request configuration. Each [`fetch_all`](PageFetcher::fetch_all)
/// call builds its own [`HttpClient`] and drops it when the batch settles, so
/// connection pools never outlive a batch.
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    headers: HeaderMap,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
}

impl BatchFetcher {
    /// Creates a fetcher that sends `headers` with every request.
    #[must_use]
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }

    /// Overrides the per-request timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, request_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.request_timeout_secs = request_timeout_secs;
        self
    }

    /// Fetches every task and reports outcome counts alongside the successes.
    ///
    /// # Concurrency Model
    ///
    /// - The scheduling loop acquires a semaphore permit (when capped), then
    ///   waits on the rate gate (when set), then spawns the request
    /// - Each spawned task owns its permit and returns its own result
    /// - Results are combined only after every task has settled
    #[instrument(skip(self, tasks), fields(
        tasks = tasks.len(),
        max_concurrent = limits.max_concurrent(),
        max_per_second = limits.max_per_second(),
    ))]
    pub async fn fetch_all_with_stats(
        &self,
        tasks: Vec<FetchTask>,
        limits: FetchLimits,
    ) -> (Vec<FetchResponse>, FetchStats) {
        let mut stats = FetchStats {
            submitted: tasks.len(),
            ..FetchStats::default()
        };

        if tasks.is_empty() {
            debug!("empty batch, nothing to fetch");
            return (Vec::new(), stats);
        }

        let client = match HttpClient::with_timeouts(
            self.headers.clone(),
            self.connect_timeout_secs,
            self.request_timeout_secs,
        ) {
            Ok(client) => client,
            Err(error) => {
                warn!(error = %error, "could not build HTTP client, batch skipped");
                stats.failed = stats.submitted;
                return (Vec::new(), stats);
            }
        };

        let semaphore = limits
            .max_concurrent()
            .map(|permits| Arc::new(Semaphore::new(permits)));
        let rate_limiter = limits
            .max_per_second()
            .map_or_else(RateLimiter::disabled, RateLimiter::per_second);

        info!("starting batch");

        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let permit = match &semaphore {
                Some(semaphore) => match Arc::clone(semaphore).acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        warn!("semaphore closed unexpectedly, stopping issuance");
                        break;
                    }
                },
                None => None,
            };

            rate_limiter.acquire().await;

            let client = client.clone();
            handles.push(tokio::spawn(async move {
                // Permit is released when the request settles
                let _permit = permit;
                client.get(&task).await
            }));
        }

        debug!(task_count = handles.len(), "waiting for requests to settle");

        let mut responses = Vec::with_capacity(handles.len());
        for outcome in join_all(handles).await {
            match outcome {
                Ok(Some(response)) => responses.push(response),
                Ok(None) => {}
                Err(error) => warn!(error = %error, "fetch task panicked"),
            }
        }

        stats.succeeded = responses.len();
        stats.failed = stats.submitted - stats.succeeded;
        info!(
            submitted = stats.submitted,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "batch complete"
        );

        (responses, stats)
    }
}

#[async_trait]
impl PageFetcher for BatchFetcher {
    async fn fetch_all(&self, tasks: Vec<FetchTask>, limits: FetchLimits) -> Vec<FetchResponse> {
        self.fetch_all_with_stats(tasks, limits).await.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_valid_values() {
        let limits = FetchLimits::new(Some(1), Some(1)).unwrap();
        assert_eq!(limits.max_concurrent(), Some(1));
        assert_eq!(limits.max_per_second(), Some(1));

        let limits = FetchLimits::new(Some(100), None).unwrap();
        assert_eq!(limits.max_concurrent(), Some(100));
        assert_eq!(limits.max_per_second(), None);
    }

    #[test]
    fn test_limits_unlimited_has_no_gates() {
        let limits = FetchLimits::unlimited();
        assert_eq!(limits.max_concurrent(), None);
        assert_eq!(limits.max_per_second(), None);
    }

    #[test]
    fn test_limits_invalid_concurrency_zero() {
        let result = FetchLimits::new(Some(0), None);
        assert!(matches!(
            result,
            Err(FetchError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_limits_invalid_concurrency_too_high() {
        let result = FetchLimits::new(Some(101), None);
        assert!(matches!(
            result,
            Err(FetchError::InvalidConcurrency { value: 101 })
        ));
    }

    #[test]
    fn test_limits_invalid_rate_zero() {
        let result = FetchLimits::new(None, Some(0));
        assert!(matches!(result, Err(FetchError::InvalidRate { value: 0 })));
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty_without_client() {
        let fetcher = BatchFetcher::new(HeaderMap::new());
        let (responses, stats) = fetcher
            .fetch_all_with_stats(Vec::new(), FetchLimits::unlimited())
            .await;
        assert!(responses.is_empty());
        assert_eq!(stats, FetchStats::default());
    }

    #[tokio::test]
    async fn test_unreachable_hosts_are_dropped() {
        let fetcher = BatchFetcher::new(HeaderMap::new()).with_timeouts(1, 2);
        let tasks = FetchTask::enumerate(["http://127.0.0.1:9/a", "not a url"]);
        let (responses, stats) = fetcher
            .fetch_all_with_stats(tasks, FetchLimits::new(Some(2), None).unwrap())
            .await;
        assert!(responses.is_empty());
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.succeeded, 0);
    }
}
