//! Concurrent, rate-limited page fetching.
//!
//! This module turns lists of URLs into successful HTTP responses. Individual
//! request failures are logged and dropped at the [`HttpClient`] boundary; a
//! batch always completes with whatever succeeded.
//!
//! # Features
//!
//! - Per-batch concurrency cap (semaphore)
//! - Per-batch request-start rate cap (sliding one-second window)
//! - Configurable timeouts (30s connect, 60s request by default)
//! - Connection pool scoped to a single batch call
//!
//! # Example
//!
//! ```no_run
//! use nrl_scraper_core::fetch::{BatchFetcher, FetchLimits, FetchTask, PageFetcher};
//! use reqwest::header::HeaderMap;
//!
//! # async fn example() {
//! let fetcher = BatchFetcher::new(HeaderMap::new());
//! let pages = fetcher
//!     .fetch_all(
//!         FetchTask::enumerate(["https://www.nrl.com/ladder/data"]),
//!         FetchLimits::unlimited(),
//!     )
//!     .await;
//! # }
//! ```

mod batch;
mod client;
mod constants;
mod error;
pub mod rate_limiter;
mod task;

pub use batch::{BatchFetcher, FetchLimits, FetchStats, MAX_CONCURRENCY, PageFetcher};
pub use client::{HttpClient, default_user_agent};
pub use error::FetchError;
pub use rate_limiter::RateLimiter;
pub use task::{FetchResponse, FetchTask};
