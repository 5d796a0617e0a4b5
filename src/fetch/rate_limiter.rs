//! Requests-per-second admission gate for batch fetches.
//!
//! This module provides the [`RateLimiter`] struct which caps how many
//! requests may be *started* within any one-second window. It limits issuance,
//! not completion: a slow response does not hold a slot once its start has
//! been recorded.
//!
//! # Overview
//!
//! The limiter keeps the start instants of the last `max_per_second`
//! requests. A new request is admitted immediately while fewer than that many
//! starts fall inside the trailing window; otherwise it waits until the oldest
//! one ages out.
//!
//! # Example
//!
//! ```
//! use nrl_scraper_core::fetch::RateLimiter;
//!
//! # async fn example() {
//! let limiter = RateLimiter::per_second(5);
//!
//! // The first five starts proceed immediately, the sixth waits
//! // until a second has passed since the first.
//! for _ in 0..6 {
//!     limiter.acquire().await;
//! }
//! # }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::constants::RATE_WINDOW;

/// Upper bound on the start slots reserved up front; the queue grows past it on demand.
const PREALLOCATED_STARTS: usize = 64;

/// Sliding-window limiter on request starts.
///
/// Waiters queue on a fair `tokio::sync::Mutex`, so admission order follows
/// arrival order. One limiter is created per batch call; nothing is shared
/// across batches.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum starts per window; `None` disables the gate.
    max_per_window: Option<usize>,

    /// Window width.
    window: Duration,

    /// Start instants still inside the window, oldest first.
    starts: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting at most `max_per_second` starts per second.
    ///
    /// A value of 0 is treated as 1; callers validate user input through
    /// [`FetchLimits`](super::FetchLimits).
    #[must_use]
    #[instrument(level = "debug")]
    pub fn per_second(max_per_second: u32) -> Self {
        Self::with_window(max_per_second, RATE_WINDOW)
    }

    /// Creates a limiter with a custom window width.
    #[must_use]
    pub fn with_window(max_per_window: u32, window: Duration) -> Self {
        let max = usize::try_from(max_per_window.max(1)).unwrap_or(usize::MAX);
        debug!(max_per_window = max, window_ms = window.as_millis(), "creating rate limiter");
        Self {
            max_per_window: Some(max),
            window,
            starts: Mutex::new(VecDeque::with_capacity(max.min(PREALLOCATED_STARTS))),
        }
    }

    /// Creates a disabled limiter that admits every request immediately.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_per_window: None,
            window: RATE_WINDOW,
            starts: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns whether the gate is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_per_window.is_none()
    }

    /// Returns the configured number of starts per window, if any.
    #[must_use]
    pub fn max_per_window(&self) -> Option<usize> {
        self.max_per_window
    }

    /// Waits until a new request may start, then records its start.
    pub async fn acquire(&self) {
        let Some(max) = self.max_per_window else {
            return;
        };

        // Held across the sleep so later callers queue behind this one.
        let mut starts = self.starts.lock().await;

        let now = Instant::now();
        while starts
            .front()
            .is_some_and(|oldest| now.duration_since(*oldest) >= self.window)
        {
            starts.pop_front();
        }

        if starts.len() >= max {
            if let Some(oldest) = starts.pop_front() {
                let ready_at = oldest + self.window;
                debug!(
                    delay_ms = ready_at.saturating_duration_since(now).as_millis(),
                    "rate limit reached, delaying request start"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        starts.push_back(Instant::now());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_per_second_sets_cap() {
        let limiter = RateLimiter::per_second(5);
        assert_eq!(limiter.max_per_window(), Some(5));
        assert!(!limiter.is_disabled());
    }

    #[test]
    fn test_rate_limiter_zero_is_clamped_to_one() {
        let limiter = RateLimiter::per_second(0);
        assert_eq!(limiter.max_per_window(), Some(1));
    }

    #[tokio::test]
    async fn test_rate_limiter_huge_cap_admits_without_reserving() {
        tokio::time::pause();

        let limiter = RateLimiter::per_second(u32::MAX);
        assert_eq!(
            limiter.max_per_window(),
            Some(usize::try_from(u32::MAX).unwrap())
        );

        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(10));
        assert!(limiter.starts.lock().await.capacity() < 1024);
    }

    #[test]
    fn test_rate_limiter_disabled_has_no_cap() {
        let limiter = RateLimiter::disabled();
        assert!(limiter.is_disabled());
        assert_eq!(limiter.max_per_window(), None);
    }

    #[tokio::test]
    async fn test_rate_limiter_disabled_no_delay() {
        tokio::time::pause();

        let limiter = RateLimiter::disabled();
        let start = Instant::now();
        for _ in 0..50 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_rate_limiter_burst_up_to_cap_is_immediate() {
        tokio::time::pause();

        let limiter = RateLimiter::per_second(3);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_rate_limiter_delays_past_cap() {
        tokio::time::pause();

        let limiter = RateLimiter::per_second(2);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        // Third start must wait for the first to leave the window
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_millis(1100));

        // Fourth waits for the second
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_millis(1100));

        // Fifth waits for the third
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_rate_limiter_window_never_exceeds_cap() {
        tokio::time::pause();

        let cap = 4usize;
        let limiter = RateLimiter::per_second(4);
        let origin = Instant::now();
        let mut stamps = Vec::new();

        for _ in 0..17 {
            limiter.acquire().await;
            stamps.push(Instant::now().duration_since(origin));
        }

        for (i, first) in stamps.iter().enumerate() {
            let in_window = stamps[i..]
                .iter()
                .take_while(|t| **t - *first < Duration::from_secs(1))
                .count();
            assert!(
                in_window <= cap,
                "window starting at {first:?} admitted {in_window} starts"
            );
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_idle_period_refills_window() {
        tokio::time::pause();

        let limiter = RateLimiter::per_second(2);
        limiter.acquire().await;
        limiter.acquire().await;

        tokio::time::advance(Duration::from_secs(2)).await;

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
