//! Constants for the fetch module (timeouts, rate window).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (60 seconds; pages and JSON payloads are small).
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Width of the sliding window the rate limiter counts issuances in.
pub const RATE_WINDOW: Duration = Duration::from_secs(1);
