//! Response extractors for the three data sources.
//!
//! Each extractor decodes a JSON path out of a successful response and
//! projects the records under it into domain types. Failures are recovered
//! here: a bad response or record is logged and dropped, siblings proceed, and
//! callers only ever observe fewer (or no) items.
//!
//! - [`ladder`] - competition ladder positions
//! - [`team_stats`] - per-statistic team leader boards
//! - [`players`] - team profile lists and player pages

pub mod error;
pub mod ladder;
pub mod players;
pub mod team_stats;

pub use error::ExtractError;
pub use ladder::{LadderEntry, Stats, extract_ladder, parse_odds};
pub use players::{PlayerProfile, PlayerRecord, extract_player, extract_players, extract_profile_urls};
pub use team_stats::{StatCategory, TeamStatLeader, extract_team_stats};

use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::FetchResponse;

/// Accumulator for drop-and-continue extraction.
///
/// Successful projections are kept in order; failures are logged once, as
/// they are folded in, and counted.
#[derive(Debug)]
pub struct Extraction<T> {
    items: Vec<T>,
    dropped: usize,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
        }
    }
}

impl<T> Extraction<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one projection result in.
    pub fn record(&mut self, result: Result<T, ExtractError>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(error) => {
                warn!(error = %error, "dropping record");
                self.dropped += 1;
            }
        }
    }

    /// Merges another accumulator into this one.
    pub fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
        self.dropped += other.dropped;
    }

    /// Successfully projected items so far.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of failures folded in.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Logs the outcome counts under `what` and returns the items.
    pub fn finish(self, what: &str) -> Vec<T> {
        debug!(
            what,
            extracted = self.items.len(),
            dropped = self.dropped,
            "extraction complete"
        );
        if self.dropped > 0 {
            warn!(what, dropped = self.dropped, "some records were dropped");
        }
        self.items
    }
}

impl<T> Extend<Result<T, ExtractError>> for Extraction<T> {
    fn extend<I: IntoIterator<Item = Result<T, ExtractError>>>(&mut self, iter: I) {
        for result in iter {
            self.record(result);
        }
    }
}

impl<T> FromIterator<Result<T, ExtractError>> for Extraction<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, ExtractError>>>(iter: I) -> Self {
        let mut extraction = Self::new();
        extraction.extend(iter);
        extraction
    }
}

/// Decodes a response body as JSON.
pub(crate) fn decode_json(response: &FetchResponse) -> Result<Value, ExtractError> {
    serde_json::from_str(&response.body)
        .map_err(|e| ExtractError::invalid_json(response.url.as_str(), e))
}

/// Resolves a JSON pointer, reporting the pointer on failure.
pub(crate) fn require_path<'a>(
    value: &'a Value,
    pointer: &'static str,
    url: &str,
) -> Result<&'a Value, ExtractError> {
    value
        .pointer(pointer)
        .filter(|found| !found.is_null())
        .ok_or_else(|| ExtractError::missing_path(url, pointer))
}

/// Resolves a JSON pointer that must hold an array.
pub(crate) fn require_array<'a>(
    value: &'a Value,
    pointer: &'static str,
    url: &str,
) -> Result<&'a [Value], ExtractError> {
    require_path(value, pointer, url)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ExtractError::missing_path(url, pointer))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: &str) -> FetchResponse {
        FetchResponse {
            url: "https://a.test/data".to_string(),
            index: None,
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_extraction_folds_successes_and_failures() {
        let results = vec![
            Ok(1),
            Err(ExtractError::projection("u", "r", "bad")),
            Ok(3),
        ];
        let extraction: Extraction<i32> = results.into_iter().collect();
        assert_eq!(extraction.items(), &[1, 3]);
        assert_eq!(extraction.dropped(), 1);
        assert_eq!(extraction.finish("numbers"), vec![1, 3]);
    }

    #[test]
    fn test_extraction_merge_adds_counts() {
        let mut a: Extraction<i32> = vec![Ok(1)].into_iter().collect();
        let b: Extraction<i32> = vec![Err(ExtractError::projection("u", "r", "bad")), Ok(2)]
            .into_iter()
            .collect();
        a.merge(b);
        assert_eq!(a.items(), &[1, 2]);
        assert_eq!(a.dropped(), 1);
    }

    #[test]
    fn test_decode_json_invalid_body() {
        let err = decode_json(&response("<html>")).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson { .. }));
    }

    #[test]
    fn test_require_array_missing_and_wrong_shape() {
        let value = json!({"positions": {"not": "an array"}, "empty": null});
        assert!(require_array(&value, "/positions", "u").is_err());
        assert!(require_path(&value, "/empty", "u").is_err());
        assert!(require_path(&value, "/absent", "u").is_err());
    }

    #[test]
    fn test_require_array_nested_pointer() {
        let value = json!({"profileGroups": [{"profiles": [{"url": "/p/1"}]}]});
        let profiles = require_array(&value, "/profileGroups/0/profiles", "u").unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_require_array_borrows_from_body() {
        let value = json!({"positions": [{"rank": 1}, {"rank": 2}]});
        let positions = require_array(&value, "/positions", "u").unwrap();
        assert!(std::ptr::eq(&positions[1], &value["positions"][1]));
    }
}
