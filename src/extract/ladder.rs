//! Ladder extraction.
//!
//! The ladder endpoint returns `{"positions": [{"teamNickname": .., "stats": {..}}]}`
//! where stat keys are space-separated phrases (`"points for"`). They are
//! projected into [`Stats`] and re-emitted with camelCase keys.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use super::{ExtractError, Extraction, decode_json, require_array};
use crate::fetch::FetchResponse;

const POSITIONS: &str = "/positions";

/// Name used when a position carries no `teamNickname`.
const UNKNOWN_TEAM: &str = "Error fetching name";

/// One ladder row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LadderEntry {
    /// Team nickname.
    pub name: String,
    /// Season statistics.
    pub stats: Stats,
}

/// Ladder statistics for a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Matches played, byes excluded.
    pub played: i64,
    pub wins: i64,
    pub drawn: i64,
    pub lost: i64,
    pub byes: i64,
    #[serde(rename(deserialize = "points for", serialize = "pointsFor"))]
    pub points_for: i64,
    #[serde(rename(deserialize = "points against", serialize = "pointsAgainst"))]
    pub points_against: i64,
    #[serde(rename(deserialize = "points difference", serialize = "pointsDiff"))]
    pub points_diff: i64,
    #[serde(rename(deserialize = "home record", serialize = "homeRecord"))]
    /// `W-D-L` at home.
    pub home_record: String,
    #[serde(rename(deserialize = "away record", serialize = "awayRecord"))]
    pub away_record: String,
    /// Competition points.
    pub points: i64,
    #[serde(rename(deserialize = "bonus points", serialize = "bonusPoints"))]
    pub bonus_points: i64,
    /// Current run, e.g. `3W`.
    pub streak: String,
    /// Last five results, most recent last.
    pub form: String,
    /// Integer or float in the source; always a float here.
    #[serde(rename(deserialize = "average losing margin", serialize = "averageLossMargin"))]
    pub avg_loss_margin: f64,
    #[serde(rename(deserialize = "average winning margin", serialize = "averageWinMargin"))]
    pub avg_win_margin: f64,
    /// Matches decided in golden point extra time.
    #[serde(rename(deserialize = "golden point", serialize = "goldenPoint"))]
    pub golden_point: i64,
    #[serde(rename(deserialize = "day record", serialize = "dayRecord"))]
    pub day_record: String,
    #[serde(rename(deserialize = "night record", serialize = "nightRecord"))]
    pub night_record: String,
    /// Serialized as `playerUsed`, the key existing consumers of the snapshot read.
    #[serde(rename(deserialize = "players used", serialize = "playerUsed"))]
    pub players_used: i64,
    /// Head-to-head money odds, currency marker stripped.
    #[serde(default, deserialize_with = "deserialize_odds")]
    pub odds: Option<f64>,
}

#[derive(Deserialize)]
struct RawPosition {
    #[serde(rename = "teamNickname", default = "unknown_team")]
    name: String,
    stats: Stats,
}

fn unknown_team() -> String {
    UNKNOWN_TEAM.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOdds {
    Number(f64),
    Text(String),
}

fn deserialize_odds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawOdds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawOdds::Number(value)) => Ok(Some(value)),
        Some(RawOdds::Text(text)) => parse_odds(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid odds value {text:?}"))),
    }
}

/// Parses a money-odds string, with or without a leading `$`.
///
/// ```
/// use nrl_scraper_core::extract::parse_odds;
///
/// assert_eq!(parse_odds("$1.85"), Some(1.85));
/// assert_eq!(parse_odds("1.85"), Some(1.85));
/// assert_eq!(parse_odds("evens"), None);
/// ```
#[must_use]
pub fn parse_odds(raw: &str) -> Option<f64> {
    raw.trim()
        .strip_prefix('$')
        .unwrap_or(raw.trim())
        .trim()
        .parse()
        .ok()
}

/// Extracts the ladder from a single response.
///
/// Returns `None` (after logging) when the body is not JSON or has no
/// `positions` array. Individual malformed positions are dropped.
#[instrument(skip(response), fields(url = %response.url))]
pub fn extract_ladder(response: &FetchResponse) -> Option<Vec<LadderEntry>> {
    let body = match decode_json(response) {
        Ok(body) => body,
        Err(error) => {
            warn!(error = %error, "unable to unpack ladder response");
            return None;
        }
    };
    let positions = match require_array(&body, POSITIONS, &response.url) {
        Ok(positions) => positions,
        Err(error) => {
            warn!(error = %error, "unable to unpack ladder response");
            return None;
        }
    };

    let extraction: Extraction<LadderEntry> = positions
        .iter()
        .enumerate()
        .map(|(i, position)| project_position(position, i + 1, &response.url))
        .collect();
    Some(extraction.finish("ladder positions"))
}

fn project_position(value: &Value, rank: usize, url: &str) -> Result<LadderEntry, ExtractError> {
    let raw = RawPosition::deserialize(value)
        .map_err(|e| ExtractError::projection(url, format!("ladder position {rank}"), e))?;
    Ok(LadderEntry {
        name: raw.name,
        stats: raw.stats,
    })
}
