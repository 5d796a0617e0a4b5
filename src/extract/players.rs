//! Team list and player page extraction.
//!
//! Team pages are JSON documents listing player profiles under
//! `profileGroups[0].profiles`; each profile's relative `url` is joined onto
//! the site origin. Player pages are HTML: the profile comes from the
//! embedded `application/ld+json` block and the statistics from the page's
//! tables (see [`crate::table`]).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{ExtractError, Extraction, decode_json, require_array};
use crate::fetch::FetchResponse;
use crate::html::selector;
use crate::table::{StatsTable, TableKind, extract_tables};

const PROFILES: &str = "/profileGroups/0/profiles";
const PROFILE_SCRIPT_CSS: &str = r#"script[type="application/ld+json"]"#;

static PROFILE_SCRIPT: LazyLock<Selector> = LazyLock::new(|| selector(PROFILE_SCRIPT_CSS));

/// Placeholder for a profile without a canonical URL.
const NO_URL: &str = "-";

/// Biographical details of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub family_name: String,
    pub given_name: String,
    pub url: String,
    pub birth_date: String,
    pub birth_place: String,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    /// Playing position (`jobTitle`).
    pub role: String,
}

/// Everything extracted from one player page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub profile: Option<PlayerProfile>,
    pub stats: BTreeMap<TableKind, StatsTable>,
}

impl PlayerRecord {
    /// True when neither a profile nor any non-empty table was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.stats.values().all(StatsTable::is_empty)
    }
}

/// Collects absolute player page URLs from a batch of team pages.
///
/// Pages without a profile list are logged and skipped; profiles without a
/// usable `url` are dropped.
#[instrument(skip(responses, origin), fields(responses = responses.len(), origin = %origin))]
pub fn extract_profile_urls(responses: &[FetchResponse], origin: &Url) -> Vec<String> {
    let mut urls = Extraction::new();
    for response in responses {
        match team_profiles(response, origin) {
            Ok(team) => {
                debug!(url = %response.url, players = team.items().len(), "team profile list read");
                urls.merge(team);
            }
            Err(error) => warn!(error = %error, "unable to extract profile list"),
        }
    }
    urls.finish("player urls")
}

fn team_profiles(response: &FetchResponse, origin: &Url) -> Result<Extraction<String>, ExtractError> {
    let body = decode_json(response)?;
    let profiles = require_array(&body, PROFILES, &response.url)?;
    Ok(profiles
        .iter()
        .enumerate()
        .map(|(i, profile)| profile_url(profile, origin, &response.url, i + 1))
        .collect())
}

fn profile_url(
    profile: &Value,
    origin: &Url,
    source: &str,
    position: usize,
) -> Result<String, ExtractError> {
    let record = || format!("profile {position}");
    let href = profile
        .get("url")
        .and_then(Value::as_str)
        .filter(|href| !href.trim().is_empty())
        .ok_or_else(|| ExtractError::projection(source, record(), "missing `url`"))?;
    origin
        .join(href.trim())
        .map(|url| url.to_string())
        .map_err(|e| ExtractError::projection(source, record(), e))
}

/// Parses every player page, dropping pages that yield nothing.
#[instrument(skip(responses), fields(responses = responses.len()))]
pub fn extract_players(responses: &[FetchResponse]) -> Vec<PlayerRecord> {
    let records: Vec<PlayerRecord> = responses.iter().filter_map(extract_player).collect();
    info!(
        parsed = records.len(),
        skipped = responses.len() - records.len(),
        "player pages parsed"
    );
    records
}

/// Parses one player page into a profile and its statistics tables.
///
/// The profile is optional: a page without a readable structured-data block
/// still contributes its tables. Returns `None` only when the page yields
/// neither.
#[instrument(skip(response), fields(url = %response.url))]
pub fn extract_player(response: &FetchResponse) -> Option<PlayerRecord> {
    let document = Html::parse_document(&response.body);

    let profile = match player_profile(&document, &response.url) {
        Ok(profile) => Some(profile),
        Err(error) => {
            warn!(error = %error, "player profile unavailable");
            None
        }
    };
    let stats = extract_tables(&document);

    let record = PlayerRecord { profile, stats };
    if record.is_empty() {
        warn!("player page yielded no data");
        return None;
    }
    Some(record)
}

fn player_profile(document: &Html, url: &str) -> Result<PlayerProfile, ExtractError> {
    let script = document
        .select(&PROFILE_SCRIPT)
        .next()
        .ok_or_else(|| ExtractError::missing_path(url, PROFILE_SCRIPT_CSS))?;

    let raw: String = script.text().collect();
    if raw.trim().is_empty() {
        return Err(ExtractError::missing_path(url, PROFILE_SCRIPT_CSS));
    }

    let data = parse_structured_data(raw.trim()).map_err(|e| ExtractError::invalid_json(url, e))?;
    let person = match &data {
        Value::Array(items) => items.iter().find(|item| item.is_object()),
        Value::Object(_) => Some(&data),
        _ => None,
    }
    .ok_or_else(|| ExtractError::projection(url, "player profile", "structured data is not an object"))?;

    Ok(project_profile(person))
}

/// Decodes an ld+json block, retrying as JSON5 when strict JSON rejects it.
///
/// Hand-edited blocks sometimes carry trailing commas, single quotes or
/// comments. The strict error is the one reported when both parsers fail.
fn parse_structured_data(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw).or_else(|strict| {
        json5::from_str::<Value>(raw).map_err(|lenient| {
            debug!(error = %lenient, "JSON5 fallback also rejected structured data");
            strict
        })
    })
}

/// Maps a schema.org `Person` object onto [`PlayerProfile`], defaulting
/// whatever is missing.
fn project_profile(person: &Value) -> PlayerProfile {
    let mut defaulted: Vec<&str> = Vec::new();
    let mut text = |key: &'static str| {
        text_field(person, key).unwrap_or_else(|| {
            defaulted.push(key);
            String::new()
        })
    };

    let name = text("name");
    let family_name = text("familyName");
    let given_name = text("givenName");
    let birth_date = text("birthDate");
    let role = text("jobTitle");

    let url = text_field(person, "url").unwrap_or_else(|| NO_URL.to_string());
    let birth_place = birth_place(person).unwrap_or_default();
    let height = measurement(person, "height").unwrap_or_default();
    let weight = measurement(person, "weight").unwrap_or_default();

    if !defaulted.is_empty() {
        debug!(fields = ?defaulted, "profile fields defaulted");
    }

    PlayerProfile {
        name,
        family_name,
        given_name,
        url,
        birth_date,
        birth_place,
        height,
        weight,
        role,
    }
}

fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

/// `birthPlace.address`, or `birthPlace` itself when it is a plain string.
fn birth_place(person: &Value) -> Option<String> {
    match person.get("birthPlace")? {
        Value::String(place) => Some(place.trim().to_string()),
        place => text_field(place, "address"),
    }
}

/// `{key}.value`, or `{key}` itself when it is a bare quantity.
fn measurement(person: &Value, key: &str) -> Option<f64> {
    let field = person.get(key)?;
    field.get("value").map_or_else(|| quantity(field), quantity)
}

/// A number, or a string holding one with an optional unit suffix (`"180 cm"`).
fn quantity(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
            .parse()
            .ok(),
        _ => None,
    }
}
