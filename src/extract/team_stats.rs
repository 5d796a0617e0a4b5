//! Team statistics extraction.
//!
//! Each stat endpoint answers with `{"totalStats": {"title": .., "leaders": [..]}}`.
//! Responses missing `totalStats` are skipped; leaders that fail projection
//! are dropped from their category.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use super::{ExtractError, Extraction, decode_json, require_path};
use crate::fetch::FetchResponse;

const TOTAL_STATS: &str = "/totalStats";

/// One team's value for a statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatLeader {
    /// Team nickname.
    #[serde(rename(deserialize = "teamNickName"))]
    pub team: String,
    /// Season total for the statistic.
    pub value: f64,
    /// Matches the total was accumulated over.
    pub played: i64,
}

/// A statistic and its ordered leader board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCategory {
    /// Statistic title (e.g. `Line Breaks`).
    pub stat: String,
    /// Teams in the order the site ranks them.
    pub leaders: Vec<TeamStatLeader>,
}

/// Extracts every stat category from a batch of responses.
#[instrument(skip(responses), fields(responses = responses.len()))]
pub fn extract_team_stats(responses: &[FetchResponse]) -> Vec<StatCategory> {
    let mut categories = Extraction::new();
    for response in responses {
        match total_stats(response) {
            Ok(raw) => categories.merge(raw),
            Err(error) => warn!(error = %error, "error unpacking team stats response"),
        }
    }
    categories.finish("stat categories")
}

fn total_stats(response: &FetchResponse) -> Result<Extraction<StatCategory>, ExtractError> {
    let body = decode_json(response)?;
    let total = require_path(&body, TOTAL_STATS, &response.url)?;

    // Usually a single category object; tolerate a list of them.
    let raw: Vec<&Value> = match total {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    Ok(raw
        .into_iter()
        .map(|category| project_category(category, &response.url))
        .collect())
}

fn project_category(value: &Value, url: &str) -> Result<StatCategory, ExtractError> {
    let stat = value
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| ExtractError::projection(url, "stat category", "missing `title`"))?
        .to_string();
    let raw_leaders = value
        .get("leaders")
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractError::projection(url, format!("stat {stat:?}"), "missing `leaders`"))?;

    let leaders: Extraction<TeamStatLeader> = raw_leaders
        .iter()
        .enumerate()
        .map(|(i, leader)| {
            TeamStatLeader::deserialize(leader).map_err(|e| {
                ExtractError::projection(url, format!("stat {stat:?} leader {}", i + 1), e)
            })
        })
        .collect();

    Ok(StatCategory {
        leaders: leaders.finish("stat leaders"),
        stat,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(url: &str, body: Value) -> FetchResponse {
        FetchResponse {
            url: url.to_string(),
            index: None,
            status: 200,
            body: body.to_string(),
        }
    }

    fn category(title: &str) -> Value {
        json!({"totalStats": {
            "title": title,
            "leaders": [
                {"teamNickName": "Panthers", "value": 412, "played": 12},
                {"teamNickName": "Storm", "value": 398.5, "played": 12},
            ]
        }})
    }

    #[test]
    fn test_extract_team_stats_projects_categories() {
        let responses = [
            response("https://a.test/1", category("Tries")),
            response("https://a.test/2", category("Line Breaks")),
        ];
        let stats = extract_team_stats(&responses);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].stat, "Tries");
        assert_eq!(stats[0].leaders.len(), 2);
        assert_eq!(stats[0].leaders[0].team, "Panthers");
        assert!((stats[0].leaders[1].value - 398.5).abs() < f64::EPSILON);
        assert_eq!(stats[0].leaders[1].played, 12);
    }

    #[test]
    fn test_response_without_total_stats_is_skipped() {
        let responses = [
            response("https://a.test/1", json!({"other": 1})),
            response("https://a.test/2", category("Tries")),
            FetchResponse {
                body: "<html>".to_string(),
                ..response("https://a.test/3", json!({}))
            },
        ];
        let stats = extract_team_stats(&responses);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].stat, "Tries");
    }

    #[test]
    fn test_bad_leader_is_dropped_not_category() {
        let body = json!({"totalStats": {
            "title": "Tackles",
            "leaders": [
                {"teamNickName": "Panthers", "value": 400, "played": 12},
                {"teamNickName": "Storm", "value": "lots"},
            ]
        }});
        let stats = extract_team_stats(&[response("https://a.test/1", body)]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].leaders.len(), 1);
    }

    #[test]
    fn test_category_without_title_is_dropped() {
        let body = json!({"totalStats": {"leaders": []}});
        assert!(extract_team_stats(&[response("https://a.test/1", body)]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let stats = extract_team_stats(&[response("https://a.test/1", category("Tries"))]);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value[0]["stat"], "Tries");
        assert_eq!(value[0]["leaders"][0]["team"], "Panthers");
        assert_eq!(value[0]["leaders"][0]["value"], 412.0);
    }
}
