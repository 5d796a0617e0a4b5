//! Settings file loading.
//!
//! Every pipeline reads its endpoint templates and identifiers from one TOML
//! file (`env.toml` by default). Sections for pipelines that are not run may
//! be absent; the section for the selected pipeline is checked on access.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Site origin that relative player links are resolved against.
pub const DEFAULT_ORIGIN: &str = "https://www.nrl.com";

const DEFAULT_TEAM_MAX_CONCURRENT: usize = 5;
const DEFAULT_PLAYER_MAX_CONCURRENT: usize = 10;
const DEFAULT_PLAYER_MAX_PER_SECOND: u32 = 5;
const DEFAULT_TEAM_STATS_MAX_PER_SECOND: u32 = 5;

/// Errors raised while loading or reading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings are not valid TOML or miss a required key.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The selected pipeline has no section.
    #[error("settings have no [{section}] section")]
    MissingSection { section: &'static str },

    /// No teams are listed for a competition.
    #[error("settings list no teams for competition {comp_id} (expected [[teams.\"{comp_id}\"]])")]
    MissingTeams { comp_id: u64 },

    /// A URL template references a placeholder with no value.
    #[error("unresolved placeholder `{{{placeholder}}}` in template '{template}'")]
    Template {
        template: String,
        placeholder: String,
    },

    /// A configured header cannot be sent over HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The configured site origin is not an absolute URL.
    #[error("invalid origin '{value}': {source}")]
    InvalidOrigin {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Shared request settings.
    pub web: WebSettings,
    /// Appends log events to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// `[ladder]` section; required only by the ladder pipeline.
    #[serde(default)]
    pub ladder: Option<LadderSettings>,
    #[serde(default)]
    pub players: Option<PlayerSettings>,
    #[serde(default)]
    pub team_stats: Option<TeamStatsSettings>,
    /// Teams per competition id (TOML keys are strings).
    #[serde(default)]
    pub teams: BTreeMap<String, Vec<TeamEntry>>,
}

/// Request headers and the site origin.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSettings {
    /// Sent verbatim on every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Base that relative player profile links are joined onto.
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// `[ladder]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LadderSettings {
    /// Template with `{comp_id}`, `{round_num}` and `{year}`.
    pub base_url: String,
    /// Competition id substituted for `{comp_id}`.
    pub comp_id: u64,
    /// Round the ladder is taken after.
    pub round: u32,
    /// Season.
    pub year: u32,
    /// Snapshot name, without the `.json` extension.
    pub filename: String,
}

/// `[players]` section. The team list comes from `[teams]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSettings {
    /// Team page template with `{comp_id}` and `{id}`.
    pub base_url: String,
    pub comp_id: u64,
    pub filename: String,
    /// In-flight cap for team page requests.
    #[serde(default = "default_team_max_concurrent")]
    pub team_max_concurrent: usize,
    /// In-flight cap for player page requests.
    #[serde(default = "default_player_max_concurrent")]
    pub player_max_concurrent: usize,
    /// Player page starts allowed per second.
    #[serde(default = "default_player_max_per_second")]
    pub player_max_per_second: u32,
}

/// `[team_stats]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamStatsSettings {
    /// Template with `{comp_id}`, `{year}` and `{id}`.
    pub base_url: String,
    pub comp_id: u64,
    pub year: u32,
    /// Statistic ids, one request each.
    pub ids: Vec<u64>,
    pub filename: String,
    /// Statistic request starts allowed per second.
    #[serde(default = "default_team_stats_max_per_second")]
    pub max_per_second: u32,
}

/// One `[[teams."<comp_id>"]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamEntry {
    /// Site id substituted for `{id}` in the team page template.
    pub team_id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_team_max_concurrent() -> usize {
    DEFAULT_TEAM_MAX_CONCURRENT
}

fn default_player_max_concurrent() -> usize {
    DEFAULT_PLAYER_MAX_CONCURRENT
}

fn default_player_max_per_second() -> u32 {
    DEFAULT_PLAYER_MAX_PER_SECOND
}

fn default_team_stats_max_per_second() -> u32 {
    DEFAULT_TEAM_STATS_MAX_PER_SECOND
}

impl Settings {
    /// Reads and validates the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// misses a required key, or carries an invalid header or origin.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] or [`ConfigError::InvalidOrigin`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.header_map()?;
        self.origin()?;
        Ok(())
    }

    /// Configured request headers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] for a name or value that is
    /// not valid in HTTP.
    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::with_capacity(self.web.headers.len());
        for (name, value) in &self.web.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    /// Site origin as a URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrigin`] if it does not parse.
    pub fn origin(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.web.origin).map_err(|source| ConfigError::InvalidOrigin {
            value: self.web.origin.clone(),
            source,
        })
    }

    /// The `[ladder]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when absent.
    pub fn ladder(&self) -> Result<&LadderSettings, ConfigError> {
        self.ladder
            .as_ref()
            .ok_or(ConfigError::MissingSection { section: "ladder" })
    }

    /// The `[players]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when absent.
    pub fn players(&self) -> Result<&PlayerSettings, ConfigError> {
        self.players
            .as_ref()
            .ok_or(ConfigError::MissingSection { section: "players" })
    }

    /// The `[team_stats]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when absent.
    pub fn team_stats(&self) -> Result<&TeamStatsSettings, ConfigError> {
        self.team_stats
            .as_ref()
            .ok_or(ConfigError::MissingSection {
                section: "team_stats",
            })
    }

    /// Team ids listed for `comp_id`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTeams`] when none are listed.
    pub fn team_ids(&self, comp_id: u64) -> Result<Vec<u64>, ConfigError> {
        let ids: Vec<u64> = self
            .teams
            .get(&comp_id.to_string())
            .map(|teams| teams.iter().map(|team| team.team_id).collect())
            .unwrap_or_default();
        if ids.is_empty() {
            return Err(ConfigError::MissingTeams { comp_id });
        }
        Ok(ids)
    }
}

impl LadderSettings {
    /// The ladder endpoint for the configured round.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] for an unknown placeholder.
    pub fn url(&self) -> Result<String, ConfigError> {
        expand_template(
            &self.base_url,
            &[
                ("comp_id", self.comp_id.to_string()),
                ("round_num", self.round.to_string()),
                ("year", self.year.to_string()),
            ],
        )
    }
}

impl PlayerSettings {
    /// One team page URL per id, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] for an unknown placeholder.
    pub fn team_urls(&self, team_ids: &[u64]) -> Result<Vec<String>, ConfigError> {
        team_ids
            .iter()
            .map(|id| {
                expand_template(
                    &self.base_url,
                    &[("comp_id", self.comp_id.to_string()), ("id", id.to_string())],
                )
            })
            .collect()
    }
}

impl TeamStatsSettings {
    /// One endpoint URL per statistic id, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] for an unknown placeholder.
    pub fn urls(&self) -> Result<Vec<String>, ConfigError> {
        self.ids
            .iter()
            .map(|id| {
                expand_template(
                    &self.base_url,
                    &[
                        ("comp_id", self.comp_id.to_string()),
                        ("year", self.year.to_string()),
                        ("id", id.to_string()),
                    ],
                )
            })
            .collect()
    }
}

/// Replaces every `{key}` in `template` with its value.
///
/// Values may be used any number of times (or not at all). Text outside
/// braces is copied as is.
///
/// # Errors
///
/// Returns [`ConfigError::Template`] for a placeholder with no value or an
/// unclosed brace.
///
/// ```
/// use nrl_scraper_core::config::expand_template;
///
/// let url = expand_template("/data?comp={comp_id}&team={id}", &[
///     ("comp_id", "111".to_string()),
///     ("id", "500011".to_string()),
/// ])
/// .unwrap();
/// assert_eq!(url, "/data?comp=111&team=500011");
/// ```
pub fn expand_template(template: &str, values: &[(&str, String)]) -> Result<String, ConfigError> {
    let unresolved = |placeholder: &str| ConfigError::Template {
        template: template.to_string(),
        placeholder: placeholder.to_string(),
    };

    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return Err(unresolved(after));
        };
        let key = &after[..close];
        let (_, value) = values
            .iter()
            .find(|(name, _)| *name == key)
            .ok_or_else(|| unresolved(key))?;
        expanded.push_str(value);
        rest = &after[close + 1..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}
