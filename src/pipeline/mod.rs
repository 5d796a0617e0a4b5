//! End-to-end pipelines: settings in, records out.
//!
//! Each pipeline builds its URLs from [`Settings`](crate::config::Settings),
//! fetches through a [`PageFetcher`](crate::fetch::PageFetcher) and hands the
//! responses to the matching extractor. Individual request and record
//! failures never surface here; a pipeline only fails when a whole stage
//! comes back empty ([`PipelineError::NoData`]) or the settings are unusable.

pub mod ladder;
pub mod players;
pub mod team_stats;

#[cfg(test)]
pub(crate) mod fake;

pub use ladder::run_ladder;
pub use players::{CrawlPlan, crawl_players, run_players};
pub use team_stats::run_team_stats;

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;

/// The stage that came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The ladder request returned nothing usable.
    LadderFetch,
    /// The ladder response held no positions.
    LadderExtract,
    /// Every statistic request failed.
    TeamStatsFetch,
    /// No statistic category could be read.
    TeamStatsExtract,
    /// No team page yielded a player URL.
    TeamPages,
    /// Every player page request failed.
    PlayerPages,
    /// Player pages came back but none parsed.
    PlayerRecords,
}

impl Stage {
    /// Short lowercase label used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LadderFetch => "ladder fetch",
            Self::LadderExtract => "ladder extraction",
            Self::TeamStatsFetch => "team stats fetch",
            Self::TeamStatsExtract => "team stats extraction",
            Self::TeamPages => "team page fetch",
            Self::PlayerPages => "player page fetch",
            Self::PlayerRecords => "player extraction",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage produced nothing; later stages were not attempted.
    #[error("{stage} produced no data")]
    NoData { stage: Stage },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configured limits are out of range.
    #[error("invalid fetch limits: {0}")]
    Limits(#[from] FetchError),
}

impl PipelineError {
    /// True for the empty-stage outcome, as opposed to a setup error.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
