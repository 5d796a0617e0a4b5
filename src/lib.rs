//! NRL Scraper Core Library
//!
//! Scrapes competition ladders, team statistics and player profiles from the
//! NRL website and turns them into JSON-ready records.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - Concurrent, rate-limited HTTP fetching
//! - [`extract`] - Projection of JSON responses and player pages into records
//! - [`table`] - Classification and normalization of player statistics tables
//! - [`pipeline`] - Ladder, team stats and two-stage player crawl
//! - [`config`] - TOML settings and URL templates
//! - [`output`] - Timestamped JSON snapshots

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod extract;
pub mod fetch;
mod html;
pub mod output;
pub mod pipeline;
pub mod table;

// Re-export commonly used types
pub use config::{ConfigError, Settings};
pub use extract::{ExtractError, LadderEntry, PlayerRecord, StatCategory};
pub use fetch::{BatchFetcher, FetchError, FetchLimits, FetchResponse, FetchTask, PageFetcher};
pub use output::{OutputError, write_snapshot};
pub use pipeline::{PipelineError, Stage, run_ladder, run_players, run_team_stats};
pub use table::{StatsTable, TableKind};
