//! Two-stage player crawl.
//!
//! Team pages are fetched first; the player links they list are then
//! fetched under a stricter concurrency and rate budget and parsed into
//! [`PlayerRecord`]s. Stage transitions:
//!
//! ```text
//! Start -> TeamPages -> PlayerUrls -> PlayerPages -> Done
//!   |                       |             |
//!   +--------> Failed <-----+-------------+
//! ```

use tracing::{error, info, instrument, warn};
use url::Url;

use super::{PipelineError, Stage};
use crate::config::Settings;
use crate::extract::{PlayerRecord, extract_players, extract_profile_urls};
use crate::fetch::{FetchLimits, FetchResponse, FetchTask, PageFetcher};

/// Everything a crawl needs, resolved from settings up front.
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    team_urls: Vec<String>,
    origin: Url,
    team_limits: FetchLimits,
    player_limits: FetchLimits,
}

impl CrawlPlan {
    #[must_use]
    pub fn new(
        team_urls: Vec<String>,
        origin: Url,
        team_limits: FetchLimits,
        player_limits: FetchLimits,
    ) -> Self {
        Self {
            team_urls,
            origin,
            team_limits,
            player_limits,
        }
    }

    /// Builds the plan from the `[players]` section and the team list.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] when the section or team list is
    /// missing or the template does not expand, and
    /// [`PipelineError::Limits`] for out-of-range limits.
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        let section = settings.players()?;
        let team_ids = settings.team_ids(section.comp_id)?;
        Ok(Self {
            team_urls: section.team_urls(&team_ids)?,
            origin: settings.origin()?,
            team_limits: FetchLimits::new(Some(section.team_max_concurrent), None)?,
            player_limits: FetchLimits::new(
                Some(section.player_max_concurrent),
                Some(section.player_max_per_second),
            )?,
        })
    }

    #[must_use]
    pub fn team_urls(&self) -> &[String] {
        &self.team_urls
    }
}

enum CrawlState {
    Start,
    TeamPages(Vec<FetchResponse>),
    PlayerUrls(Vec<String>),
    PlayerPages(Vec<FetchResponse>),
    Done(Vec<PlayerRecord>),
    Failed(Stage),
}

/// Runs the crawl described by `plan`.
///
/// # Errors
///
/// Returns [`PipelineError::NoData`] naming the first stage that came back
/// empty; later stages are not attempted.
#[instrument(skip_all, fields(teams = plan.team_urls.len()))]
pub async fn crawl_players(
    plan: &CrawlPlan,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<PlayerRecord>, PipelineError> {
    let mut state = CrawlState::Start;
    loop {
        state = match state {
            CrawlState::Start => {
                info!("fetching team pages");
                let tasks = FetchTask::enumerate(plan.team_urls.iter().cloned());
                let pages = fetcher.fetch_all(tasks, plan.team_limits).await;
                if pages.is_empty() {
                    CrawlState::Failed(Stage::TeamPages)
                } else {
                    CrawlState::TeamPages(pages)
                }
            }
            CrawlState::TeamPages(pages) => {
                CrawlState::PlayerUrls(extract_profile_urls(&pages, &plan.origin))
            }
            CrawlState::PlayerUrls(urls) => {
                if urls.is_empty() {
                    warn!("team pages listed no players");
                    CrawlState::Failed(Stage::PlayerPages)
                } else {
                    info!(players = urls.len(), "fetching player pages");
                    let pages = fetcher
                        .fetch_all(FetchTask::enumerate(urls), plan.player_limits)
                        .await;
                    if pages.is_empty() {
                        CrawlState::Failed(Stage::PlayerPages)
                    } else {
                        CrawlState::PlayerPages(pages)
                    }
                }
            }
            CrawlState::PlayerPages(pages) => {
                let records = extract_players(&pages);
                if records.is_empty() {
                    CrawlState::Failed(Stage::PlayerRecords)
                } else {
                    CrawlState::Done(records)
                }
            }
            CrawlState::Done(records) => {
                info!(players = records.len(), "crawl complete");
                return Ok(records);
            }
            CrawlState::Failed(stage) => {
                error!(%stage, "crawl stopped");
                return Err(PipelineError::NoData { stage });
            }
        };
    }
}

/// Plans and runs the player crawl from settings.
///
/// # Errors
///
/// See [`CrawlPlan::from_settings`] and [`crawl_players`].
pub async fn run_players(
    settings: &Settings,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<PlayerRecord>, PipelineError> {
    let plan = CrawlPlan::from_settings(settings)?;
    crawl_players(&plan, fetcher).await
}
