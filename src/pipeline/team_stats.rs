//! Team statistics pipeline: one rate-limited request per statistic id.

use tracing::{error, info, instrument};

use super::{PipelineError, Stage};
use crate::config::Settings;
use crate::extract::{StatCategory, extract_team_stats};
use crate::fetch::{FetchLimits, FetchTask, PageFetcher};

/// Fetches every configured statistic and extracts its leader board.
///
/// # Errors
///
/// Returns [`PipelineError::NoData`] if every request fails or no category
/// can be extracted, and [`PipelineError::Config`]/[`PipelineError::Limits`]
/// for unusable settings.
#[instrument(skip_all)]
pub async fn run_team_stats(
    settings: &Settings,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<StatCategory>, PipelineError> {
    let section = settings.team_stats()?;
    let urls = section.urls()?;
    let limits = FetchLimits::new(None, Some(section.max_per_second))?;
    info!(stats = urls.len(), year = section.year, "fetching team stats");

    let pages = fetcher.fetch_all(FetchTask::enumerate(urls), limits).await;
    if pages.is_empty() {
        error!("no team stats page could be fetched");
        return Err(PipelineError::NoData {
            stage: Stage::TeamStatsFetch,
        });
    }

    let categories = extract_team_stats(&pages);
    if categories.is_empty() {
        error!("no stat category could be extracted");
        return Err(PipelineError::NoData {
            stage: Stage::TeamStatsExtract,
        });
    }
    Ok(categories)
}
