//! Ladder pipeline: one request, one list of positions.

use tracing::{error, info, instrument};

use super::{PipelineError, Stage};
use crate::config::Settings;
use crate::extract::{LadderEntry, extract_ladder};
use crate::fetch::{FetchLimits, FetchTask, PageFetcher};

/// Fetches and extracts the configured round's ladder.
///
/// # Errors
///
/// Returns [`PipelineError::NoData`] if the request fails or yields no
/// positions, and [`PipelineError::Config`] if the `[ladder]` section is
/// missing or its template does not expand.
#[instrument(skip_all)]
pub async fn run_ladder(
    settings: &Settings,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<LadderEntry>, PipelineError> {
    let section = settings.ladder()?;
    let url = section.url()?;
    info!(%url, round = section.round, year = section.year, "fetching ladder");

    let task = FetchTask::new(url).with_label("ladder");
    let responses = fetcher.fetch_all(vec![task], FetchLimits::unlimited()).await;
    let Some(response) = responses.first() else {
        error!("ladder request failed");
        return Err(PipelineError::NoData {
            stage: Stage::LadderFetch,
        });
    };

    match extract_ladder(response) {
        Some(entries) if !entries.is_empty() => {
            info!(teams = entries.len(), "ladder extracted");
            Ok(entries)
        }
        _ => {
            error!("ladder response held no positions");
            Err(PipelineError::NoData {
                stage: Stage::LadderExtract,
            })
        }
    }
}
