//! CLI entry point for the NRL scraper.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use nrl_scraper_core::{
    BatchFetcher, Settings, run_ladder, run_players, run_team_stats, write_snapshot,
};
use serde::Serialize;
use tracing::{debug, info};

mod cli;
mod exit;
mod logging;

use cli::{Args, Pipeline};
use exit::{NO_DATA_MESSAGE, ProcessExit, determine_exit_outcome};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from '{}'", args.config.display()))?;

    let log_file = args.log_file.as_deref().or(settings.log_file.as_deref());
    logging::init(args.log_level(), log_file)?;

    debug!(?args, "CLI arguments parsed");
    info!(pipeline = ?args.pipeline, "NRL scraper starting");

    let fetcher = BatchFetcher::new(settings.header_map()?);
    let outcome = match args.pipeline {
        Pipeline::Ladder => match run_ladder(&settings, &fetcher).await {
            Ok(entries) => save(&args.output_dir, &settings.ladder()?.filename, &entries)?,
            Err(error) => determine_exit_outcome(error)?,
        },
        Pipeline::Players => match run_players(&settings, &fetcher).await {
            Ok(records) => save(&args.output_dir, &settings.players()?.filename, &records)?,
            Err(error) => determine_exit_outcome(error)?,
        },
        Pipeline::TeamStats => match run_team_stats(&settings, &fetcher).await {
            Ok(categories) => {
                save(&args.output_dir, &settings.team_stats()?.filename, &categories)?
            }
            Err(error) => determine_exit_outcome(error)?,
        },
    };

    if outcome == ProcessExit::NoData {
        eprintln!("{NO_DATA_MESSAGE}");
    }
    Ok(outcome.into())
}

fn save<T: Serialize>(dir: &Path, filename: &str, data: &T) -> Result<ProcessExit> {
    let path = write_snapshot(dir, filename, data)
        .with_context(|| format!("Failed to save snapshot '{filename}'"))?;
    println!("File saved to JSON at '{}'", path.display());
    Ok(ProcessExit::Success)
}

