//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use nrl_scraper_core::output::DEFAULT_OUTPUT_DIR;

/// Scrape NRL ladders, team statistics and player profiles to JSON.
#[derive(Parser, Debug)]
#[command(name = "nrl-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Data set to scrape
    #[arg(value_enum)]
    pub pipeline: Pipeline,

    /// Settings file
    #[arg(short, long, default_value = "env.toml")]
    pub config: PathBuf,

    /// Directory the JSON snapshot is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Append logs to this file instead of stderr (overrides `log_file` in settings)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Which pipeline to run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Competition ladder for the configured round
    Ladder,
    /// Profiles and statistics tables of every listed team's players
    Players,
    /// Team leader boards for the configured statistics
    #[value(alias = "team_stats")]
    TeamStats,
}

impl Args {
    /// Default log level from the verbosity flags.
    ///
    /// Priority: quiet flag > verbose flag > default (info). `RUST_LOG`
    /// overrides all of these at subscriber init.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_pipeline_defaults() {
        let args = Args::try_parse_from(["nrl-scraper", "ladder"]).unwrap();
        assert_eq!(args.pipeline, Pipeline::Ladder);
        assert_eq!(args.config, PathBuf::from("env.toml"));
        assert_eq!(args.output_dir, PathBuf::from("data"));
        assert!(args.log_file.is_none());
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_cli_team_stats_spellings() {
        for spelling in ["team-stats", "team_stats"] {
            let args = Args::try_parse_from(["nrl-scraper", spelling]).unwrap();
            assert_eq!(args.pipeline, Pipeline::TeamStats);
        }
    }

    #[test]
    fn test_cli_missing_pipeline_is_error() {
        let err = Args::try_parse_from(["nrl-scraper"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_unknown_pipeline_is_error() {
        let err = Args::try_parse_from(["nrl-scraper", "fixtures"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_extra_positional_is_error() {
        assert!(Args::try_parse_from(["nrl-scraper", "ladder", "players"]).is_err());
    }

    #[test]
    fn test_cli_paths() {
        let args = Args::try_parse_from([
            "nrl-scraper",
            "players",
            "-c",
            "conf/nrl.toml",
            "-o",
            "out",
            "--log-file",
            "out/app.log",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("conf/nrl.toml"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.log_file, Some(PathBuf::from("out/app.log")));
    }

    #[test]
    fn test_cli_log_levels() {
        let args = Args::try_parse_from(["nrl-scraper", "ladder", "-v"]).unwrap();
        assert_eq!(args.log_level(), "debug");

        let args = Args::try_parse_from(["nrl-scraper", "ladder", "-vv"]).unwrap();
        assert_eq!(args.log_level(), "trace");

        let args = Args::try_parse_from(["nrl-scraper", "ladder", "-q", "-vv"]).unwrap();
        assert_eq!(args.log_level(), "error");
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["nrl-scraper", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
