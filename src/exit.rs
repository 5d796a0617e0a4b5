//! Process exit outcomes.

use std::process::ExitCode;

use nrl_scraper_core::PipelineError;

/// Printed to stderr when a pipeline yields nothing.
pub(crate) const NO_DATA_MESSAGE: &str = "No data found. Program Terminated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ProcessExit {
    Success = 0,
    NoData = 1,
}

impl From<ProcessExit> for ExitCode {
    fn from(outcome: ProcessExit) -> Self {
        ExitCode::from(outcome as u8)
    }
}

/// Maps a pipeline failure to an exit outcome.
///
/// An empty stage is an expected outcome; anything else is handed back to
/// be reported as an error.
pub(crate) fn determine_exit_outcome(error: PipelineError) -> Result<ProcessExit, PipelineError> {
    if error.is_no_data() {
        Ok(ProcessExit::NoData)
    } else {
        Err(error)
    }
}
