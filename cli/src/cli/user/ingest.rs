//! The ingest command, the entry point a task scheduler runs.
//!
//! The command fetches hourly observations for every configured location
//! and upserts them into the store. A location that fails is reported and
//! logged but does not fail the command, the run succeeds as long as the
//! store is left in a consistent state. Configuration and store problems
//! do fail the command so the scheduler sees a non-zero exit.

use crate::cli;
use clap::{ArgMatches, Command};
use weather_job_lib::prelude::WeatherData;

/// The ingest command name.
pub(super) const COMMAND_NAME: &'static str = "ingest";

/// Create the ingest command.
///
pub(super) fn command() -> Command {
    Command::new(COMMAND_NAME).about("Fetch hourly weather observations and update the store.")
}

/// Executes the ingest command.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `args` contains the ingest command arguments.
///
pub(super) fn execute(weather_data: &WeatherData, _args: ArgMatches) -> cli::Result<()> {
    let report = weather_data.ingest()?;
    for outcome in &report.outcomes {
        match &outcome.failure {
            None => {
                println!(
                    "{}: {} hours fetched, {} written ({}).",
                    outcome.location, outcome.fetched, outcome.written, outcome.range
                );
            }
            Some(failure) => {
                println!("{}: FAILED ({}) - {}", outcome.location, outcome.range, failure);
            }
        }
    }
    println!(
        "{} locations processed, {} failures, {} hours written.",
        report.outcomes.len(),
        report.failures(),
        report.hours_written()
    );
    Ok(())
}
