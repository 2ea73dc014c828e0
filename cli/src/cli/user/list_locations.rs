//! The list locations command (`ll`).

use super::trim_row_end;
use crate::cli::{self, err, get_writer, reports::locations as reports, ReportArgs};
use clap::{ArgMatches, Command};
use weather_job_lib::prelude::WeatherData;

/// The list locations command name.
pub(super) const COMMAND_NAME: &'static str = "ll";

/// Create the list locations command.
///
pub(super) fn command() -> Command {
    Command::new(COMMAND_NAME)
        .about("List the locations the job is configured to fetch.")
        .args(ReportArgs::get())
        .group(ReportArgs::arg_group())
}

/// Executes the list locations command.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `args` contains the list locations command arguments.
///
pub(super) fn execute(weather_data: &WeatherData, args: ArgMatches) -> cli::Result<()> {
    let locations = weather_data.get_locations();
    let report_args = ReportArgs::new(&args);
    let report = if report_args.csv() {
        reports::csv::Report::default().generate(locations)
    } else if report_args.json() {
        match report_args.pretty() {
            true => reports::json::Report::pretty_printed(),
            false => reports::json::Report::default(),
        }
        .generate(locations)
    } else {
        reports::text::Report::default()
            .generate(locations)
            .into_iter()
            .map(|row| trim_row_end!(row))
            .collect::<Vec<String>>()
            .join("\n")
    };
    let mut writer = get_writer(&report_args)?;
    match writer.write_all(report.as_bytes()) {
        Ok(_) => Ok(()),
        Err(error) => err!("List locations error writing report: {:?}", error),
    }
}
