//! The list summary command (`ls`).

use super::trim_row_end;
use crate::cli::{self, err, get_writer, reports::summary as reports, ReportArgs};
use clap::{ArgMatches, Command};
use weather_job_lib::prelude::WeatherData;

/// The list summary command name.
pub(super) const COMMAND_NAME: &'static str = "ls";

/// Create the list summary command.
///
pub(super) fn command() -> Command {
    Command::new(COMMAND_NAME)
        .about("Show a summary of the observations each location has in the store.")
        .args(ReportArgs::get())
        .group(ReportArgs::arg_group())
}

/// Executes the list summary command.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `args` contains the list summary command arguments.
///
pub(super) fn execute(weather_data: &WeatherData, args: ArgMatches) -> cli::Result<()> {
    let summaries = match weather_data.get_summaries() {
        Ok(summaries) => summaries,
        Err(error) => err!("List summary error getting store summaries: {:?}", error)?,
    };
    let report_args = ReportArgs::new(&args);
    let report = if report_args.csv() {
        reports::csv::Report::default().generate(summaries)
    } else if report_args.json() {
        match report_args.pretty() {
            true => reports::json::Report::pretty_printed(),
            false => reports::json::Report::default(),
        }
        .generate(summaries)
    } else {
        reports::text::Report::default()
            .generate(summaries)
            .into_iter()
            .map(|row| trim_row_end!(row))
            .collect::<Vec<String>>()
            .join("\n")
    };
    let mut writer = get_writer(&report_args)?;
    match writer.write_all(report.as_bytes()) {
        Ok(_) => Ok(()),
        Err(error) => err!("List summary error writing report: {:?}", error),
    }
}
