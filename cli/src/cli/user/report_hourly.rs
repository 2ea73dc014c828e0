//! # The implementation for report hourly observations (`rh`).
//!
//! The report hourly command presents the raw hourly rows the store holds
//! for a location over a date range.
//!
use super::{date_parser, trim_row_end, validate_location};
use crate::cli::{self, err, get_writer, reports::hourly as reports, ReportArgs};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use weather_job_lib::prelude::{DateRange, WeatherData};

/// The report hourly command name.
pub(super) const COMMAND_NAME: &'static str = "rh";

/// The location argument id.
///
const LOCATION: &'static str = "LOCATION";

fn get_location(args: &ArgMatches) -> String {
    args.get_one::<String>(LOCATION).map(|location| location.clone()).unwrap()
}

/// The observations from date argument id.
///
const FROM: &'static str = "FROM";

fn get_from(args: &ArgMatches) -> NaiveDate {
    args.get_one::<NaiveDate>(FROM).unwrap().clone()
}

/// The observations thru date argument id.
///
const THRU: &'static str = "THRU";

fn get_thru(args: &ArgMatches) -> NaiveDate {
    match args.get_one::<NaiveDate>(THRU) {
        None => get_from(args),
        Some(date) => date.clone(),
    }
}

/// Create the report hourly command.
///
pub(super) fn command() -> Command {
    let cmd_args = [
        Arg::new(LOCATION)
            .action(ArgAction::Set)
            .required(true)
            .value_name("LOCATION")
            .value_parser(validate_location)
            .help("The location alias whose observations will be reported."),
        Arg::new(FROM)
            .action(ArgAction::Set)
            .required(true)
            .value_parser(date_parser)
            .value_name("FROM")
            .help("The observations starting date."),
        Arg::new(THRU)
            .action(ArgAction::Set)
            .required(false)
            .value_parser(date_parser)
            .value_name("THRU")
            .help("The observations ending date."),
    ];
    Command::new(COMMAND_NAME)
        .about("Report the hourly observations stored for a location.")
        .args(cmd_args)
        .args(ReportArgs::get())
        .group(ReportArgs::arg_group())
        .arg_required_else_help(true)
}

/// Executes the report hourly command.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `args` contains the report hourly command arguments.
///
pub(super) fn execute(weather_data: &WeatherData, args: ArgMatches) -> cli::Result<()> {
    let location = get_location(&args);
    let date_range = DateRange { start: get_from(&args), end: get_thru(&args) };
    let observations = match weather_data.get_observations(&location, &date_range) {
        Ok(observations) => observations,
        Err(error) => err!("Report hourly error getting observations: {:?}", error)?,
    };
    let report_args = ReportArgs::new(&args);
    let report = if report_args.csv() {
        reports::csv::Report::default().generate(observations)
    } else if report_args.json() {
        match report_args.pretty() {
            true => reports::json::Report::pretty_printed(),
            false => reports::json::Report::default(),
        }
        .generate(&location, observations)
    } else {
        reports::text::Report::default()
            .generate(observations)
            .into_iter()
            .map(|row| trim_row_end!(row))
            .collect::<Vec<String>>()
            .join("\n")
    };
    let mut writer = get_writer(&report_args)?;
    match writer.write_all(report.as_bytes()) {
        Ok(_) => Ok(()),
        Err(error) => err!("Report hourly error writing report: {:?}", error),
    }
}
