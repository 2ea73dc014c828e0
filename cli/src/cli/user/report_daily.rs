//! # The implementation for report daily aggregates (`rd`).
//!
//! The report daily command presents per-day statistics derived from the
//! stored hourly observations. Every day in the range shows up in the
//! report, a day with no observations has a zero hour count and empty
//! statistics so coverage gaps are visible.
//!
//! The range is either explicit (`FROM` and `THRU` dates) or a trailing
//! window of `--days` ending today in the location's timezone. With
//! neither, the configured lookback window is used.
//!
use super::{date_parser, trim_row_end, validate_location};
use crate::cli::{self, err, get_writer, reports::daily as reports, ReportArgs};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use weather_job_lib::prelude::{DateRange, WeatherData};

/// The report daily command name.
pub(super) const COMMAND_NAME: &'static str = "rd";

/// The location argument id.
///
const LOCATION: &'static str = "LOCATION";

/// The trailing window argument id.
///
const DAYS: &'static str = "DAYS";

/// The aggregates from date argument id.
///
const FROM: &'static str = "FROM";

/// The aggregates thru date argument id.
///
const THRU: &'static str = "THRU";

/// Create the report daily command.
///
pub(super) fn command() -> Command {
    let cmd_args = [
        Arg::new(DAYS)
            .short('D')
            .long("days")
            .action(ArgAction::Set)
            .value_name("DAYS")
            .value_parser(clap::value_parser!(u32).range(1..=365))
            .conflicts_with_all([FROM, THRU])
            .help("Report a trailing window of days ending today."),
        Arg::new(LOCATION)
            .action(ArgAction::Set)
            .required(true)
            .value_name("LOCATION")
            .value_parser(validate_location)
            .help("The location alias whose aggregates will be reported."),
        Arg::new(FROM)
            .action(ArgAction::Set)
            .required(false)
            .value_parser(date_parser)
            .value_name("FROM")
            .help("The aggregates starting date."),
        Arg::new(THRU)
            .action(ArgAction::Set)
            .required(false)
            .value_parser(date_parser)
            .value_name("THRU")
            .help("The aggregates ending date."),
    ];
    Command::new(COMMAND_NAME)
        .about("Report daily aggregates derived from a location's hourly observations.")
        .args(cmd_args)
        .args(ReportArgs::get())
        .group(ReportArgs::arg_group())
        .arg_required_else_help(true)
}

/// Work out the report date range from the command arguments.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `location` is the location alias.
/// * `args` contains the report daily command arguments.
///
fn get_date_range(weather_data: &WeatherData, location: &str, args: &ArgMatches) -> cli::Result<DateRange> {
    match args.get_one::<NaiveDate>(FROM) {
        Some(from) => {
            let thru = args.get_one::<NaiveDate>(THRU).map_or(from, |date| date);
            Ok(DateRange { start: from.clone(), end: thru.clone() })
        }
        None => {
            let days = args.get_one::<u32>(DAYS).map(|days| *days);
            match weather_data.trailing_range(location, days) {
                Ok(date_range) => Ok(date_range),
                Err(error) => err!("Report daily error building the date range: {:?}", error),
            }
        }
    }
}

/// Executes the report daily command.
///
/// # Arguments
///
/// * `weather_data` is the weather job API used by the command.
/// * `args` contains the report daily command arguments.
///
pub(super) fn execute(weather_data: &WeatherData, args: ArgMatches) -> cli::Result<()> {
    let location = args.get_one::<String>(LOCATION).map(|location| location.clone()).unwrap();
    let date_range = get_date_range(weather_data, &location, &args)?;
    let aggregates = match weather_data.get_daily_aggregates(&location, &date_range) {
        Ok(aggregates) => aggregates,
        Err(error) => err!("Report daily error getting aggregates: {:?}", error)?,
    };
    let report_args = ReportArgs::new(&args);
    let report = if report_args.csv() {
        reports::csv::Report::default().generate(aggregates)
    } else if report_args.json() {
        match report_args.pretty() {
            true => reports::json::Report::pretty_printed(),
            false => reports::json::Report::default(),
        }
        .generate(&location, aggregates)
    } else {
        reports::text::Report::default()
            .generate(aggregates)
            .into_iter()
            .map(|row| trim_row_end!(row))
            .collect::<Vec<String>>()
            .join("\n")
    };
    let mut writer = get_writer(&report_args)?;
    match writer.write_all(report.as_bytes()) {
        Ok(_) => Ok(()),
        Err(error) => err!("Report daily error writing report: {:?}", error),
    }
}
