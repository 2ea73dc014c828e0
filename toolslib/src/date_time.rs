//! Capture the `chrono` date and time usages to this module.
//!
//! The `chrono` crate has a habit of deprecating functions between minor
//! releases. Consolidating the usage here keeps the churn away from the
//! crates that just want a date.
use super::{Error, Result};
use chrono::prelude::*;
use chrono_tz::Tz;

/// Creates an ISO8601 date string.
///
/// The returned string will be formatted as YYYY-MM-DD where:
/// * YYYY is the 4 digit year
/// * MM is the month
/// * DD is the day in the month.
///
/// # Arguments
///
/// * `date` the date that will be converted.
///
pub fn isodate(date: &NaiveDate) -> String {
    fmt_date(date, "%Y-%m-%d")
}

/// Creates a date string using the provided date format.
///
/// The format must be a valid `chrono` date formatting string.
///
/// # Arguments
///
/// * `date` the date to use.
/// * `format` the date format description.
///
pub fn fmt_date(date: &NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Converts a date string to a `NaiveDate`.
///
/// The date can have the following forms:
///
/// * `YYYY-MM-DD` - where YYYY is the 4 digit year, MM is the 2 digit month, and DD the 2 digit
///   day of month.
/// * `MM-DD-YYYY` - where MM is the 2 digit month, DD is the 2 digit day of month, and YYYY is the
///   4 digit year.
/// * `MMM-DD-YYYY` - where MMM is the abbreviated month name (always 3 characters), DD is the 2
///   digit day of month, and YYYY is the 4 digit year.
///
/// # Arguments
///
/// * `date_str` - the date string that will be parsed.
///
/// An error will be returned if the date parsing fails.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%m-%d-%Y", "%b-%d-%Y", "%m/%d/%Y"] {
        if let Ok(naive_date) = NaiveDate::parse_from_str(date_str, fmt) {
            return Ok(naive_date);
        }
    }
    let patterns = "YYYY-MM-DD, MM-DD-YYYY, MM/DD/YYYY, or MMM-DD-YYYY";
    Err(Error::from(format!("'{}' pattern must be {}.", date_str, patterns)))
}

/// Converts a time string to a `NaiveTime`.
///
/// The time can be `HH:MM:SS` or `HH:MM`. A single digit hour is allowed
/// (`9:00:00`), some data providers emit hours without a leading zero.
///
/// # Arguments
///
/// * `time_str` - the time string that will be parsed.
///
/// An error will be returned if the time parsing fails.
pub fn parse_time(time_str: &str) -> Result<NaiveTime> {
    // normalize '9:00:00' to '09:00:00'
    let normalized = match time_str.find(':') {
        Some(1) => format!("0{}", time_str),
        _ => time_str.to_string(),
    };
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(naive_time) = NaiveTime::parse_from_str(&normalized, fmt) {
            return Ok(naive_time);
        }
    }
    Err(Error::from(format!("'{}' pattern must be HH:MM:SS or HH:MM.", time_str)))
}

/// A helper function that gets a timezone for a name of the timezone.
///
/// # Arguments
///
/// * `tz_name` is the timezone name.
pub fn get_tz(tz_name: &str) -> Result<Tz> {
    match tz_name.parse() {
        Ok(tz) => Ok(tz),
        Err(error) => Err(Error::from(error.to_string())),
    }
}

/// A boiler plate helper that creates a `NaiveDate` from a year, month, and day.
///
/// If the date components are out of bounds the error will be logged and the
/// default `NaiveDate` returned instead of panicking.
///
/// # Arguments
///
/// * `y` is the year of the date.
/// * `m` is the month of the year.
/// * `d` is the day of the month.
pub fn get_date(y: i32, m: u32, d: u32) -> NaiveDate {
    if let Some(nd) = NaiveDate::from_ymd_opt(y, m, d) {
        nd
    } else {
        // not the best solution but for this use case it's fine
        log::error!("Yikes... Bad date year={}, month={}, day={}, returning default!", y, m, d);
        NaiveDate::default()
    }
}

/// A boiler plate helper that creates a `NaiveTime` from hours, minutes, and seconds.
///
/// If the time components are out of bounds the error will be logged and the
/// default `NaiveTime` returned instead of panicking.
///
/// # Arguments
///
/// * `h` is the hour of the time.
/// * `m` is the minutes of the hour.
/// * `s` is the seconds of the minute.
pub fn get_time(h: u32, m: u32, s: u32) -> NaiveTime {
    if let Some(nt) = NaiveTime::from_hms_opt(h, m, s) {
        nt
    } else {
        // not the best solution but for this use case it's fine
        log::error!("Yikes... Bad time hour={}, minute={}, second={}, returning default!", h, m, s);
        NaiveTime::default()
    }
}

/// Get the current civil date for a timezone.
///
/// # Arguments
///
/// * `tz` is the timezone whose current date will be returned.
pub fn today_in_tz(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(isodate(&date), "2025-08-05")
    }

    #[test]
    fn parse_dates() {
        assert_eq!(parse_date("2025-7-15").unwrap(), get_date(2025, 7, 15));
        assert_eq!(parse_date("7-1-2025").unwrap(), get_date(2025, 7, 1));
        assert_eq!(parse_date("jul-15-2025").unwrap(), get_date(2025, 7, 15));
        assert_eq!(parse_date("JUL-15-2025").unwrap(), get_date(2025, 7, 15));
        assert!(parse_date("JULY-15-25").is_err());
    }

    #[test]
    fn parse_times() {
        assert_eq!(parse_time("00:00:00").unwrap(), get_time(0, 0, 0));
        assert_eq!(parse_time("0:05:00").unwrap(), get_time(0, 5, 0));
        assert_eq!(parse_time("9:00:00").unwrap(), get_time(9, 0, 0));
        assert_eq!(parse_time("23:59").unwrap(), get_time(23, 59, 0));
        assert!(parse_time("24:00:00").is_err());
        assert!(parse_time("midnight").is_err());
    }

    #[test]
    fn timezones() {
        assert!(get_tz("America/Denver").is_ok());
        assert!(get_tz("Europe/Stockholm").is_ok());
        assert!(get_tz("Mars/Olympus_Mons").is_err());
    }
}
