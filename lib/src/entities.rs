//! Structures used by the weather job `API`s.

use chrono::{NaiveDate, NaiveDateTime};

/// An hourly weather observation for a location.
///
/// The pair of `location` and `timestamp_local` is the identity of an
/// observation. Ingesting the same hour again replaces the previous row in
/// the store, it never duplicates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HourlyObservation {
    /// The location alias the observation belongs to.
    pub location: String,
    /// The observation hour in the location's local time, truncated to the hour.
    pub timestamp_local: NaiveDateTime,
    /// The IANA timezone name reported by the provider.
    pub timezone_name: Option<String>,
    /// The temperature.
    pub temperature: Option<f64>,
    /// The apparent temperature.
    pub feels_like: Option<f64>,
    /// The relative humidity percentage.
    pub humidity: Option<f64>,
    /// The amount of precipitation for the hour.
    pub precipitation: Option<f64>,
    /// The chance of precipitation for the hour.
    pub precipitation_chance: Option<f64>,
    /// The wind speed.
    pub wind_speed: Option<f64>,
    /// The highest wind speed recorded for the hour.
    pub wind_gust: Option<f64>,
    /// The atmospheric pressure expressed in millibars.
    pub pressure: Option<f64>,
    /// The percentage of sky covered by clouds.
    pub cloud_cover: Option<f64>,
    /// A short description of the conditions.
    pub conditions: Option<String>,
    /// The provider's conditions icon name.
    pub icon: Option<String>,
}

/// The daily statistics derived from hourly observations.
///
/// An aggregate is a view over the store, it is computed on demand and never
/// persisted. When `hours` is zero every statistic is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyAggregate {
    /// The location alias the aggregate belongs to.
    pub location: String,
    /// The civil date the statistics cover.
    pub date: NaiveDate,
    /// The lowest temperature observed.
    pub temperature_min: Option<f64>,
    /// The arithmetic mean of the observed temperatures.
    pub temperature_mean: Option<f64>,
    /// The highest temperature observed.
    pub temperature_max: Option<f64>,
    /// The sum of the observed precipitation amounts.
    pub precipitation_total: Option<f64>,
    /// The number of hourly observations that contributed.
    pub hours: usize,
}
impl DailyAggregate {
    /// Create an empty aggregate for a date.
    ///
    /// # Arguments
    ///
    /// * `location` is the location alias.
    /// * `date` is the civil date the aggregate covers.
    ///
    pub fn empty(location: &str, date: NaiveDate) -> Self {
        Self {
            location: location.to_string(),
            date,
            temperature_min: None,
            temperature_mean: None,
            temperature_max: None,
            precipitation_total: None,
            hours: 0,
        }
    }
}

/// The data that identifies a location the job fetches.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// The query string the provider resolves (a city name or `lat,long`).
    pub name: String,
    /// The unique short name used as the store key.
    pub alias: String,
    /// The location's IANA timezone name.
    pub tz: String,
}

/// A per-location summary of what the store holds.
#[derive(Debug)]
pub struct StoreSummary {
    /// The location alias.
    pub location: String,
    /// The number of hourly observations available.
    pub hours: usize,
    /// The earliest observation hour.
    pub earliest: Option<NaiveDateTime>,
    /// The latest observation hour.
    pub latest: Option<NaiveDateTime>,
}

/// For a given `NaiveDate` return the next day `NaiveDate`.
macro_rules! next_day {
    ($nd:expr) => {
        // For the weather job use case this should always be okay
        $nd.succ_opt().unwrap()
    };
}
pub(crate) use next_day;

/// A container for a range of dates.
#[derive(Clone, Debug, PartialEq)]
pub struct DateRange {
    /// The starting date of the range.
    pub start: NaiveDate,
    /// The inclusive end date of the range.
    pub end: NaiveDate,
}
impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (start, end) = self.as_iso8601();
        write!(f, "{} thru {}", start, end)
    }
}
impl DateRange {
    /// Create a new instance of the date range.
    ///
    /// # Arguments
    ///
    /// * `start` is the starting date.
    /// * `end` is the inclusive end date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange { start, end }
    }
    /// Create a trailing window of some number of days ending at a date.
    ///
    /// # Arguments
    ///
    /// * `end` is the inclusive end date.
    /// * `days` is the size of the window, the end date included.
    pub fn trailing(end: NaiveDate, days: u32) -> DateRange {
        let lookback = chrono::Duration::days(days.saturating_sub(1) as i64);
        DateRange { start: end - lookback, end }
    }
    /// Returns `true` if the *start* and *end* dates are equal.
    pub fn is_one_day(&self) -> bool {
        &self.start == &self.end
    }
    /// Identifies if a date is within the date range.
    ///
    /// # Arguments
    ///
    /// * `date` is the date that will be checked.
    pub fn covers(&self, date: &NaiveDate) -> bool {
        date >= &self.start && date <= &self.end
    }
    /// Allow the date range to be iterated over without consuming it.
    pub fn iter(&self) -> DateRangeIterator {
        DateRangeIterator { from: self.start, thru: self.end }
    }
    /// Returns the dates as a tuple of ISO8601 formatted strings.
    pub fn as_iso8601(&self) -> (String, String) {
        use toolslib::date_time::isodate;
        (isodate(&self.start), isodate(&self.end))
    }
}
/// Create an iterator that will return all dates within the range.
impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIterator;
    fn into_iter(self) -> Self::IntoIter {
        DateRangeIterator { from: self.start, thru: self.end }
    }
}
/// Create an iterator that will return all dates within the range.
impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIterator;
    fn into_iter(self) -> Self::IntoIter {
        DateRangeIterator { from: self.start, thru: self.end }
    }
}

/// The iterator over the dates within a [DateRange].
#[derive(Debug)]
pub struct DateRangeIterator {
    /// The starting date.
    from: NaiveDate,
    /// The inclusive end date.
    thru: NaiveDate,
}
/// The implementation of iterating over the date range.
impl Iterator for DateRangeIterator {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.from > self.thru {
            None
        } else {
            let date = self.from;
            self.from = next_day!(date);
            Some(date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolslib::date_time::get_date;

    #[test]
    fn iterate() {
        let range = DateRange::new(get_date(2025, 6, 1), get_date(2025, 6, 30));
        let mut testcase = range.start.clone();
        let test_cases: Vec<NaiveDate> = range.into_iter().collect();
        assert_eq!(test_cases.len(), 30);
        for day in 0..30 {
            assert_eq!(test_cases[day], testcase);
            testcase = next_day!(testcase);
        }
    }

    #[test]
    fn is_within() {
        let testcase = DateRange::new(get_date(2025, 7, 1), get_date(2025, 7, 31));
        assert!(testcase.covers(&get_date(2025, 7, 1)));
        assert!(!testcase.covers(&get_date(2025, 6, 30)));
        assert!(testcase.covers(&get_date(2025, 7, 31)));
        assert!(!testcase.covers(&get_date(2025, 8, 1)));
    }

    #[test]
    fn to_iso8601() {
        let test_case = DateRange::new(get_date(2025, 7, 1), get_date(2025, 7, 2));
        let (from, to) = test_case.as_iso8601();
        assert_eq!(from, "2025-07-01");
        assert_eq!(to, "2025-07-02");
    }

    #[test]
    fn trailing() {
        let testcase = DateRange::trailing(get_date(2025, 8, 30), 30);
        assert_eq!(testcase.start, get_date(2025, 8, 1));
        assert_eq!(testcase.end, get_date(2025, 8, 30));
        let testcase = DateRange::trailing(get_date(2025, 8, 30), 1);
        assert!(testcase.is_one_day());
    }
}
