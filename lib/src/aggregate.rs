//! The daily aggregation engine.
//!
//! Aggregates are a read-and-compute pass over the store, nothing here is
//! persisted. The engine works over whatever hours exist: a day with 18 of
//! 24 hours still gets statistics from the 18 that are there. Days with no
//! observations at all still show up in the output so a report reader can
//! tell a gap from a dry day.

use crate::entities::{DailyAggregate, DateRange, HourlyObservation};

/// The number of decimal digits reports round statistics to.
///
/// Statistics are computed and held at full precision, rounding only
/// happens when a report writes them out.
pub const OUTPUT_PRECISION: usize = 2;

/// Compute the daily aggregates for a location over a date range.
///
/// Exactly one aggregate is returned per calendar day in the range, in
/// date order. Statistics are computed from the non-null values of the
/// contributing hours, a day with zero contributing hours has every
/// statistic absent.
///
/// # Arguments
///
/// * `location` is the location alias the observations belong to.
/// * `range` is the days the aggregates will cover.
/// * `observations` are the hourly rows queried from the store.
///
pub fn daily_aggregates(location: &str, range: &DateRange, observations: &[HourlyObservation]) -> Vec<DailyAggregate> {
    range.iter().map(|date| day_aggregate(location, date, observations)).collect()
}

/// Compute the aggregate for a single day.
///
/// # Arguments
///
/// * `location` is the location alias the observations belong to.
/// * `date` is the civil date being aggregated.
/// * `observations` are the hourly rows queried from the store.
///
fn day_aggregate(location: &str, date: chrono::NaiveDate, observations: &[HourlyObservation]) -> DailyAggregate {
    let mut aggregate = DailyAggregate::empty(location, date);
    let day_hours: Vec<&HourlyObservation> =
        observations.iter().filter(|observation| observation.timestamp_local.date() == date).collect();
    aggregate.hours = day_hours.len();

    let temperatures: Vec<f64> = day_hours.iter().filter_map(|observation| observation.temperature).collect();
    if !temperatures.is_empty() {
        let sum: f64 = temperatures.iter().sum();
        aggregate.temperature_mean = Some(sum / temperatures.len() as f64);
        aggregate.temperature_min = temperatures.iter().cloned().reduce(f64::min);
        aggregate.temperature_max = temperatures.iter().cloned().reduce(f64::max);
    }

    let amounts: Vec<f64> = day_hours.iter().filter_map(|observation| observation.precipitation).collect();
    if !amounts.is_empty() {
        aggregate.precipitation_total = Some(amounts.iter().sum());
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use toolslib::date_time::{get_date, get_time};

    fn observation(date: chrono::NaiveDate, hour: u32, temperature: Option<f64>) -> HourlyObservation {
        HourlyObservation {
            location: "testcase".to_string(),
            timestamp_local: date.and_time(get_time(hour, 0, 0)),
            temperature,
            precipitation: Some(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn coverage_gaps_are_visible() {
        // data only exists for the middle day of a 3 day range
        let range = DateRange::new(get_date(2025, 8, 4), get_date(2025, 8, 6));
        let observations: Vec<HourlyObservation> =
            (0..24).map(|hour| observation(get_date(2025, 8, 5), hour, Some(15.0))).collect();
        let aggregates = daily_aggregates("testcase", &range, &observations);
        assert_eq!(aggregates.len(), 3);
        assert_eq!(aggregates[0], DailyAggregate::empty("testcase", get_date(2025, 8, 4)));
        assert_eq!(aggregates[2], DailyAggregate::empty("testcase", get_date(2025, 8, 6)));
        let middle = &aggregates[1];
        assert_eq!(middle.hours, 24);
        assert!(middle.temperature_min <= middle.temperature_mean);
        assert!(middle.temperature_mean <= middle.temperature_max);
        assert_eq!(middle.precipitation_total, Some(12.0));
    }

    #[test]
    fn partial_day() {
        // 18 of 24 hours with temperatures 10 thru 27 in 1 degree steps
        let date = get_date(2025, 8, 5);
        let observations: Vec<HourlyObservation> =
            (0..18).map(|hour| observation(date, hour, Some(10.0 + hour as f64))).collect();
        let range = DateRange::new(date, date);
        let aggregates = daily_aggregates("testcase", &range, &observations);
        assert_eq!(aggregates.len(), 1);
        let aggregate = &aggregates[0];
        assert_eq!(aggregate.hours, 18);
        assert_eq!(aggregate.temperature_min, Some(10.0));
        assert_eq!(aggregate.temperature_max, Some(27.0));
        assert_eq!(aggregate.temperature_mean, Some(18.5));
    }

    #[test]
    fn null_values_do_not_contribute() {
        let date = get_date(2025, 8, 5);
        let mut observations =
            vec![observation(date, 0, Some(10.0)), observation(date, 1, None), observation(date, 2, Some(20.0))];
        observations[1].precipitation = None;
        let range = DateRange::new(date, date);
        let aggregate = &daily_aggregates("testcase", &range, &observations)[0];
        // the null hour still counts as coverage
        assert_eq!(aggregate.hours, 3);
        assert_eq!(aggregate.temperature_min, Some(10.0));
        assert_eq!(aggregate.temperature_mean, Some(15.0));
        assert_eq!(aggregate.temperature_max, Some(20.0));
        assert_eq!(aggregate.precipitation_total, Some(1.0));
    }

    #[test]
    fn all_null_statistics_are_absent() {
        let date = get_date(2025, 8, 5);
        let mut observations = vec![observation(date, 0, None), observation(date, 1, None)];
        observations.iter_mut().for_each(|o| o.precipitation = None);
        let range = DateRange::new(date, date);
        let aggregate = &daily_aggregates("testcase", &range, &observations)[0];
        assert_eq!(aggregate.hours, 2);
        assert_eq!(aggregate.temperature_min, None);
        assert_eq!(aggregate.temperature_mean, None);
        assert_eq!(aggregate.temperature_max, None);
        assert_eq!(aggregate.precipitation_total, None);
    }
}
