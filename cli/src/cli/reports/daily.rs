//! The daily aggregates reports.
//!
//! Statistics come out of the aggregation engine at full precision, these
//! reports are where the documented rounding happens.
use super::{csv_to_string, csv_write_record, json_to_string};
use serde_json::{json, Map, Value};
use toolslib::date_time::isodate;
use weather_job_lib::prelude::{DailyAggregate, OUTPUT_PRECISION};

pub mod text {
    //! The daily aggregates text based reporting implementation.
    //!
    use super::*;
    use toolslib::fmt::fmt_float;

    /// The text based daily aggregates report.
    ///
    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the daily aggregates text based report.
        ///
        /// # Arguments
        ///
        /// * `aggregates` are the per-day statistics that will be reported.
        ///
        pub fn generate(&self, aggregates: Vec<DailyAggregate>) -> Vec<String> {
            let mut rows =
                vec![format!("{:<12}{:>6}{:>9}{:>9}{:>9}{:>9}", "Date", "Hours", "Min", "Mean", "Max", "Precip")];
            for aggregate in aggregates {
                rows.push(format!(
                    "{:<12}{:>6}{:>9}{:>9}{:>9}{:>9}",
                    isodate(&aggregate.date),
                    aggregate.hours,
                    fmt_float(&aggregate.temperature_min, OUTPUT_PRECISION),
                    fmt_float(&aggregate.temperature_mean, OUTPUT_PRECISION),
                    fmt_float(&aggregate.temperature_max, OUTPUT_PRECISION),
                    fmt_float(&aggregate.precipitation_total, OUTPUT_PRECISION),
                ));
            }
            rows
        }
    }
}

pub mod csv {
    //! The daily aggregates CSV based reporting implementation.
    //!
    extern crate csv as csv_lib;
    use super::*;
    use toolslib::fmt::fmt_float;

    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the daily aggregates CSV based report.
        ///
        /// # Arguments
        ///
        /// * `aggregates` are the per-day statistics that will be reported.
        ///
        pub fn generate(&self, aggregates: Vec<DailyAggregate>) -> String {
            let mut writer = csv_lib::Writer::from_writer(vec![]);
            csv_write_record!(
                writer,
                &["location", "date", "hours", "temperatureMin", "temperatureMean", "temperatureMax", "precipTotal"]
            );
            for aggregate in aggregates {
                csv_write_record!(
                    writer,
                    &[
                        aggregate.location.clone(),
                        isodate(&aggregate.date),
                        aggregate.hours.to_string(),
                        fmt_float(&aggregate.temperature_min, OUTPUT_PRECISION),
                        fmt_float(&aggregate.temperature_mean, OUTPUT_PRECISION),
                        fmt_float(&aggregate.temperature_max, OUTPUT_PRECISION),
                        fmt_float(&aggregate.precipitation_total, OUTPUT_PRECISION),
                    ]
                );
            }
            csv_to_string(writer)
        }
    }
}

pub mod json {
    //! The daily aggregates JSON based reporting implementation.
    //!
    use super::*;
    use toolslib::fmt::round_float;

    /// The `JSON` based daily aggregates report.
    ///
    #[derive(Debug, Default)]
    pub struct Report(
        /// Controls if the report will be pretty printed or not.
        bool,
    );
    impl Report {
        /// Create a report instance and configure it to pretty print the `JSON` document.
        ///
        pub fn pretty_printed() -> Self {
            Self(true)
        }
        /// Generates the daily aggregates JSON based report.
        ///
        /// # Arguments
        ///
        /// * `location` is the location alias the aggregates belong to.
        /// * `aggregates` are the per-day statistics that will be reported.
        ///
        pub fn generate(&self, location: &str, aggregates: Vec<DailyAggregate>) -> String {
            let mut values: Vec<Map<String, Value>> = vec![];
            for aggregate in aggregates {
                let mut value = Map::new();
                let mut add = |key: &str, v: Value| value.insert(key.to_string(), v);
                add("date", json!(isodate(&aggregate.date)));
                add("hours", json!(aggregate.hours));
                add("temperatureMin", float_value(&aggregate.temperature_min));
                add("temperatureMean", float_value(&aggregate.temperature_mean));
                add("temperatureMax", float_value(&aggregate.temperature_max));
                add("precipTotal", float_value(&aggregate.precipitation_total));
                values.push(value);
            }
            let json = json!({
                "location": location,
                "type": Value::String("daily_aggregates".to_string()),
                "aggregates": json![values],
            });
            json_to_string(json, self.0)
        }
    }

    /// Returns a rounded `Value::Number(...)` or `Value::Null` for `None`.
    ///
    #[inline]
    fn float_value(option: &Option<f64>) -> Value {
        match round_float(option, OUTPUT_PRECISION) {
            Some(float) => json!(float),
            None => Value::Null,
        }
    }
}
