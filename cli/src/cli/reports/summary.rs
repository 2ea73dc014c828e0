//! The store summary reports.
use super::{csv_to_string, csv_write_record, fmt_timestamp, json_to_string};
use chrono::NaiveDateTime;
use serde_json::{json, Value};
use weather_job_lib::prelude::StoreSummary;

/// Format an optional timestamp, empty when it is absent.
///
fn timestamp_value(option: &Option<NaiveDateTime>) -> String {
    option.as_ref().map_or(Default::default(), fmt_timestamp)
}

pub mod text {
    //! The list summary text based reporting implementation.
    //!
    use super::*;
    use toolslib::fmt::commafy;

    /// The text based store summary report.
    ///
    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the list summary text based report.
        ///
        /// # Arguments
        ///
        /// * `summaries` are the per-location summaries that will be reported.
        ///
        pub fn generate(&self, summaries: Vec<StoreSummary>) -> Vec<String> {
            let mut rows =
                vec![format!("{:<20}{:>10}  {:<18}{:<18}", "Location", "Hours", "Earliest", "Latest")];
            for summary in summaries {
                rows.push(format!(
                    "{:<20}{:>10}  {:<18}{:<18}",
                    summary.location,
                    commafy(summary.hours),
                    timestamp_value(&summary.earliest),
                    timestamp_value(&summary.latest),
                ));
            }
            rows
        }
    }
}

pub mod csv {
    //! The list summary CSV based reporting implementation.
    //!
    extern crate csv as csv_lib;
    use super::*;

    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the list summary CSV based report.
        ///
        /// # Arguments
        ///
        /// * `summaries` are the per-location summaries that will be reported.
        ///
        pub fn generate(&self, summaries: Vec<StoreSummary>) -> String {
            let mut writer = csv_lib::Writer::from_writer(vec![]);
            csv_write_record!(writer, &["location", "hours", "earliest", "latest"]);
            for summary in summaries {
                csv_write_record!(
                    writer,
                    &[
                        summary.location.clone(),
                        summary.hours.to_string(),
                        timestamp_value(&summary.earliest),
                        timestamp_value(&summary.latest),
                    ]
                );
            }
            csv_to_string(writer)
        }
    }
}

pub mod json {
    //! The list summary JSON based reporting implementation.
    //!
    use super::*;

    /// The `JSON` based store summary report.
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
        /// Generates the list summary JSON based report.
        ///
        /// # Arguments
        ///
        /// * `summaries` are the per-location summaries that will be reported.
        ///
        pub fn generate(&self, summaries: Vec<StoreSummary>) -> String {
            let summary_array = summaries
                .iter()
                .map(|summary| {
                    json!({
                        "location": summary.location,
                        "hours": summary.hours,
                        "earliest": datetime_value(&summary.earliest),
                        "latest": datetime_value(&summary.latest),
                    })
                })
                .collect::<Vec<Value>>();
            let document = json!({ "summaries": summary_array });
            json_to_string(document, self.0)
        }
    }

    /// Returns a `Value::String(...)` timestamp or `Value::Null` for `None`.
    ///
    #[inline]
    fn datetime_value(option: &Option<NaiveDateTime>) -> Value {
        match option {
            Some(timestamp) => json!(fmt_timestamp(timestamp)),
            None => Value::Null,
        }
    }
}
