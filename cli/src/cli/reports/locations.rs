//! The configured locations reports.
use super::{csv_to_string, csv_write_record, json_to_string};
use serde_json::{json, Value};
use weather_job_lib::prelude::Location;

pub mod text {
    //! The list locations text based reporting implementation.
    //!
    use super::*;

    /// The text based locations report.
    ///
    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the list locations text based report.
        ///
        /// # Arguments
        ///
        /// * `locations` are the configured locations that will be reported.
        ///
        pub fn generate(&self, locations: Vec<Location>) -> Vec<String> {
            let mut rows = vec![format!("{:<25}{:<20}{:<}", "Location", "Alias", "Timezone")];
            for location in locations {
                rows.push(format!("{:<25}{:<20}{:<}", location.name, location.alias, location.tz));
            }
            rows
        }
    }
}

pub mod csv {
    //! The list locations CSV based reporting implementation.
    //!
    extern crate csv as csv_lib;
    use super::*;

    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the list locations CSV based report.
        ///
        /// # Arguments
        ///
        /// * `locations` are the configured locations that will be reported.
        ///
        pub fn generate(&self, locations: Vec<Location>) -> String {
            let mut writer = csv_lib::Writer::from_writer(vec![]);
            csv_write_record!(writer, &["name", "alias", "tz"]);
            for location in locations {
                csv_write_record!(writer, &[location.name, location.alias, location.tz]);
            }
            csv_to_string(writer)
        }
    }
}

pub mod json {
    //! The list locations JSON based reporting implementation.
    //!
    use super::*;

    /// The `JSON` based locations report.
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
        /// Generates the list locations JSON based report.
        ///
        /// # Arguments
        ///
        /// * `locations` are the configured locations that will be reported.
        ///
        pub fn generate(&self, locations: Vec<Location>) -> String {
            let location_array = locations
                .iter()
                .map(|location| {
                    json!({
                        "name": location.name,
                        "alias": location.alias,
                        "tz": location.tz
                    })
                })
                .collect::<Vec<Value>>();
            let document = json!({ "locations": location_array });
            json_to_string(document, self.0)
        }
    }
}
