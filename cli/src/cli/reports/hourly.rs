//! The hourly observations reports.
//!
use super::{csv_to_string, csv_write_record, fmt_timestamp, json_to_string};
use serde_json::{json, Map, Value};
use weather_job_lib::prelude::HourlyObservation;

pub mod text {
    //! The hourly observations text based reporting implementation.
    //!
    use super::*;
    use toolslib::fmt::fmt_float;

    /// The text based hourly observations report.
    ///
    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the hourly observations text based report.
        ///
        /// # Arguments
        ///
        /// * `observations` are the hourly rows that will be reported.
        ///
        pub fn generate(&self, observations: Vec<HourlyObservation>) -> Vec<String> {
            let mut rows = vec![format!(
                "{:<17}{:>7}{:>7}{:>10}{:>8}{:>7}{:>7}{:>10}{:>8}  {:<}",
                "Timestamp", "Temp", "Feels", "Humidity", "Precip", "Wind", "Gust", "Pressure", "Clouds", "Conditions"
            )];
            for observation in observations {
                rows.push(format!(
                    "{:<17}{:>7}{:>7}{:>10}{:>8}{:>7}{:>7}{:>10}{:>8}  {:<}",
                    fmt_timestamp(&observation.timestamp_local),
                    fmt_float(&observation.temperature, 1),
                    fmt_float(&observation.feels_like, 1),
                    fmt_float(&observation.humidity, 0),
                    fmt_float(&observation.precipitation, 2),
                    fmt_float(&observation.wind_speed, 1),
                    fmt_float(&observation.wind_gust, 1),
                    fmt_float(&observation.pressure, 1),
                    fmt_float(&observation.cloud_cover, 0),
                    observation.conditions.as_deref().unwrap_or_default(),
                ));
            }
            rows
        }
    }
}

pub mod csv {
    //! The hourly observations CSV based reporting implementation.
    //!
    extern crate csv as csv_lib;
    use super::*;

    #[derive(Debug, Default)]
    pub struct Report;
    impl Report {
        /// Generates the hourly observations CSV based report.
        ///
        /// # Arguments
        ///
        /// * `observations` are the hourly rows that will be reported.
        ///
        pub fn generate(&self, observations: Vec<HourlyObservation>) -> String {
            let mut writer = csv_lib::Writer::from_writer(vec![]);
            csv_write_record!(
                writer,
                &[
                    "location",
                    "timestampLocal",
                    "timezone",
                    "temperature",
                    "feelsLike",
                    "humidity",
                    "precip",
                    "precipChance",
                    "windSpeed",
                    "windGust",
                    "pressure",
                    "cloudCover",
                    "conditions",
                    "icon",
                ]
            );
            for observation in observations {
                csv_write_record!(
                    writer,
                    &[
                        observation.location,
                        fmt_timestamp(&observation.timestamp_local),
                        string_value(&observation.timezone_name),
                        float_value(&observation.temperature),
                        float_value(&observation.feels_like),
                        float_value(&observation.humidity),
                        float_value(&observation.precipitation),
                        float_value(&observation.precipitation_chance),
                        float_value(&observation.wind_speed),
                        float_value(&observation.wind_gust),
                        float_value(&observation.pressure),
                        float_value(&observation.cloud_cover),
                        string_value(&observation.conditions),
                        string_value(&observation.icon),
                    ]
                );
            }
            csv_to_string(writer)
        }
    }

    /// Returns a copy of a string value or an empty string for `None`.
    ///
    #[inline]
    fn string_value(option: &Option<String>) -> String {
        match option {
            Some(string) => string.clone(),
            None => "".to_string(),
        }
    }

    /// Returns a float value as a string or an empty string for `None`.
    ///
    #[inline]
    fn float_value(option: &Option<f64>) -> String {
        match option {
            Some(float) => float.to_string(),
            None => "".to_string(),
        }
    }
}

pub mod json {
    //! The hourly observations JSON based reporting implementation.
    //!
    use super::*;

    /// The `JSON` based hourly observations report.
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
        /// Generates the hourly observations JSON based report.
        ///
        /// # Arguments
        ///
        /// * `location` is the location alias the observations belong to.
        /// * `observations` are the hourly rows that will be reported.
        ///
        pub fn generate(&self, location: &str, observations: Vec<HourlyObservation>) -> String {
            let mut values: Vec<Map<String, Value>> = vec![];
            for observation in observations {
                let mut value = Map::new();
                let mut add = |key: &str, v: Value| value.insert(key.to_string(), v);
                add("timestampLocal", json!(fmt_timestamp(&observation.timestamp_local)));
                add("timezone", string_value(&observation.timezone_name));
                add("temperature", float_value(&observation.temperature));
                add("feelsLike", float_value(&observation.feels_like));
                add("humidity", float_value(&observation.humidity));
                add("precip", float_value(&observation.precipitation));
                add("precipChance", float_value(&observation.precipitation_chance));
                add("windSpeed", float_value(&observation.wind_speed));
                add("windGust", float_value(&observation.wind_gust));
                add("pressure", float_value(&observation.pressure));
                add("cloudCover", float_value(&observation.cloud_cover));
                add("conditions", string_value(&observation.conditions));
                add("icon", string_value(&observation.icon));
                values.push(value);
            }
            let json = json!({
                "location": location,
                "type": Value::String("hourly_observations".to_string()),
                "observations": json![values],
            });
            json_to_string(json, self.0)
        }
    }

    /// Returns a `Value::String(...)` or `Value::Null` for `None`.
    ///
    #[inline]
    fn string_value(option: &Option<String>) -> Value {
        match option {
            Some(string) => json!(string),
            None => Value::Null,
        }
    }

    /// Returns a `Value::Number(...)` or `Value::Null` for `None`.
    ///
    #[inline]
    fn float_value(option: &Option<f64>) -> Value {
        match option {
            Some(float) => json!(float),
            None => Value::Null,
        }
    }
}
