//! The Visual Crossing weather data services client.
use super::{
    rest_client::{RestClient, RestClientResult},
    retry::Retrier,
    HistoryClient,
};
use crate::{
    backend::Config,
    entities::{DateRange, HourlyObservation, Location},
    Error, Result,
};
use reqwest::{blocking::Request, Url};
use serde::Deserialize;

pub use timeline_client::TimelineClient;
mod timeline_client {
    //! The Visual Crossing timeline API client.

    use super::*;
    use std::fmt::Formatter;

    /// The Visual Crossing timeline API Rest client.
    ///
    pub struct TimelineClient {
        /// The Rest request runner.
        rest_client: RestClient,
        /// The Visual Crossing base URL.
        url: Url,
        /// The Visual Crossing API key.
        api_key: String,
        /// The units observations are requested in.
        unit_group: String,
        /// The retry controller wrapped around requests.
        retrier: Retrier,
    }
    impl std::fmt::Debug for TimelineClient {
        /// Show all the attributes except the API client and API key.
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TimelineClient")
                .field("url", &self.url)
                .field("unit_group", &self.unit_group)
                .field("retrier", &self.retrier)
                .finish()
        }
    }
    impl TimelineClient {
        /// Creates a new instance of the timeline client.
        ///
        /// # Arguments
        ///
        /// * `config` is the weather job configuration.
        ///
        pub fn new(config: &Config) -> Result<Self> {
            let endpoint = if config.visual_crossing.endpoint.ends_with("/") {
                config.visual_crossing.endpoint.clone()
            } else {
                format!("{}/", config.visual_crossing.endpoint)
            };
            match Url::parse(&endpoint) {
                Err(err) => {
                    let reason = format!("Error parsing URL='{}' ({})", endpoint, err);
                    Err(Error::permanent(reason))
                }
                Ok(url) => Ok(Self {
                    rest_client: RestClient::new()?,
                    url,
                    api_key: config.visual_crossing.api_key.clone(),
                    unit_group: config.visual_crossing.unit_group.clone(),
                    retrier: Retrier::default(),
                }),
            }
        }
        /// Creates the Visual Crossing timeline URL to query hourly observations.
        ///
        /// # Arguments
        ///
        /// * `location` is whose observations will be queried.
        /// * `date_range` identifies the observation dates of interest.
        ///
        fn create_request(&self, location: &Location, date_range: &DateRange) -> Result<Request> {
            let mut url = self.url.clone();
            match url.path_segments_mut() {
                Err(_) => {
                    let reason = format!("URL '{}' cannot have segments added to it", self.url);
                    Err(Error::permanent(reason))?
                }
                Ok(mut segments) => {
                    // the location then the date range
                    segments.push(&location.name);
                    let (from, to) = date_range.as_iso8601();
                    if date_range.is_one_day() {
                        segments.push(&from);
                    } else {
                        segments.push(&from).push(&to);
                    }
                }
            }
            // add the query parameters
            let builder = self.rest_client.get(url).query(&[
                ("unitGroup", self.unit_group.as_str()),
                ("include", "hours"),
                ("key", &self.api_key),
                ("contentType", "json"),
                // a smaller response is a faster response
                (
                    "elements",
                    "datetime,temp,feelslike,humidity,precip,precipprob,\
                     windspeed,windgust,pressure,cloudcover,conditions,icon",
                ),
            ]);
            // build the request
            match builder.build() {
                Ok(request) => Ok(request),
                Err(err) => {
                    let reason = format!("Error building {} observations request ({})", location.name, err);
                    Err(Error::permanent(reason))
                }
            }
        }
    }
    impl HistoryClient for TimelineClient {
        /// Use the Visual Crossing timeline API to get hourly observations for a location.
        ///
        /// # Arguments
        ///
        /// * `location` is whose observations will be queried.
        /// * `date_range` is the observation dates to query.
        ///
        fn fetch(&self, location: &Location, date_range: &DateRange) -> Result<Vec<HourlyObservation>> {
            let request = self.create_request(location, date_range)?;
            let what = format!("'{}' {}", location.alias, date_range);
            let body = self.retrier.run(&what, || match request.try_clone() {
                Some(request) => self.rest_client.execute(request),
                None => RestClientResult::RequestError("request could not be cloned".to_string()),
            })?;
            timeline_response::normalize(&body, location)
        }
    }
}

mod timeline_response {
    //! The Visual Crossing timeline response.

    use super::*;
    use toolslib::date_time::{get_time, parse_date, parse_time};

    /// The fields of interest from the Visual Crossing response.
    #[derive(Debug, Deserialize)]
    struct TimelineDays {
        /// The IANA timezone name of the location.
        timezone: Option<String>,
        /// The days corresponding to the request dates.
        days: Vec<TimelineDay>,
    }

    /// A single day from the Visual Crossing response.
    #[derive(Debug, Deserialize)]
    struct TimelineDay {
        /// The date associated with the day.
        datetime: String,
        /// The hour entries, decoded individually so one bad entry does
        /// not throw the day away.
        #[serde(default)]
        hours: Vec<serde_json::Value>,
    }

    /// A single hour entry from the Visual Crossing response.
    ///
    /// An entry that cannot provide its time and temperature is considered
    /// malformed, the remaining fields all tolerate being absent.
    #[derive(Debug, Deserialize)]
    struct TimelineHour {
        /// The local time of the observation.
        datetime: String,
        /// The temperature.
        temp: f64,
        /// The apparent temperature.
        feelslike: Option<f64>,
        /// The relative humidity percentage.
        humidity: Option<f64>,
        /// The amount of rain.
        precip: Option<f64>,
        /// The chance of rain.
        precipprob: Option<f64>,
        /// The wind speed.
        windspeed: Option<f64>,
        /// The highest wind speed recorded.
        windgust: Option<f64>,
        /// The barometric pressure in millibars.
        pressure: Option<f64>,
        /// The percent of sky covered by clouds.
        cloudcover: Option<f64>,
        /// The description of conditions for the hour.
        conditions: Option<String>,
        /// The conditions icon name.
        icon: Option<String>,
    }

    /// Convert the response body into hourly observations.
    ///
    /// An envelope that cannot be decoded at all is a malformed payload
    /// error. Individual hour entries that cannot be decoded are skipped
    /// with a warning.
    ///
    /// # Arguments
    ///
    /// - `body` is the raw `JSON` document.
    /// - `location` is the location associated with the response.
    ///
    pub fn normalize(body: &[u8], location: &Location) -> Result<Vec<HourlyObservation>> {
        match serde_json::from_slice::<TimelineDays>(body) {
            Ok(timeline_days) => Ok(into_observations(timeline_days, location)),
            Err(err) => Err(Error::malformed(format!(
                "'{}' response body is not a timeline document ({}).",
                location.alias, err
            ))),
        }
    }

    /// Convert the timeline days into hourly observations.
    ///
    /// # Arguments
    ///
    /// - `timeline_days` is the decoded response envelope.
    /// - `location` is the location associated with the observations.
    ///
    fn into_observations(timeline_days: TimelineDays, location: &Location) -> Vec<HourlyObservation> {
        let timezone_name = timeline_days.timezone;
        let mut observations = vec![];
        for day in timeline_days.days {
            let date = match parse_date(&day.datetime) {
                Ok(date) => date,
                Err(err) => {
                    log::warn!("Skipping '{}' day '{}' ({}).", location.alias, day.datetime, err);
                    continue;
                }
            };
            for hour_value in day.hours {
                match serde_json::from_value::<TimelineHour>(hour_value) {
                    Ok(hour) => match hour_observation(hour, date, location, &timezone_name) {
                        Some(observation) => observations.push(observation),
                        None => (),
                    },
                    Err(err) => {
                        log::warn!("Skipping malformed '{}' hour on {} ({}).", location.alias, day.datetime, err);
                    }
                }
            }
        }
        observations
    }

    /// Convert a decoded hour entry into an observation.
    ///
    /// The observation hour is truncated to the top of the hour. Entries
    /// whose time cannot be parsed are skipped with a warning.
    ///
    /// # Arguments
    ///
    /// - `hour` is the decoded hour entry.
    /// - `date` is the civil date the entry belongs to.
    /// - `location` is the location associated with the observations.
    /// - `timezone_name` is the timezone reported by the provider.
    ///
    fn hour_observation(
        hour: TimelineHour,
        date: chrono::NaiveDate,
        location: &Location,
        timezone_name: &Option<String>,
    ) -> Option<HourlyObservation> {
        match parse_time(&hour.datetime) {
            Err(err) => {
                log::warn!("Skipping '{}' hour '{}' on {} ({}).", location.alias, hour.datetime, date, err);
                None
            }
            Ok(time) => {
                use chrono::Timelike;
                let timestamp_local = date.and_time(get_time(time.hour(), 0, 0));
                Some(HourlyObservation {
                    location: location.alias.clone(),
                    timestamp_local,
                    timezone_name: timezone_name.clone(),
                    temperature: Some(hour.temp),
                    feels_like: hour.feelslike,
                    humidity: hour.humidity,
                    precipitation: hour.precip,
                    precipitation_chance: hour.precipprob,
                    wind_speed: hour.windspeed,
                    wind_gust: hour.windgust,
                    pressure: hour.pressure,
                    cloud_cover: hour.cloudcover,
                    conditions: hour.conditions,
                    icon: hour.icon,
                })
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use pretty_assertions::assert_eq;
        use toolslib::date_time::get_date;

        fn test_location() -> Location {
            Location {
                name: "Kungsbacka".to_string(),
                alias: "kungsbacka".to_string(),
                tz: "Europe/Stockholm".to_string(),
            }
        }

        #[test]
        fn observations() {
            let response = r#"{
                "timezone": "Europe/Stockholm",
                "days": [
                    {"datetime": "2025-08-04",
                     "hours": [
                         {"datetime": "0:05:00", "temp": 10.0, "feelslike": 9.0, "humidity": 80.0,
                          "precip": 0.0, "precipprob": 0.0, "windspeed": 2.0, "windgust": 4.0,
                          "pressure": 1015.0, "cloudcover": 50.0, "conditions": "Clear", "icon": "clear-night"},
                         {"datetime": "1:00:00", "temp": 9.5}
                     ]},
                    {"datetime": "2025-08-05",
                     "hours": [
                         {"datetime": "23:00:00", "temp": 14.0, "conditions": "Rain"}
                     ]}
                ]
            }"#;
            let testcase = normalize(response.as_bytes(), &test_location()).unwrap();
            assert_eq!(testcase.len(), 3);
            // the first hour is truncated to the top of the hour
            assert_eq!(testcase[0].location, "kungsbacka");
            assert_eq!(testcase[0].timestamp_local, get_date(2025, 8, 4).and_time(get_time(0, 0, 0)));
            assert_eq!(testcase[0].timezone_name, Some("Europe/Stockholm".to_string()));
            assert_eq!(testcase[0].temperature, Some(10.0));
            assert_eq!(testcase[0].conditions, Some("Clear".to_string()));
            // missing optional fields are absent not errors
            assert_eq!(testcase[1].timestamp_local, get_date(2025, 8, 4).and_time(get_time(1, 0, 0)));
            assert_eq!(testcase[1].temperature, Some(9.5));
            assert_eq!(testcase[1].humidity, None);
            assert_eq!(testcase[1].icon, None);
            assert_eq!(testcase[2].timestamp_local, get_date(2025, 8, 5).and_time(get_time(23, 0, 0)));
        }

        #[test]
        fn malformed_hours_are_skipped() {
            // 23 well formed hours and 1 missing the temperature
            let mut hours = vec![];
            for hour in 0..23 {
                hours.push(format!(r#"{{"datetime": "{}:00:00", "temp": {}.0}}"#, hour, hour));
            }
            hours.push(r#"{"datetime": "23:00:00"}"#.to_string());
            let response = format!(
                r#"{{"timezone": "Europe/Stockholm", "days": [{{"datetime": "2025-08-04", "hours": [{}]}}]}}"#,
                hours.join(",")
            );
            let testcase = normalize(response.as_bytes(), &test_location()).unwrap();
            assert_eq!(testcase.len(), 23);
            for (hour, observation) in testcase.iter().enumerate() {
                assert_eq!(observation.timestamp_local, get_date(2025, 8, 4).and_time(get_time(hour as u32, 0, 0)));
                assert_eq!(observation.temperature, Some(hour as f64));
            }
        }

        #[test]
        fn unparseable_hour_times_are_skipped() {
            let response = r#"{
                "timezone": "Europe/Stockholm",
                "days": [
                    {"datetime": "2025-08-04",
                     "hours": [
                         {"datetime": "squiggly", "temp": 10.0},
                         {"datetime": "1:00:00", "temp": 11.0}
                     ]}
                ]
            }"#;
            let testcase = normalize(response.as_bytes(), &test_location()).unwrap();
            assert_eq!(testcase.len(), 1);
            assert_eq!(testcase[0].temperature, Some(11.0));
        }

        #[test]
        fn malformed_envelope_is_an_error() {
            let error = normalize(b"this is not json", &test_location()).unwrap_err();
            assert_eq!(error.kind(), crate::ErrorKind::Malformed);
            let error = normalize(br#"{"ok": true}"#, &test_location()).unwrap_err();
            assert_eq!(error.kind(), crate::ErrorKind::Malformed);
        }

        #[test]
        fn days_without_hours() {
            let response = r#"{"timezone": "Europe/Stockholm", "days": [{"datetime": "2025-08-04"}]}"#;
            let testcase = normalize(response.as_bytes(), &test_location()).unwrap();
            assert!(testcase.is_empty());
        }
    }
}
