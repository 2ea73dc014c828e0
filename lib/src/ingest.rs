//! The ingestion pipeline.
//!
//! A run works through the configured locations one at a time, fetch the
//! hours, upsert the batch, move on. The error boundary sits at the
//! location: a fetch that fails for one location is logged and recorded
//! but the rest of the run continues. The two exceptions are the store
//! and the configuration, if either is broken there is no point going on.

use crate::{
    backend::Backend,
    entities::{DateRange, Location},
    history_client::HistoryClient,
    Error,
};

/// What happened to each location during an ingest run.
#[derive(Debug)]
pub struct IngestReport {
    /// The per-location outcomes in the order they were processed.
    pub outcomes: Vec<LocationOutcome>,
}
impl IngestReport {
    /// The total number of hourly observations written by the run.
    pub fn hours_written(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.written).sum()
    }
    /// The number of locations whose cycle did not complete.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.failure.is_some()).count()
    }
}

/// The record of a single location's fetch-normalize-upsert cycle.
#[derive(Debug)]
pub struct LocationOutcome {
    /// The location alias.
    pub location: String,
    /// The dates the fetch covered.
    pub range: DateRange,
    /// The number of hourly observations the fetch produced.
    pub fetched: usize,
    /// The number of hourly observations written to the store.
    pub written: usize,
    /// The failure that stopped the cycle, if there was one.
    pub failure: Option<Error>,
}
impl LocationOutcome {
    /// Create the outcome of a completed cycle.
    fn completed(location: &Location, range: DateRange, fetched: usize, written: usize) -> Self {
        Self { location: location.alias.clone(), range, fetched, written, failure: None }
    }
    /// Create the outcome of a failed cycle.
    fn failed(location: &Location, range: DateRange, failure: Error) -> Self {
        Self { location: location.alias.clone(), range, fetched: 0, written: 0, failure: Some(failure) }
    }
}

/// Run the ingestion pipeline over the configured locations.
///
/// Per-location failures are recorded in the report, only storage errors
/// abort the run.
///
/// # Arguments
///
/// * `backend` is the observations store.
/// * `client` is the source of hourly observations.
///
pub(crate) fn run(backend: &dyn Backend, client: &dyn HistoryClient) -> crate::Result<IngestReport> {
    let config = backend.get_config();
    let fetch_days = config.ingest.fetch_days;
    let mut outcomes = vec![];
    for location in &config.locations {
        let range = fetch_range(location, fetch_days);
        log::info!("Fetching '{}' observations {}.", location.alias, range);
        let outcome = match client.fetch(location, &range) {
            Err(error) => {
                log::error!("Ingest failed for '{}' {} ({:?}): {}", location.alias, range, error.kind(), error);
                LocationOutcome::failed(location, range, error)
            }
            Ok(observations) => {
                let fetched = observations.len();
                match backend.add_observations(&observations) {
                    Ok(written) => {
                        log::info!("Upsert complete for '{}' ({} hours).", location.alias, written);
                        LocationOutcome::completed(location, range, fetched, written)
                    }
                    Err(error) if error.is_fatal() => {
                        // the store is suspect, stop the run here
                        log::error!("Store failure for '{}' {}: {}", location.alias, range, error);
                        return Err(error);
                    }
                    Err(error) => LocationOutcome::failed(location, range, error),
                }
            }
        };
        outcomes.push(outcome);
    }
    Ok(IngestReport { outcomes })
}

/// Build the dates a run fetches for a location.
///
/// The range trails back `fetch_days` from today in the location's own
/// timezone and reaches one day ahead, the provider fills the future hours
/// from its forecast.
///
/// # Arguments
///
/// * `location` is the location being fetched.
/// * `fetch_days` is how many days back from today the range starts.
///
fn fetch_range(location: &Location, fetch_days: u32) -> DateRange {
    let today = match toolslib::date_time::get_tz(&location.tz) {
        Ok(tz) => toolslib::date_time::today_in_tz(&tz),
        Err(_) => {
            // the configuration validation makes this unlikely
            log::warn!("'{}' timezone '{}' was not usable, using UTC.", location.alias, location.tz);
            chrono::Utc::now().date_naive()
        }
    };
    let start = today - chrono::Duration::days(fetch_days as i64);
    let end = crate::entities::next_day!(today);
    DateRange::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{Backend, Config},
        entities::{HourlyObservation, StoreSummary},
    };
    use std::sync::Mutex;

    /// A backend that remembers upserted batches and can fail on demand.
    struct StubBackend {
        config: Config,
        written: Mutex<Vec<HourlyObservation>>,
        failure: Option<fn() -> Error>,
    }
    impl StubBackend {
        fn new(failure: Option<fn() -> Error>) -> Self {
            let document = r#"
                [visual-crossing]
                api-key = "a-real-key"
                [[locations]]
                name = "Kungsbacka"
                timezone = "Europe/Stockholm"
                [[locations]]
                name = "Boise,ID"
                alias = "boise"
                timezone = "America/Boise"
                "#;
            Self { config: Config::try_from(document).unwrap(), written: Mutex::new(vec![]), failure }
        }
    }
    impl Backend for StubBackend {
        fn get_config(&self) -> &Config {
            &self.config
        }
        fn add_observations(&self, observations: &[HourlyObservation]) -> crate::Result<usize> {
            if let Some(failure) = self.failure {
                Err(failure())
            } else {
                self.written.lock().unwrap().extend_from_slice(observations);
                Ok(observations.len())
            }
        }
        fn get_observations(&self, _: &str, _: &DateRange) -> crate::Result<Vec<HourlyObservation>> {
            unimplemented!("not used by the pipeline")
        }
        fn get_summaries(&self) -> crate::Result<Vec<StoreSummary>> {
            unimplemented!("not used by the pipeline")
        }
    }

    /// A client that fails for selected aliases.
    #[derive(Debug)]
    struct StubClient {
        fail_alias: Option<&'static str>,
    }
    impl HistoryClient for StubClient {
        fn fetch(&self, location: &Location, date_range: &DateRange) -> crate::Result<Vec<HourlyObservation>> {
            if self.fail_alias == Some(location.alias.as_str()) {
                Err(Error::permanent(format!("'{}' {}: API key was not accepted.", location.alias, date_range)))
            } else {
                Ok(vec![HourlyObservation {
                    location: location.alias.clone(),
                    timestamp_local: date_range.start.and_time(toolslib::date_time::get_time(0, 0, 0)),
                    temperature: Some(15.0),
                    ..Default::default()
                }])
            }
        }
    }

    #[test]
    fn all_locations_succeed() {
        let backend = StubBackend::new(None);
        let report = run(&backend, &StubClient { fail_alias: None }).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failures(), 0);
        assert_eq!(report.hours_written(), 2);
        assert_eq!(backend.written.lock().unwrap().len(), 2);
    }

    #[test]
    fn one_location_failing_does_not_stop_the_run() {
        let backend = StubBackend::new(None);
        let report = run(&backend, &StubClient { fail_alias: Some("kungsbacka") }).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failures(), 1);
        assert_eq!(report.hours_written(), 1);
        let failed = &report.outcomes[0];
        assert_eq!(failed.location, "kungsbacka");
        assert_eq!(failed.failure.as_ref().unwrap().kind(), crate::ErrorKind::Permanent);
        // the other location was still processed
        assert_eq!(report.outcomes[1].location, "boise");
        assert_eq!(report.outcomes[1].written, 1);
    }

    #[test]
    fn storage_errors_abort_the_run() {
        let backend = StubBackend::new(Some(|| Error::storage("the disk is full")));
        let error = run(&backend, &StubClient { fail_alias: None }).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Storage);
    }

    #[test]
    fn fetch_ranges() {
        let location = Location {
            name: "Kungsbacka".to_string(),
            alias: "kungsbacka".to_string(),
            tz: "Europe/Stockholm".to_string(),
        };
        let range = fetch_range(&location, 1);
        assert_eq!(range.end - range.start, chrono::Duration::days(2));
        let range = fetch_range(&location, 7);
        assert_eq!(range.end - range.start, chrono::Duration::days(8));
    }
}
