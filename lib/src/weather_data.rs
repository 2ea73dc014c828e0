//! The weather job API.
use crate::{
    aggregate,
    backend::{create, Backend},
    entities::{DailyAggregate, DateRange, HourlyObservation, Location, StoreSummary},
    history_client, ingest,
    ingest::IngestReport,
    Result,
};
use std::path::PathBuf;

/// Creates the weather job `API`.
///
/// # Arguments
///
/// * `config_file` is the weather job configuration filename.
/// * `dirname` is the weather data directory name override.
pub fn create_weather_data(config_file: Option<PathBuf>, dirname: Option<PathBuf>) -> Result<WeatherData> {
    Ok(WeatherData(create(config_file, dirname)?))
}

/// The weather job `API`.
pub struct WeatherData(
    /// The observations store implementation.
    Box<dyn Backend>,
);
impl WeatherData {
    /// Run the ingestion pipeline over the configured locations.
    ///
    /// The report records what happened per location. Only storage and
    /// configuration problems surface as errors.
    ///
    pub fn ingest(&self) -> Result<IngestReport> {
        crate::log_elapsed_time!(info, "ingest");
        let client = history_client::create_history_client(self.0.get_config())?;
        ingest::run(self.0.as_ref(), client.as_ref())
    }

    /// Get the hourly observations for a location ordered by observation hour.
    ///
    /// # Arguments
    ///
    /// * `alias` is the location alias.
    /// * `range` covers the observation dates returned.
    ///
    pub fn get_observations(&self, alias: &str, range: &DateRange) -> Result<Vec<HourlyObservation>> {
        crate::log_elapsed_time!(info, "get_observations");
        self.0.get_observations(alias, range)
    }

    /// Get the daily aggregates for a location, one per day in the range.
    ///
    /// # Arguments
    ///
    /// * `alias` is the location alias.
    /// * `range` covers the days returned.
    ///
    pub fn get_daily_aggregates(&self, alias: &str, range: &DateRange) -> Result<Vec<DailyAggregate>> {
        crate::log_elapsed_time!(info, "get_daily_aggregates");
        let observations = self.0.get_observations(alias, range)?;
        Ok(aggregate::daily_aggregates(alias, range, &observations))
    }

    /// Get a per-location summary of the store contents.
    ///
    pub fn get_summaries(&self) -> Result<Vec<StoreSummary>> {
        crate::log_elapsed_time!(info, "get_summaries");
        self.0.get_summaries()
    }

    /// Get the configured locations.
    ///
    pub fn get_locations(&self) -> Vec<Location> {
        self.0.get_config().locations.clone()
    }

    /// Build the default trailing report window for a location.
    ///
    /// The window ends at today in the location's timezone. When `days` is
    /// `None` the configured lookback window size is used.
    ///
    /// # Arguments
    ///
    /// * `alias` is the location alias.
    /// * `days` overrides the configured lookback window size.
    ///
    pub fn trailing_range(&self, alias: &str, days: Option<u32>) -> Result<DateRange> {
        let config = self.0.get_config();
        match config.locations.iter().find(|location| location.alias == alias) {
            None => Err(crate::Error::permanent(format!("Location '{}' is not configured.", alias))),
            Some(location) => {
                let tz = toolslib::date_time::get_tz(&location.tz)
                    .map_err(|error| crate::Error::config(error.to_string()))?;
                let today = toolslib::date_time::today_in_tz(&tz);
                Ok(DateRange::trailing(today, days.unwrap_or(config.ingest.lookback_days)))
            }
        }
    }
}
