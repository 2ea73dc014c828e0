//! The source of hourly weather observations for locations.

use crate::{
    backend::Config,
    entities::{DateRange, HourlyObservation, Location},
    Result,
};
use std::fmt::Debug;
use timeline_client::TimelineClient;

mod rest_client;

mod retry;

mod timeline_client;

/// Creates a history client.
///
/// # Arguments
///
/// - `config` is the weather job configuration.
///
pub fn create_history_client(config: &Config) -> Result<Box<dyn HistoryClient>> {
    // currently there is only 1 client so just create it.
    match TimelineClient::new(config) {
        Ok(history_client) => Ok(Box::new(history_client)),
        Err(error) => Err(error),
    }
}

/// The internal API used to get hourly weather observations.
///
pub trait HistoryClient: Debug + Send {
    /// Fetch the hourly observations for a location, blocking until the
    /// request completes or retries are exhausted.
    ///
    /// # Arguments
    ///
    /// * `location` identifies what observations to get.
    /// * `date_range` controls the observation dates.
    ///
    fn fetch(&self, location: &Location, date_range: &DateRange) -> Result<Vec<HourlyObservation>>;
}
