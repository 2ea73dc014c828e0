//! A library that ingests hourly weather observations and serves them back
//! as reports.
//!
//! This grew out of a `Python` script a task scheduler ran every hour. The
//! script pulled hourly observations from the *Visual Crossing* *Timeline*
//! API and upserted them into a `SQLite` table, with a second script that
//! exported daily aggregates for spreadsheets. Moving it to `Rust` was
//! mostly about making the failure handling honest: the script treated a
//! bad API key and a flaky network the same way, and a crash mid write
//! could leave half an hour range in the table.
//!
//! The library is split along those seams. The `history_client` module owns
//! talking to the endpoint (including deciding what is worth retrying), the
//! `backend` module owns the store and its batch upsert, and `aggregate`
//! turns hourly rows into daily statistics. The `ingest` module strings
//! them together one location at a time, a location that fails is logged
//! and skipped, only a broken store or configuration stops the run.

// Ignore broke links due to --document-private-items not being used.
#![allow(rustdoc::private_intra_doc_links)]

/// The library result.
pub type Result<T> = std::result::Result<T, Error>;

/// The categories of failure the job routes on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The operation is expected to succeed if repeated (rate limit, timeout, server error).
    Transient,
    /// The operation will not succeed if repeated (bad credentials, bad location).
    Permanent,
    /// The provider payload envelope could not be understood.
    Malformed,
    /// The observations store had an I/O problem.
    Storage,
    /// The runtime configuration is not usable.
    Config,
}

/// The library error.
#[derive(Debug)]
pub struct Error {
    /// What category of failure this is.
    kind: ErrorKind,
    /// The human readable reason.
    reason: String,
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}
impl Error {
    /// Create an error from a failure category and reason.
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self { kind, reason: reason.into() }
    }
    /// Create a transient error.
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, reason)
    }
    /// Create a permanent error.
    pub fn permanent(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permanent, reason)
    }
    /// Create a malformed payload error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, reason)
    }
    /// Create a store error.
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, reason)
    }
    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, reason)
    }
    /// Get the failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
    /// Returns `true` when the error should stop the whole run, not just a location.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::Storage | ErrorKind::Config)
    }
}

mod weather_data;
pub use weather_data::create_weather_data;

mod backend;

mod entities;

mod history_client;

mod aggregate;

mod ingest;

mod admin;

/// The public weather job API.
pub mod prelude {
    pub use crate::{
        aggregate::OUTPUT_PRECISION,
        entities::{DailyAggregate, DateRange, HourlyObservation, Location, StoreSummary},
        ingest::{IngestReport, LocationOutcome},
        weather_data::{create_weather_data, WeatherData},
    };
}

/// The public administration API.
pub mod admin_prelude {
    pub use crate::admin::{create_weather_admin, DbDetails, LocationDetails, WeatherAdmin};
}

struct LogElapsedTime {
    description: String,
    start: std::time::Instant,
    log_level: log::Level,
}
impl LogElapsedTime {
    pub fn new(description: &str, log_level: Option<log::Level>) -> Self {
        Self {
            description: description.to_string(),
            start: std::time::Instant::now(),
            log_level: log_level.unwrap_or(log::Level::Debug),
        }
    }
}
impl Drop for LogElapsedTime {
    fn drop(&mut self) {
        let micros = (std::time::Instant::now() - self.start).as_micros();
        match micros < 1_000 {
            true => log::log!(self.log_level, "{} {}us", self.description, micros),
            false => log::log!(self.log_level, "{} {}ms", self.description, toolslib::fmt::commafy(micros / 1_000)),
        };
    }
}

macro_rules! log_elapsed_time {
    (info, $description:expr) => {
        let __log_elapsed_time_instance__ = $crate::LogElapsedTime::new($description, Some(log::Level::Info));
    };
    ($description:expr) => {
        let __log_elapsed_time_instance__ = $crate::LogElapsedTime::new($description, None);
    };
}
use log_elapsed_time;
