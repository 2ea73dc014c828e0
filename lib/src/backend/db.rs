//! The database implementation of the observations store.

pub(crate) mod sqlite;

use super::{Backend, Config};
use std::path::PathBuf;

/// Create the database backend for the observations store.
///
/// The schema bootstrap is idempotent so it always runs, the first call
/// creates the database file and every call after that is a noop.
///
/// # Arguments
///
/// * `config` is the weather job configuration.
/// * `data_dir` is the weather data directory.
///
pub(crate) fn create_db_backend(config: Config, data_dir: PathBuf) -> crate::Result<Box<dyn Backend>> {
    sqlite::admin::init_db(&data_dir, false)?;
    Ok(Box::new(sqlite::SqliteBackend::new(config, data_dir)))
}
