//! The administration API for the observations store.
use crate::backend::{self, Config};
use std::path::PathBuf;

/// Create the administration API.
///
/// Administration only needs to know where the store lives, it deliberately
/// skips the full configuration validation so the schema can be managed
/// without an API key in the environment.
///
/// # Arguments
///
/// * `config_file` is the weather job configuration filename.
/// * `dirname` is the weather data directory name override.
///
pub fn create_weather_admin(config_file: Option<PathBuf>, dirname: Option<PathBuf>) -> crate::Result<WeatherAdmin> {
    let mut config = Config::new(config_file)?;
    if let Some(path) = dirname {
        config.weather_data.directory = path.display().to_string();
    }
    let data_dir = backend::data_dir(&config)?;
    Ok(WeatherAdmin { data_dir })
}

/// The administration API.
pub struct WeatherAdmin {
    /// The weather data directory.
    data_dir: PathBuf,
}
impl WeatherAdmin {
    /// Initialize the observations database schema.
    ///
    /// # Arguments
    ///
    /// * `drop` when true will delete the existing schema first.
    ///
    pub fn init(&self, drop: bool) -> crate::Result<()> {
        crate::backend::db_admin::init_db(&self.data_dir, drop)
    }

    /// Delete the observations database schema.
    ///
    /// # Arguments
    ///
    /// * `delete` when true will remove the database file itself.
    ///
    pub fn drop(&self, delete: bool) -> crate::Result<()> {
        crate::backend::db_admin::drop_db(&self.data_dir, delete)
    }

    /// Provide information about the observations database.
    ///
    pub fn details(&self) -> crate::Result<Option<DbDetails>> {
        crate::backend::db_admin::db_details(&self.data_dir)
    }
}

/// Information about the observations database.
#[derive(Debug)]
pub struct DbDetails {
    /// The database file size in bytes.
    pub size: usize,
    /// The per-location breakdown of what the database holds.
    pub location_details: Vec<LocationDetails>,
}

/// The per-location database details.
#[derive(Debug)]
pub struct LocationDetails {
    /// The location alias.
    pub location: String,
    /// The number of hourly observations stored.
    pub hours: usize,
}
