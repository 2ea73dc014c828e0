//! The implementations of the observations store.

mod db;
pub(crate) use db::sqlite::admin as db_admin;

pub use config::Config;
mod config;

use crate::entities::{DateRange, HourlyObservation, StoreSummary};
use std::path::PathBuf;

/// Get the backend implementation of the observations store.
///
/// The configuration is loaded and validated here, before anything touches
/// the network or the store file.
///
/// # Arguments
///
/// * `config_file` is the weather job configuration filename.
/// * `dirname` is the weather data directory name override.
///
pub fn create(config_file: Option<PathBuf>, dirname: Option<PathBuf>) -> crate::Result<Box<dyn Backend>> {
    let mut config = Config::new(config_file)?;
    if let Some(path) = dirname {
        config.weather_data.directory = path.display().to_string();
    }
    config.validate()?;
    let data_dir = data_dir(&config)?;
    db::create_db_backend(config, data_dir)
}

/// Make sure the weather data directory exists, creating it if necessary.
///
/// # Arguments
///
/// * `config` is the weather job configuration.
///
pub(crate) fn data_dir(config: &Config) -> crate::Result<PathBuf> {
    let path = PathBuf::from(&config.weather_data.directory);
    if path.is_file() {
        Err(crate::Error::config(format!("'{}' is a file not a directory.", path.display())))
    } else if path.exists() {
        Ok(path)
    } else {
        log::info!("Creating weather data directory '{}'", path.display());
        match std::fs::create_dir_all(&path) {
            Ok(_) => Ok(path),
            Err(error) => {
                Err(crate::Error::config(format!("Could not create directory '{}' ({}).", path.display(), error)))
            }
        }
    }
}

/// The store API for backend implementations.
///
pub(crate) trait Backend: Send {
    /// Get the weather job configuration.
    ///
    fn get_config(&self) -> &Config;

    /// Upsert a batch of hourly observations as a single unit.
    ///
    /// Either the whole batch becomes durable or none of it does.
    ///
    /// # Arguments
    ///
    /// - `observations` is the batch that will be written.
    ///
    fn add_observations(&self, observations: &[HourlyObservation]) -> crate::Result<usize>;

    /// Get the hourly observations for a location ordered by observation hour.
    ///
    /// # Arguments
    ///
    /// - `alias` is the location alias.
    /// - `range` covers the observation dates returned.
    ///
    fn get_observations(&self, alias: &str, range: &DateRange) -> crate::Result<Vec<HourlyObservation>>;

    /// Get a per-location summary of the store contents.
    ///
    fn get_summaries(&self) -> crate::Result<Vec<StoreSummary>>;
}

#[cfg(test)]
mod testlib {
    //! A library for common utilities used by the backend tests.

    use std::{env, fmt, fs, path, time};

    /// Used to create a temporary weather directory and delete it as part of the function exit.
    #[derive(Debug)]
    pub(in crate::backend) struct TestFixture(path::PathBuf);
    impl TestFixture {
        /// Creates a test weather directory or panics if a unique directory cannot be created.
        pub(in crate::backend) fn create() -> Self {
            let tmpdir = env::temp_dir();
            let mut weather_dir: Option<path::PathBuf> = None;
            // try to create a test directory 10 times
            for attempt in 0..10 {
                let test_dir = tmpdir.join(format!("weather_job-{}-{}", unique_suffix(), attempt));
                match test_dir.exists() {
                    true => {
                        eprintln!("Test directory '{}' exists...", test_dir.as_path().display())
                    }
                    false => {
                        weather_dir.replace(test_dir);
                        break;
                    }
                }
            }
            match weather_dir {
                Some(root_dir) => match fs::create_dir(&root_dir) {
                    Ok(_) => Self(root_dir),
                    Err(e) => {
                        panic!("Error creating '{}': {}", root_dir.as_path().display(), e)
                    }
                },
                None => panic!("Tried 10 times to get a unique test directory name and failed..."),
            }
        }
    }
    impl Drop for TestFixture {
        /// Clean up the temporary directory as best you can.
        fn drop(&mut self) {
            if let Err(e) = fs::remove_dir_all(self.to_string()) {
                eprintln!("Yikes... Error cleaning up test weather dir: {}", e);
            }
        }
    }
    impl fmt::Display for TestFixture {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0.as_path().display())
        }
    }
    impl From<&TestFixture> for path::PathBuf {
        fn from(value: &TestFixture) -> Self {
            path::PathBuf::from(value.to_string())
        }
    }

    fn unique_suffix() -> String {
        // the process id and clock are unique enough for test directories
        let nanos = time::SystemTime::now().duration_since(time::UNIX_EPOCH).map_or(0, |d| d.subsec_nanos());
        format!("{}-{}", std::process::id(), nanos)
    }
}
