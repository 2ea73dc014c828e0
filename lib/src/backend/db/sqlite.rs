//! The Sqlite database implementation of the observations store.

pub mod admin;
mod observations;

use crate::{
    backend::{Backend, Config},
    entities::{DateRange, HourlyObservation, StoreSummary},
};
use std::path::PathBuf;

/// The result of some rusqlite function.
type SqlResult<T> = Result<T, rusqlite::Error>;

/// The name of the database
pub(crate) const DB_FILENAME: &str = "weather_data.db";

/// Create a database specific error message.
macro_rules! error {
    ($($arg:tt)*) => {
        crate::Error::storage(format!("SQLite {}", format!($($arg)*)))
    }
}
use error;

/// Create an error from the database specific error message.
macro_rules! err {
    ($($arg:tt)*) => {
        Err($crate::backend::db::sqlite::error!($($arg)*))
    };
}
use err;

/// Create a database connection.
///
/// # Arguments
///
/// * `optional_file` is the database file, if `None` an in-memory database will be used.
///
pub(in crate::backend::db) fn db_connection(optional_file: Option<PathBuf>) -> crate::Result<rusqlite::Connection> {
    match optional_file {
        Some(file) => match rusqlite::Connection::open(&file) {
            Ok(conn) => Ok(conn),
            Err(error) => err!("failed to get a database connection to {}: {:?}", file.display(), error),
        },
        None => match rusqlite::Connection::open_in_memory() {
            Ok(conn) => Ok(conn),
            Err(error) => err!("failed to create in-memory database connection: {:?}", error),
        },
    }
}

/// A helper to create a database connection.
macro_rules! db_conn {
    ($data_dir:expr) => {
        $crate::backend::db::sqlite::db_connection(Some($data_dir.join($crate::backend::db::sqlite::DB_FILENAME)))
    };
}
use db_conn;

/// A helper to execute SQL.
macro_rules! execute_sql {
    ($stmt:expr, $params:expr, $($arg:tt)*) => {
        match $stmt.execute($params) {
            Ok(_) => Ok(()),
            Err(error) => err!("{}: {:?}", format!($($arg)*), error)
        }
    };
}
use execute_sql;

/// A helper to prepare an SQL statement.
macro_rules! prepare_sql {
    ($conn:expr, $sql:expr, $($args:tt)*) => {
        match $conn.prepare($sql) {
            Ok(stmt) => Ok(stmt),
            Err(error) => err!("{}: {:?}", format!($($args)*), error)
        }
    };
}
use prepare_sql;

/// A helper to prepare a cached SQL statement.
macro_rules! prepare_cached_sql {
    ($conn:expr, $sql:expr, $($args:tt)*) => {
        match $conn.prepare_cached($sql) {
            Ok(stmt) => Ok(stmt),
            Err(error) => err!("{}: {:?}", format!($($args)*), error)
        }
    };
}
use prepare_cached_sql;

/// A helper to query rows from the database.
macro_rules! query_rows {
    ($stmt:expr, $params:expr, $($args:tt)*) => {
        match $stmt.query($params) {
            Ok(rows) => Ok(rows),
            Err(error) => err!("{}: {:?}", format!($($args)*), error)
        }
    };
}
use query_rows;

/// A helper that creates a transaction.
macro_rules! create_tx {
    ($conn:expr, $($args:tt)*) => {
        match $conn.transaction() {
            Ok(tx) => Ok(tx),
            Err(error) => err!("{}: {:?}", format!($($args)*), error)
        }
    };
}
use create_tx;

/// A helper that commits a transaction.
macro_rules! commit_tx {
    ($tx:expr, $($arg:tt)*) => {
        match $tx.commit() {
            Ok(_) => Ok(()),
            Err(error) => err!("{}: {:?}", format!($($arg)*), error)
        }
    };
}
use commit_tx;

/// The Sqlite3 observations store implementation.
pub struct SqliteBackend {
    /// The weather job configuration being used.
    config: Config,
    /// The weather data directory.
    data_dir: PathBuf,
}
impl SqliteBackend {
    pub fn new(config: Config, data_dir: PathBuf) -> Self {
        Self { config, data_dir }
    }
}
impl Backend for SqliteBackend {
    fn get_config(&self) -> &Config {
        &self.config
    }

    fn add_observations(&self, observations: &[HourlyObservation]) -> crate::Result<usize> {
        let mut conn = db_conn!(&self.data_dir)?;
        observations::upsert(&mut conn, observations)
    }

    fn get_observations(&self, alias: &str, range: &DateRange) -> crate::Result<Vec<HourlyObservation>> {
        let conn = db_conn!(&self.data_dir)?;
        observations::get(&conn, alias, range)
    }

    fn get_summaries(&self) -> crate::Result<Vec<StoreSummary>> {
        let conn = db_conn!(&self.data_dir)?;
        observations::summary(&conn)
    }
}
