//! The administration API for the observations database.

use super::{prepare_sql, query_rows, DB_FILENAME};
use crate::admin::{DbDetails, LocationDetails};
use rusqlite::{Connection, Row};
use std::path::PathBuf;

/// Create a database administration specific error message.
macro_rules! error {
    ($($arg:tt)*) => {
        crate::Error::storage(format!("SQLite admin {}", format!($($arg)*)))
    }
}

/// Create an error from the administration specific error message.
macro_rules! err {
    ($($arg:tt)*) => {
        Err(error!($($arg)*))
    };
}

/// Initialize the database.
///
/// The schema uses `CREATE TABLE IF NOT EXISTS` so initialization is safe to
/// run on every startup.
///
/// # Arguments
///
/// * `data_dir` is the weather data directory.
/// * `drop` when true will delete the schema before initialization.
///
pub fn init_db(data_dir: &PathBuf, drop: bool) -> crate::Result<()> {
    if drop {
        drop_db(data_dir, false)?;
    }
    let conn = super::db_conn!(data_dir)?;
    init_schema(&conn)
}

/// Initialize the database schema.
///
/// # Arguments
///
/// * `conn` is the database connection that will be used.
fn init_schema(conn: &Connection) -> crate::Result<()> {
    log::debug!("init schema");
    let sql = include_str!("schema.sql");
    if let Err(error) = conn.execute_batch(sql) {
        err!("failed to initialize the schema: {:?}", error)?;
    }
    Ok(())
}

/// Provide information about the database.
///
/// # Arguments
///
/// * `data_dir` is the weather data directory.
///
pub fn db_details(data_dir: &PathBuf) -> crate::Result<Option<DbDetails>> {
    let mut db_details = None;
    let file = data_dir.join(DB_FILENAME);
    if file.exists() {
        // query the db details
        let conn = super::db_conn!(data_dir)?;
        const SQL: &str = r#"
            SELECT location, COUNT(*) AS hours
            FROM observations
            GROUP BY location
            ORDER BY location
        "#;
        let mut stmt = prepare_sql!(conn, SQL, "failed to prepare db details query")?;
        let mut rows = query_rows!(stmt, [], "failed to get db details")?;

        // get the results
        let mut location_details = vec![];
        loop {
            match rows.next() {
                Err(error) => err!("failed to get next db details row: {:?}", error)?,
                Ok(None) => break,
                Ok(Some(row)) => {
                    // mine the row data
                    #[inline]
                    fn next_details(row_: &Row) -> super::SqlResult<(String, usize)> {
                        Ok((row_.get(0)?, row_.get(1)?))
                    }
                    match next_details(row) {
                        Err(error) => err!("failed to get db details from row: {:?}", error)?,
                        Ok((location, hours)) => {
                            location_details.push(LocationDetails { location, hours });
                        }
                    }
                }
            };
        }
        let size = file.metadata().map_or(0, |metadata| metadata.len() as usize);
        db_details.replace(DbDetails { size, location_details });
    }
    Ok(db_details)
}

/// Deletes the current database schema.
///
/// # Arguments
///
/// * `data_dir` is the weather data directory.
/// * `delete` when true will remove the database file.
///
pub fn drop_db(data_dir: &PathBuf, delete: bool) -> crate::Result<()> {
    let file = data_dir.join(DB_FILENAME);
    if file.exists() {
        match delete {
            true => {
                if let Err(error) = std::fs::remove_file(&file) {
                    err!("failed to remove {}: {:?}", file.display(), error)?;
                }
            }
            false => drop_schema(super::db_conn!(data_dir)?)?,
        }
    }
    Ok(())
}

/// Delete the database schema.
///
/// Arguments
///
/// * `conn` is the database connection that will be used.
///
fn drop_schema(conn: Connection) -> crate::Result<()> {
    log::debug!("drop schema");
    let sql = include_str!("drop.sql");

    // delete the existing schema
    if let Err(error) = conn.execute_batch(sql) {
        err!("failed to drop the existing schema: {:?}", error)?;
    } else if let Err(error) = conn.execute("VACUUM", ()) {
        err!("failed to repack database: {:?}", error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testlib;

    #[test]
    fn admin() {
        let fixture = testlib::TestFixture::create();
        let data_dir = PathBuf::from(&fixture);
        let db_file = data_dir.join(DB_FILENAME);
        assert!(!db_file.exists());
        init_db(&data_dir, false).unwrap();
        assert!(db_file.exists());
        db_details(&data_dir).unwrap().expect("Did not get DbDetails");
        drop_db(&data_dir, false).unwrap();
        assert!(db_file.exists());
        drop_db(&data_dir, true).unwrap();
        assert!(!db_file.exists());
    }
}
