//! This module manages the hourly observations table in the database.

use super::{commit_tx, create_tx, execute_sql, prepare_cached_sql, prepare_sql, query_rows, SqlResult};
use crate::entities::{next_day, DateRange, HourlyObservation, StoreSummary};
use chrono::NaiveTime;
use rusqlite::{named_params, Connection, Row, Transaction};

/// Create an observations specific error message.
macro_rules! error {
    ($($arg:tt)*) => {
        crate::Error::storage(format!("observations {}", format!($($arg)*)))
    }
}

/// Create an error from the observations specific error message.
macro_rules! err {
    ($($arg:tt)*) => {
        Err(error!($($arg)*))
    };
}

/// Upsert a batch of hourly observations.
///
/// The batch is applied inside a single transaction. If any row cannot be
/// written the transaction is rolled back and none of the batch is visible,
/// a crash mid write cannot leave a partially ingested hour range behind.
/// Rows whose `(location, timestamp_local)` key already exists have every
/// value column replaced.
///
/// # Arguments
///
/// * `conn` is the database connection that will be used.
/// * `observations` is the batch that will be written.
///
pub fn upsert(conn: &mut Connection, observations: &[HourlyObservation]) -> crate::Result<usize> {
    if observations.is_empty() {
        log::info!("No observations to save.");
        return Ok(0);
    }
    let mut tx = create_tx!(conn, "failed to create upsert transaction")?;
    for observation in observations {
        if observation.location.trim().is_empty() {
            err!("an observation at {} has no location key", observation.timestamp_local)?;
        }
        upsert_observation(&mut tx, observation)?;
    }
    commit_tx!(tx, "failed to commit observations")?;
    Ok(observations.len())
}

/// Write a single hourly observation into the database.
///
/// # Arguments
///
/// * `tx` is the transaction associated with the data insertion.
/// * `observation` is the hourly observation that will be written.
///
fn upsert_observation(tx: &mut Transaction, observation: &HourlyObservation) -> crate::Result<()> {
    const UPSERT_SQL: &str = r#"
    INSERT INTO observations (
        location, timestamp_local, timezone_name, temperature, feels_like, humidity,
        precipitation, precipitation_chance, wind_speed, wind_gust, pressure,
        cloud_cover, conditions, icon, source, fetched_at
    )
    VALUES (
        :location, :timestamp_local, :timezone_name, :temperature, :feels_like, :humidity,
        :precipitation, :precipitation_chance, :wind_speed, :wind_gust, :pressure,
        :cloud_cover, :conditions, :icon, :source, datetime('now')
    )
    ON CONFLICT (location, timestamp_local) DO UPDATE SET
        timezone_name=excluded.timezone_name,
        temperature=excluded.temperature,
        feels_like=excluded.feels_like,
        humidity=excluded.humidity,
        precipitation=excluded.precipitation,
        precipitation_chance=excluded.precipitation_chance,
        wind_speed=excluded.wind_speed,
        wind_gust=excluded.wind_gust,
        pressure=excluded.pressure,
        cloud_cover=excluded.cloud_cover,
        conditions=excluded.conditions,
        icon=excluded.icon,
        source=excluded.source,
        fetched_at=excluded.fetched_at
    "#;
    let mut stmt = prepare_cached_sql!(tx, UPSERT_SQL, "failed to prepare upsert SQL")?;
    let params = named_params![
        ":location": observation.location,
        ":timestamp_local": observation.timestamp_local,
        ":timezone_name": observation.timezone_name,
        ":temperature": observation.temperature,
        ":feels_like": observation.feels_like,
        ":humidity": observation.humidity,
        ":precipitation": observation.precipitation,
        ":precipitation_chance": observation.precipitation_chance,
        ":wind_speed": observation.wind_speed,
        ":wind_gust": observation.wind_gust,
        ":pressure": observation.pressure,
        ":cloud_cover": observation.cloud_cover,
        ":conditions": observation.conditions,
        ":icon": observation.icon,
        ":source": "VisualCrossing",
    ];
    execute_sql!(stmt, params, "failed to upsert observation")
}

/// Get the hourly observations for a location.
///
/// The rows are returned ordered by observation hour ascending.
///
/// # Arguments
///
/// * `conn` is the database connection that will be used.
/// * `alias` is the location whose observations will be returned.
/// * `range` is the observation dates to query.
pub fn get(conn: &Connection, alias: &str, range: &DateRange) -> crate::Result<Vec<HourlyObservation>> {
    const OBSERVATIONS_SQL: &str = r#"
        SELECT
            location, timestamp_local, timezone_name, temperature, feels_like, humidity,
            precipitation, precipitation_chance, wind_speed, wind_gust, pressure,
            cloud_cover, conditions, icon
        FROM observations
        WHERE location=:location AND timestamp_local >= :from AND timestamp_local < :thru
        ORDER BY timestamp_local
    "#;
    let from = range.start.and_time(NaiveTime::MIN);
    let thru = next_day!(range.end).and_time(NaiveTime::MIN);
    let mut stmt = prepare_sql!(conn, OBSERVATIONS_SQL, "failed to prepare observations query")?;
    let params = named_params![":location": alias, ":from": from, ":thru": thru];
    let mut rows = query_rows!(stmt, params, "'{}' observations query failed", alias)?;
    let mut observations = vec![];
    loop {
        match rows.next() {
            Ok(None) => break,
            Err(error) => err!("failed to get next observations row: {:?}", error)?,
            Ok(Some(row)) => match row_to_observation(row) {
                Ok(observation) => observations.push(observation),
                Err(error) => err!("failed to create observation from row: {:?}", error)?,
            },
        }
    }
    Ok(observations)
}

/// Create an hourly observation from the database.
///
/// # Arguments
///
/// * `row` the query row that will be converted into an observation.
///
fn row_to_observation(row: &Row) -> SqlResult<HourlyObservation> {
    Ok(HourlyObservation {
        location: row.get("location")?,
        timestamp_local: row.get("timestamp_local")?,
        timezone_name: row.get("timezone_name")?,
        temperature: row.get("temperature")?,
        feels_like: row.get("feels_like")?,
        humidity: row.get("humidity")?,
        precipitation: row.get("precipitation")?,
        precipitation_chance: row.get("precipitation_chance")?,
        wind_speed: row.get("wind_speed")?,
        wind_gust: row.get("wind_gust")?,
        pressure: row.get("pressure")?,
        cloud_cover: row.get("cloud_cover")?,
        conditions: row.get("conditions")?,
        icon: row.get("icon")?,
    })
}

/// Get a summary of the observations available per location.
///
/// # Arguments
///
/// * `conn` is the database connection that will be used.
pub fn summary(conn: &Connection) -> crate::Result<Vec<StoreSummary>> {
    const SUMMARY_SQL: &str = r#"
        SELECT
            location,
            COUNT(*) AS hours,
            MIN(timestamp_local) AS earliest,
            MAX(timestamp_local) AS latest
        FROM observations
        GROUP BY location
        ORDER BY location
    "#;
    let mut stmt = prepare_sql!(conn, SUMMARY_SQL, "failed to prepare summary query")?;
    let mut rows = query_rows!(stmt, [], "summary query failed")?;
    let mut summaries = vec![];
    loop {
        match rows.next() {
            Ok(None) => break,
            Err(error) => err!("failed to get next summary row: {:?}", error)?,
            Ok(Some(row)) => {
                #[inline]
                fn next_summary(row_: &Row) -> SqlResult<StoreSummary> {
                    Ok(StoreSummary {
                        location: row_.get("location")?,
                        hours: row_.get("hours")?,
                        earliest: row_.get("earliest")?,
                        latest: row_.get("latest")?,
                    })
                }
                match next_summary(row) {
                    Ok(summary) => summaries.push(summary),
                    Err(error) => err!("failed to create summary from row: {:?}", error)?,
                }
            }
        }
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use toolslib::date_time::{get_date, get_time};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("schema.sql")).unwrap();
        conn
    }

    fn observation(alias: &str, timestamp_local: NaiveDateTime, temperature: f64) -> HourlyObservation {
        HourlyObservation {
            location: alias.to_string(),
            timestamp_local,
            timezone_name: Some("Europe/Stockholm".to_string()),
            temperature: Some(temperature),
            feels_like: Some(temperature - 1.0),
            humidity: Some(80.0),
            precipitation: Some(0.0),
            precipitation_chance: Some(0.0),
            wind_speed: Some(2.0),
            wind_gust: Some(4.0),
            pressure: Some(1015.0),
            cloud_cover: Some(50.0),
            conditions: Some("Clear".to_string()),
            icon: Some("clear-night".to_string()),
        }
    }

    fn row_count(conn: &Connection) -> usize {
        conn.query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut conn = test_conn();
        let hour = get_date(2025, 8, 5).and_time(get_time(0, 0, 0));
        let first = observation("kungsbacka", hour, 10.0);
        assert_eq!(upsert(&mut conn, &[first.clone()]).unwrap(), 1);
        assert_eq!(row_count(&conn), 1);

        // same key with new values wins
        let mut second = first.clone();
        second.temperature = Some(12.5);
        second.conditions = Some("Rain".to_string());
        assert_eq!(upsert(&mut conn, &[second.clone()]).unwrap(), 1);
        assert_eq!(row_count(&conn), 1);

        let range = DateRange::new(get_date(2025, 8, 5), get_date(2025, 8, 5));
        let rows = get(&conn, "kungsbacka", &range).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], second);
    }

    #[test]
    fn batch_is_atomic() {
        let mut conn = test_conn();
        let date = get_date(2025, 8, 5);
        let batch = vec![
            observation("kungsbacka", date.and_time(get_time(0, 0, 0)), 10.0),
            observation("", date.and_time(get_time(1, 0, 0)), 11.0),
            observation("kungsbacka", date.and_time(get_time(2, 0, 0)), 12.0),
        ];
        let error = upsert(&mut conn, &batch).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Storage);
        // nothing from the batch is visible
        assert_eq!(row_count(&conn), 0);
    }

    #[test]
    fn query_is_ordered_and_bounded() {
        let mut conn = test_conn();
        let batch = vec![
            observation("kungsbacka", get_date(2025, 8, 6).and_time(get_time(0, 0, 0)), 14.0),
            observation("kungsbacka", get_date(2025, 8, 5).and_time(get_time(23, 0, 0)), 13.0),
            observation("kungsbacka", get_date(2025, 8, 5).and_time(get_time(1, 0, 0)), 11.0),
            observation("kungsbacka", get_date(2025, 8, 4).and_time(get_time(23, 0, 0)), 9.0),
            observation("boise_id", get_date(2025, 8, 5).and_time(get_time(1, 0, 0)), 30.0),
        ];
        upsert(&mut conn, &batch).unwrap();

        let range = DateRange::new(get_date(2025, 8, 5), get_date(2025, 8, 5));
        let rows = get(&conn, "kungsbacka", &range).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp_local, get_date(2025, 8, 5).and_time(get_time(1, 0, 0)));
        assert_eq!(rows[1].timestamp_local, get_date(2025, 8, 5).and_time(get_time(23, 0, 0)));

        // the end date is inclusive, the day after it is not
        let range = DateRange::new(get_date(2025, 8, 5), get_date(2025, 8, 6));
        assert_eq!(get(&conn, "kungsbacka", &range).unwrap().len(), 3);
    }

    #[test]
    fn summaries() {
        let mut conn = test_conn();
        assert!(summary(&conn).unwrap().is_empty());
        let batch = vec![
            observation("kungsbacka", get_date(2025, 8, 5).and_time(get_time(1, 0, 0)), 11.0),
            observation("kungsbacka", get_date(2025, 8, 5).and_time(get_time(2, 0, 0)), 12.0),
            observation("boise_id", get_date(2025, 8, 4).and_time(get_time(12, 0, 0)), 30.0),
        ];
        upsert(&mut conn, &batch).unwrap();
        let summaries = summary(&conn).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].location, "boise_id");
        assert_eq!(summaries[0].hours, 1);
        assert_eq!(summaries[1].location, "kungsbacka");
        assert_eq!(summaries[1].hours, 2);
        assert_eq!(summaries[1].earliest, Some(get_date(2025, 8, 5).and_time(get_time(1, 0, 0))));
        assert_eq!(summaries[1].latest, Some(get_date(2025, 8, 5).and_time(get_time(2, 0, 0))));
    }
}
