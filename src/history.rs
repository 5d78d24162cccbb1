use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{Connection, Result as SqliteResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::domain;
use crate::logfile::{LogBatch, LogEntry};

/// Chromium stores visit times as microseconds since 1601-01-01 UTC.
pub fn chrome_time_to_date(micros: i64) -> Option<NaiveDate> {
    let epoch = DateTime::<Utc>::from_timestamp(-11_644_473_600, 0)?;
    epoch
        .checked_add_signed(Duration::microseconds(micros))
        .map(|t| t.date_naive())
}

/// The browser keeps its history database locked, so work on a copy.
pub fn copy_history_database(history_path: &Path, temp_path: Option<&Path>) -> Result<PathBuf> {
    let start_time = Instant::now();

    let temp_path = temp_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| {
            env::temp_dir().join(format!("tldcount_history_{}.db", std::process::id()))
        });

    info!(action = "copy", component = "database_copy", source = ?history_path, destination = ?temp_path, "Copying history database");

    if !history_path.exists() {
        anyhow::bail!("History file not found at {:?}", history_path);
    }

    fs::copy(history_path, &temp_path)
        .with_context(|| format!("Failed to copy {:?} to {:?}", history_path, temp_path))?;

    info!(action = "complete", component = "database_copy", duration_ms = start_time.elapsed().as_millis(), "Database copy completed");
    Ok(temp_path)
}

/// Every visit as a `(host, date)` entry, oldest first.
pub fn read_visits(conn: &Connection) -> Result<LogBatch> {
    let start_time = Instant::now();
    info!(action = "start", component = "visit_query", "Querying history visits");

    let rows: Vec<(String, i64)> = conn
        .prepare(
            "SELECT urls.url, visits.visit_time FROM visits \
             JOIN urls ON visits.url = urls.id ORDER BY visits.visit_time",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<SqliteResult<Vec<_>>>()
        .context("Failed to query visits")?;

    let mut batch = LogBatch::default();
    for (url, visit_time) in rows {
        let entry = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .filter(|host| domain::is_valid_hostname(host))
            .zip(chrome_time_to_date(visit_time))
            .map(|(host, date)| LogEntry { host, date });
        match entry {
            Some(entry) => batch.entries.push(entry),
            None => batch.skipped += 1,
        }
    }

    info!(
        action = "complete",
        component = "visit_query",
        entry_count = batch.entries.len(),
        skipped = batch.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "History visits loaded"
    );
    Ok(batch)
}

pub fn load_history(history_path: &Path, temp_path: Option<&Path>) -> Result<LogBatch> {
    let temp_path = copy_history_database(history_path, temp_path)?;
    let batch = {
        let conn = Connection::open(&temp_path)
            .with_context(|| format!("Failed to open history database {:?}", temp_path))?;
        read_visits(&conn)
    };

    if let Err(e) = fs::remove_file(&temp_path) {
        warn!(action = "cleanup", component = "database_copy", error = %e, "Failed to remove temporary file");
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15T12:00:00Z expressed in Chromium time.
    const JAN_15_NOON: i64 = (1_705_320_000 + 11_644_473_600) * 1_000_000;

    fn seed(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER, visit_time INTEGER);",
        )
        .unwrap();
        let urls = [
            (1, "https://www.example.com/"),
            (2, "https://docs.rs/chrono"),
            (3, "not a url"),
        ];
        for (id, url) in urls {
            conn.execute("INSERT INTO urls (id, url) VALUES (?1, ?2)", (id, url))
                .unwrap();
        }
        for (url, time) in [(1, JAN_15_NOON), (2, JAN_15_NOON + 1), (3, JAN_15_NOON), (1, 0)] {
            conn.execute(
                "INSERT INTO visits (url, visit_time) VALUES (?1, ?2)",
                (url, time),
            )
            .unwrap();
        }
    }

    #[test]
    fn converts_chrome_timestamps() {
        assert_eq!(
            chrome_time_to_date(JAN_15_NOON),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(chrome_time_to_date(0), NaiveDate::from_ymd_opt(1601, 1, 1));
    }

    #[test]
    fn reads_visits_and_skips_unparseable_urls() {
        let conn = Connection::open_in_memory().unwrap();
        seed(&conn);
        let batch = read_visits(&conn).unwrap();
        let hosts: Vec<_> = batch.entries.iter().map(|e| e.host.as_str()).collect();
        assert_eq!(hosts, ["www.example.com", "www.example.com", "docs.rs"]);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.entries[0].date, NaiveDate::from_ymd_opt(1601, 1, 1).unwrap());
    }

    #[test]
    fn load_history_reads_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("History");
        seed(&Connection::open(&db_path).unwrap());

        let copy_path = dir.path().join("copy.db");
        let batch = load_history(&db_path, Some(&copy_path)).unwrap();
        assert_eq!(batch.entries.len(), 3);
        assert!(db_path.exists());
        assert!(!copy_path.exists());
    }

    #[test]
    fn missing_history_is_an_error() {
        assert!(load_history(Path::new("/no/such/History"), None).is_err());
    }
}
