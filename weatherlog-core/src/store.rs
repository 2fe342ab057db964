//! SQLite-backed history of weather lookups.
//!
//! [`WeatherStore`] holds no connection. Every operation opens the database,
//! runs inside a single transaction, commits and closes again, so two calls
//! never share connection state.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, Row, Transaction, params};
use tracing::debug;

use crate::{WeatherError, error::Result, model::WeatherRecord};

/// Format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Idempotent DDL for the history table.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS weather_data (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    TEXT NOT NULL,
    temperature REAL NOT NULL,
    description TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);
";

const RECORD_COLUMNS: &str = "id, location, temperature, description, timestamp";

#[derive(Debug, Clone)]
pub struct WeatherStore {
    path: PathBuf,
}

impl WeatherStore {
    /// Point a store at `path`, creating the file and table if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Store(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let store = Self { path };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the history table if it is absent. Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<()> {
        self.with_transaction(|tx| tx.execute_batch(SCHEMA))
    }

    /// Record a lookup made now. Returns the new row id.
    pub fn insert(&self, location: &str, celsius: f64, description: &str) -> Result<i64> {
        self.insert_at(location, celsius, description, Local::now().naive_local())
    }

    /// Record a lookup made at `at` (local time).
    pub fn insert_at(
        &self,
        location: &str,
        celsius: f64,
        description: &str,
        at: NaiveDateTime,
    ) -> Result<i64> {
        let temperature = round_to_hundredths(celsius);
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();

        let id = self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO weather_data (location, temperature, description, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![location, temperature, description, timestamp],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        debug!(id, location, temperature, %timestamp, "recorded weather lookup");
        Ok(id)
    }

    /// Most recent records first. Records sharing a timestamp come newest id first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<WeatherRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_transaction(|tx| {
            let mut stmt = tx.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM weather_data
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], record_from_row)?;
            rows.collect()
        })
    }

    /// Every record in insertion order.
    pub fn all_records(&self) -> Result<Vec<WeatherRecord>> {
        self.with_transaction(|tx| {
            let mut stmt = tx.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM weather_data ORDER BY id"
            ))?;
            let rows = stmt.query_map([], record_from_row)?;
            rows.collect()
        })
    }

    /// Replace the description of record `id`. The timestamp is left untouched.
    ///
    /// An unknown id is a silent no-op; callers are expected to have
    /// validated `description` already.
    pub fn update_description(&self, id: i64, description: &str) -> Result<()> {
        let changed = self.with_transaction(|tx| {
            tx.execute(
                "UPDATE weather_data SET description = ?1 WHERE id = ?2",
                params![description, id],
            )
        })?;
        debug!(id, changed, "updated description");
        Ok(())
    }

    /// Remove record `id`. An unknown id is a silent no-op.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self.with_transaction(|tx| {
            tx.execute("DELETE FROM weather_data WHERE id = ?1", params![id])
        })?;
        debug!(id, changed, "deleted record");
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self.with_transaction(|tx| {
            tx.query_row("SELECT COUNT(*) FROM weather_data", [], |row| row.get(0))
        })?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    /// Open a connection, run `op` in a transaction, commit and close.
    ///
    /// On error the transaction is dropped, which rolls it back.
    fn with_transaction<T>(
        &self,
        op: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let mut conn = Connection::open(&self.path)?;

        let value = {
            let tx = conn.transaction()?;
            let value = op(&tx)?;
            tx.commit()?;
            value
        };

        conn.close().map_err(|(_, e)| WeatherError::from(e))?;
        Ok(value)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<WeatherRecord> {
    Ok(WeatherRecord {
        id: row.get(0)?,
        location: row.get(1)?,
        temperature: row.get(2)?,
        description: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
