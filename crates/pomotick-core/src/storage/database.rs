//! SQLite-based interval storage.
//!
//! One row per interval. Durations are stored in nanoseconds, the state as
//! its integer code, and the start time as RFC 3339 text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::IntervalRepository;
use crate::error::RepositoryError;
use crate::interval::{Category, Interval, IntervalState};

const COLUMNS: &str = "id, start_time, planned_duration, actual_duration, category, state";

/// SQLite database for interval storage.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, RepositoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS intervals (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time       TEXT NOT NULL,
                planned_duration INTEGER NOT NULL DEFAULT 0,
                actual_duration  INTEGER NOT NULL DEFAULT 0,
                category         TEXT NOT NULL,
                state            INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_intervals_category ON intervals(category);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Storage("connection lock poisoned".into()))
    }
}

/// Raw column values; converted outside the rusqlite row callback so that
/// decoding errors map onto `RepositoryError`.
struct RawInterval {
    id: i64,
    start_time: String,
    planned_ns: i64,
    actual_ns: i64,
    category: String,
    state: i64,
}

impl RawInterval {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            start_time: row.get(1)?,
            planned_ns: row.get(2)?,
            actual_ns: row.get(3)?,
            category: row.get(4)?,
            state: row.get(5)?,
        })
    }

    fn decode(self) -> Result<Interval, RepositoryError> {
        let start_time = DateTime::parse_from_rfc3339(&self.start_time)
            .map_err(|e| RepositoryError::Storage(format!("bad start_time: {e}")))?
            .with_timezone(&Utc);
        let state = IntervalState::from_code(self.state)
            .ok_or(RepositoryError::InvalidState(self.state))?;
        Ok(Interval {
            id: self.id,
            start_time,
            planned_duration: from_nanos(self.planned_ns),
            actual_duration: from_nanos(self.actual_ns),
            category: self.category.parse::<Category>()?,
            state,
        })
    }
}

fn from_nanos(ns: i64) -> Duration {
    Duration::from_nanos(u64::try_from(ns).unwrap_or(0))
}

fn to_nanos(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

impl IntervalRepository for SqliteRepository {
    fn create(&self, interval: Interval) -> Result<i64, RepositoryError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO intervals (start_time, planned_duration, actual_duration, category, state)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                interval.start_time.to_rfc3339(),
                to_nanos(interval.planned_duration),
                to_nanos(interval.actual_duration),
                interval.category.as_str(),
                interval.state.code(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, interval: Interval) -> Result<(), RepositoryError> {
        let changed = self.conn()?.execute(
            "UPDATE intervals
             SET start_time = ?1, planned_duration = ?2, actual_duration = ?3,
                 category = ?4, state = ?5
             WHERE id = ?6",
            params![
                interval.start_time.to_rfc3339(),
                to_nanos(interval.planned_duration),
                to_nanos(interval.actual_duration),
                interval.category.as_str(),
                interval.state.code(),
                interval.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::InvalidId(interval.id));
        }
        Ok(())
    }

    fn by_id(&self, id: i64) -> Result<Interval, RepositoryError> {
        let raw = self
            .conn()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM intervals WHERE id = ?1"),
                params![id],
                RawInterval::from_row,
            )
            .optional()?;
        raw.ok_or(RepositoryError::InvalidId(id))?.decode()
    }

    fn last(&self) -> Result<Interval, RepositoryError> {
        let raw = self
            .conn()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM intervals ORDER BY id DESC LIMIT 1"),
                [],
                RawInterval::from_row,
            )
            .optional()?;
        raw.ok_or(RepositoryError::NoIntervals)?.decode()
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM intervals
             WHERE category IN (?1, ?2)
             ORDER BY id DESC LIMIT ?3"
        ))?;
        let rows = stmt.query_map(
            params![
                Category::ShortBreak.as_str(),
                Category::LongBreak.as_str(),
                i64::try_from(n).unwrap_or(i64::MAX),
            ],
            RawInterval::from_row,
        )?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }
}
