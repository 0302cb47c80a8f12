//! SQLite-backed storage for baselines, quit plans and the progress ledger.
//!
//! Plan and progress queries live in `plan_db.rs` and `progress_db.rs` as
//! further `impl Database` blocks. Every method returns `rusqlite::Error`;
//! the service layer converts into [`crate::error::CoreError`].

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{data_dir, migrations};
use crate::baseline::SmokingBaseline;
use crate::error::{CoreError, DatabaseError};

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "quitplan.db";

// === Helper Functions ===

fn conversion_failure(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Format a calendar date for storage (`YYYY-MM-DD`, sorts lexically).
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(idx: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn parse_datetime(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, e))
}

fn parse_decimal(idx: usize, s: &str) -> Result<Decimal, rusqlite::Error> {
    Decimal::from_str(s).map_err(|e| conversion_failure(idx, e))
}

fn row_to_baseline(row: &rusqlite::Row) -> Result<SmokingBaseline, rusqlite::Error> {
    Ok(SmokingBaseline {
        id: row.get(0)?,
        user_id: row.get(1)?,
        cigarettes_per_day: row.get(2)?,
        price_per_pack: parse_decimal(3, &row.get::<_, String>(3)?)?,
        recorded_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
    })
}

/// SQLite database holding every quit-plan record.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/quitplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join(DB_FILE_NAME);
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // === Baseline CRUD ===

    /// Store a new baseline record. Earlier records are kept as history.
    pub fn record_baseline(
        &self,
        user_id: &str,
        cigarettes_per_day: u32,
        price_per_pack: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<SmokingBaseline, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO smoking_baselines (user_id, cigarettes_per_day, price_per_pack, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                cigarettes_per_day,
                price_per_pack.to_string(),
                recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(SmokingBaseline {
            id: self.conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            cigarettes_per_day,
            price_per_pack,
            recorded_at,
        })
    }

    /// The most recently recorded baseline for `user_id`.
    pub fn current_baseline(&self, user_id: &str) -> Result<Option<SmokingBaseline>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, user_id, cigarettes_per_day, price_per_pack, recorded_at
                 FROM smoking_baselines
                 WHERE user_id = ?1
                 ORDER BY id DESC
                 LIMIT 1",
                params![user_id],
                row_to_baseline,
            )
            .optional()
    }

    /// All baselines for `user_id`, newest first.
    pub fn list_baselines(&self, user_id: &str) -> Result<Vec<SmokingBaseline>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, cigarettes_per_day, price_per_pack, recorded_at
             FROM smoking_baselines
             WHERE user_id = ?1
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_baseline)?;
        rows.collect()
    }
}
