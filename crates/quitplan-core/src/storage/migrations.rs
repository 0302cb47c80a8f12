//! Database schema migrations for quitplan.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: baselines, plans, milestones and the progress ledger.
///
/// Milestones and progress entries are keyed to their plan and go with it
/// on delete. A partial unique index allows at most one open plan per user.
/// Dates are stored as `YYYY-MM-DD` text so range scans sort correctly;
/// money is stored as decimal text.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS smoking_baselines (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id            TEXT NOT NULL,
            cigarettes_per_day INTEGER NOT NULL CHECK (cigarettes_per_day > 0),
            price_per_pack     TEXT NOT NULL,
            recorded_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quit_plans (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL,
            start_date          TEXT NOT NULL,
            quit_months         REAL NOT NULL,
            baseline_cigarettes INTEGER NOT NULL,
            is_done             INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL,
            completed_at        TEXT
        );

        CREATE TABLE IF NOT EXISTS milestones (
            plan_id           TEXT NOT NULL REFERENCES quit_plans(id) ON DELETE CASCADE,
            step_index        INTEGER NOT NULL,
            day_offset        INTEGER NOT NULL,
            target_cigarettes INTEGER NOT NULL,
            PRIMARY KEY (plan_id, step_index)
        );

        CREATE TABLE IF NOT EXISTS progress_entries (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            plan_id    TEXT NOT NULL REFERENCES quit_plans(id) ON DELETE CASCADE,
            log_date   TEXT NOT NULL,
            smoked     INTEGER NOT NULL CHECK (smoked >= 0),
            note       TEXT,
            updated_at TEXT NOT NULL,
            UNIQUE (plan_id, log_date)
        );

        CREATE INDEX IF NOT EXISTS idx_baselines_user ON smoking_baselines(user_id);
        CREATE INDEX IF NOT EXISTS idx_quit_plans_user ON quit_plans(user_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_quit_plans_active_user
            ON quit_plans(user_id) WHERE is_done = 0;",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        // completed_at exists
        conn.prepare("SELECT completed_at FROM quit_plans").unwrap();
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_fresh_schema_has_active_plan_index() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'index' AND name = 'idx_quit_plans_active_user'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 1);
    }

    #[test]
    fn test_second_open_plan_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO quit_plans (id, user_id, start_date, quit_months, baseline_cigarettes, created_at)
             VALUES ('a', 'u1', '2024-01-01', 1.0, 10, '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();
        let second = conn.execute(
            "INSERT INTO quit_plans (id, user_id, start_date, quit_months, baseline_cigarettes, created_at)
             VALUES ('b', 'u1', '2024-01-02', 1.0, 10, '2024-01-02T00:00:00+00:00')",
            [],
        );
        assert!(second.is_err());

        // a finished plan does not count
        conn.execute("UPDATE quit_plans SET is_done = 1 WHERE id = 'a'", [])
            .unwrap();
        conn.execute(
            "INSERT INTO quit_plans (id, user_id, start_date, quit_months, baseline_cigarettes, created_at)
             VALUES ('b', 'u1', '2024-01-02', 1.0, 10, '2024-01-02T00:00:00+00:00')",
            [],
        )
        .unwrap();
    }
}
