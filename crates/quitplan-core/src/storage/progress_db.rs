//! Progress ledger queries.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::database::{format_date, parse_date, parse_datetime, Database};
use crate::progress::ProgressEntry;

fn row_to_entry(row: &rusqlite::Row) -> Result<ProgressEntry, rusqlite::Error> {
    Ok(ProgressEntry {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        log_date: parse_date(2, &row.get::<_, String>(2)?)?,
        smoked: row.get(3)?,
        note: row.get(4)?,
        updated_at: parse_datetime(5, &row.get::<_, String>(5)?)?,
    })
}

impl Database {
    // === Progress CRUD ===

    /// Insert or overwrite the entry for `(plan_id, log_date)`. Last writer wins.
    pub fn upsert_progress(
        &self,
        plan_id: &str,
        log_date: NaiveDate,
        smoked: u32,
        note: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<ProgressEntry, rusqlite::Error> {
        self.conn().query_row(
            "INSERT INTO progress_entries (plan_id, log_date, smoked, note, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(plan_id, log_date) DO UPDATE SET
                smoked = excluded.smoked,
                note = excluded.note,
                updated_at = excluded.updated_at
             RETURNING id, plan_id, log_date, smoked, note, updated_at",
            params![
                plan_id,
                format_date(log_date),
                smoked,
                note,
                updated_at.to_rfc3339()
            ],
            row_to_entry,
        )
    }

    pub fn get_progress(
        &self,
        plan_id: &str,
        log_date: NaiveDate,
    ) -> Result<Option<ProgressEntry>, rusqlite::Error> {
        self.conn()
            .query_row(
                "SELECT id, plan_id, log_date, smoked, note, updated_at
                 FROM progress_entries
                 WHERE plan_id = ?1 AND log_date = ?2",
                params![plan_id, format_date(log_date)],
                row_to_entry,
            )
            .optional()
    }

    /// All entries of a plan, oldest first.
    pub fn list_progress(&self, plan_id: &str) -> Result<Vec<ProgressEntry>, rusqlite::Error> {
        let mut stmt = self.conn().prepare(
            "SELECT id, plan_id, log_date, smoked, note, updated_at
             FROM progress_entries
             WHERE plan_id = ?1
             ORDER BY log_date",
        )?;
        let rows = stmt.query_map(params![plan_id], row_to_entry)?;
        rows.collect()
    }

    /// Entries with `start <= log_date < end`, oldest first.
    pub fn list_progress_between(
        &self,
        plan_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProgressEntry>, rusqlite::Error> {
        let mut stmt = self.conn().prepare(
            "SELECT id, plan_id, log_date, smoked, note, updated_at
             FROM progress_entries
             WHERE plan_id = ?1 AND log_date >= ?2 AND log_date < ?3
             ORDER BY log_date",
        )?;
        let rows = stmt.query_map(
            params![plan_id, format_date(start), format_date(end)],
            row_to_entry,
        )?;
        rows.collect()
    }
}
