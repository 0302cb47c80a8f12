//! Quit plan and milestone queries.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::database::{format_date, parse_date, parse_datetime, Database};
use crate::plan::{Milestone, QuitPlan};

const PLAN_COLUMNS: &str =
    "id, user_id, start_date, quit_months, baseline_cigarettes, is_done, created_at, completed_at";

fn row_to_plan(row: &rusqlite::Row) -> Result<QuitPlan, rusqlite::Error> {
    let completed_at: Option<String> = row.get(7)?;
    Ok(QuitPlan {
        id: row.get(0)?,
        user_id: row.get(1)?,
        start_date: parse_date(2, &row.get::<_, String>(2)?)?,
        quit_months: row.get(3)?,
        baseline_cigarettes: row.get(4)?,
        is_done: row.get(5)?,
        created_at: parse_datetime(6, &row.get::<_, String>(6)?)?,
        completed_at: completed_at
            .as_deref()
            .map(|s| parse_datetime(7, s))
            .transpose()?,
    })
}

fn row_to_milestone(row: &rusqlite::Row) -> Result<Milestone, rusqlite::Error> {
    Ok(Milestone {
        step_index: row.get(0)?,
        day_offset: row.get(1)?,
        target_cigarettes: row.get(2)?,
    })
}

impl Database {
    // === Plan CRUD ===

    /// Insert `plan` and its milestones in one transaction.
    ///
    /// Any plan still open for the same user is marked done first, stamped
    /// with the new plan's `created_at`. Returns the id of the retired plan.
    pub fn create_plan_with_milestones(
        &self,
        plan: &QuitPlan,
        milestones: &[Milestone],
    ) -> Result<Option<String>, rusqlite::Error> {
        let tx = self.conn().unchecked_transaction()?;

        let retired: Option<String> = tx
            .query_row(
                "SELECT id FROM quit_plans WHERE user_id = ?1 AND is_done = 0",
                params![plan.user_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(old_id) = &retired {
            tx.execute(
                "UPDATE quit_plans SET is_done = 1, completed_at = ?2 WHERE id = ?1",
                params![old_id, plan.created_at.to_rfc3339()],
            )?;
        }

        tx.execute(
            "INSERT INTO quit_plans
                (id, user_id, start_date, quit_months, baseline_cigarettes, is_done, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                plan.id,
                plan.user_id,
                format_date(plan.start_date),
                plan.quit_months,
                plan.baseline_cigarettes,
                plan.is_done,
                plan.created_at.to_rfc3339(),
                plan.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO milestones (plan_id, step_index, day_offset, target_cigarettes)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for m in milestones {
                stmt.execute(params![
                    plan.id,
                    m.step_index,
                    m.day_offset,
                    m.target_cigarettes
                ])?;
            }
        }

        tx.commit()?;
        Ok(retired)
    }

    pub fn get_plan(&self, id: &str) -> Result<Option<QuitPlan>, rusqlite::Error> {
        self.conn()
            .query_row(
                &format!("SELECT {PLAN_COLUMNS} FROM quit_plans WHERE id = ?1"),
                params![id],
                row_to_plan,
            )
            .optional()
    }

    /// The user's single open plan, if any.
    pub fn active_plan(&self, user_id: &str) -> Result<Option<QuitPlan>, rusqlite::Error> {
        self.conn()
            .query_row(
                &format!("SELECT {PLAN_COLUMNS} FROM quit_plans WHERE user_id = ?1 AND is_done = 0"),
                params![user_id],
                row_to_plan,
            )
            .optional()
    }

    /// Every plan of `user_id`, newest first.
    pub fn list_plans(&self, user_id: &str) -> Result<Vec<QuitPlan>, rusqlite::Error> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PLAN_COLUMNS} FROM quit_plans
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![user_id], row_to_plan)?;
        rows.collect()
    }

    /// Milestones of a plan in ascending step order.
    pub fn milestones_for_plan(&self, plan_id: &str) -> Result<Vec<Milestone>, rusqlite::Error> {
        let mut stmt = self.conn().prepare(
            "SELECT step_index, day_offset, target_cigarettes
             FROM milestones
             WHERE plan_id = ?1
             ORDER BY step_index",
        )?;
        let rows = stmt.query_map(params![plan_id], row_to_milestone)?;
        rows.collect()
    }

    /// Mark an open plan done. Returns false if the plan is missing or already done.
    pub fn complete_plan(
        &self,
        plan_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, rusqlite::Error> {
        let changed = self.conn().execute(
            "UPDATE quit_plans SET is_done = 1, completed_at = ?2 WHERE id = ?1 AND is_done = 0",
            params![plan_id, completed_at.to_rfc3339()],
        )?;
        Ok(changed > 0)
    }

    /// Delete a plan owned by `user_id` with its milestones and progress.
    /// Returns false if no such plan exists for that user.
    pub fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self.conn().execute(
            "DELETE FROM quit_plans WHERE id = ?1 AND user_id = ?2",
            params![plan_id, user_id],
        )?;
        Ok(changed > 0)
    }
}
