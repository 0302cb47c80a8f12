//! Quit-plan service.
//!
//! [`QuitPlanService`] validates user input, applies the ledger rules and
//! turns storage results into [`CoreError`]s. It borrows a [`Database`] and a
//! [`Config`] for the duration of one request.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::baseline::SmokingBaseline;
use crate::error::{CoreError, Result, ValidationError};
use crate::plan::{
    check_cigarettes_per_day, generate_schedule, PlanStatus, PlanWithMilestones, QuitPlan,
    TargetSchedule,
};
use crate::progress::{MonthWindow, ProgressEntry};
use crate::savings::SavingsReport;
use crate::storage::{Config, Database};

pub struct QuitPlanService<'a> {
    db: &'a Database,
    config: &'a Config,
}

impl<'a> QuitPlanService<'a> {
    pub fn new(db: &'a Database, config: &'a Config) -> Self {
        Self { db, config }
    }

    // === Baseline ===

    /// Record a new smoking baseline for `user_id`.
    ///
    /// # Errors
    /// - `CoreError::InvalidBaseline` if `cigarettes_per_day <= 0`
    /// - `ValidationError::InvalidValue` above `MAX_CIGARETTES_PER_DAY`
    /// - `ValidationError::InvalidPrice` if `price_per_pack <= 0`
    pub fn record_baseline(
        &self,
        user_id: &str,
        cigarettes_per_day: i64,
        price_per_pack: Decimal,
    ) -> Result<SmokingBaseline> {
        if cigarettes_per_day <= 0 {
            return Err(CoreError::InvalidBaseline { cigarettes_per_day });
        }
        let cigarettes = check_cigarettes_per_day(cigarettes_per_day)?;
        if price_per_pack <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice(price_per_pack).into());
        }

        let baseline = self
            .db
            .record_baseline(user_id, cigarettes, price_per_pack, Utc::now())?;
        tracing::info!(
            user = user_id,
            cigarettes_per_day = cigarettes,
            price_per_pack = %price_per_pack,
            "baseline recorded"
        );
        Ok(baseline)
    }

    pub fn current_baseline(&self, user_id: &str) -> Result<SmokingBaseline> {
        self.db
            .current_baseline(user_id)?
            .ok_or_else(|| CoreError::BaselineNotFound(user_id.to_string()))
    }

    // === Plans ===

    /// Create a plan from the user's current baseline.
    ///
    /// The user's previous active plan, if any, is marked done in the same
    /// transaction that inserts the new plan and its milestones.
    pub fn create_plan(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        quit_months: f64,
    ) -> Result<PlanWithMilestones> {
        let baseline = self.current_baseline(user_id)?;
        let milestones = generate_schedule(
            i64::from(baseline.cigarettes_per_day),
            quit_months,
            self.config.schedule.days_per_month,
        )?;

        let plan = QuitPlan {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            start_date,
            quit_months,
            baseline_cigarettes: baseline.cigarettes_per_day,
            is_done: false,
            created_at: Utc::now(),
            completed_at: None,
        };

        if let Some(retired) = self.db.create_plan_with_milestones(&plan, &milestones)? {
            tracing::warn!(user = user_id, retired_plan = %retired, "active plan replaced");
        }
        tracing::info!(
            user = user_id,
            plan_id = %plan.id,
            start = %start_date,
            quit_months,
            steps = milestones.len(),
            "quit plan created"
        );

        Ok(PlanWithMilestones { plan, milestones })
    }

    /// The user's active plan.
    ///
    /// # Errors
    /// Returns `CoreError::PlanNotFound` if the user has no active plan.
    pub fn active_plan(&self, user_id: &str) -> Result<QuitPlan> {
        self.db
            .active_plan(user_id)?
            .ok_or_else(|| CoreError::PlanNotFound(format!("no active plan for user '{user_id}'")))
    }

    /// A plan owned by `user_id`. Other users' plans are reported as not found.
    fn owned_plan(&self, user_id: &str, plan_id: &str) -> Result<QuitPlan> {
        self.db
            .get_plan(plan_id)?
            .filter(|plan| plan.user_id == user_id)
            .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))
    }

    pub fn plan_with_milestones(&self, user_id: &str, plan_id: &str) -> Result<PlanWithMilestones> {
        let plan = self.owned_plan(user_id, plan_id)?;
        let milestones = self.db.milestones_for_plan(plan_id)?;
        Ok(PlanWithMilestones { plan, milestones })
    }

    /// All plans of the user, newest first.
    pub fn plan_history(&self, user_id: &str) -> Result<Vec<QuitPlan>> {
        Ok(self.db.list_plans(user_id)?)
    }

    /// Mark the user's active plan done and return it.
    pub fn complete_plan(&self, user_id: &str) -> Result<QuitPlan> {
        let plan = self.active_plan(user_id)?;
        if !self.db.complete_plan(&plan.id, Utc::now())? {
            return Err(CoreError::PlanNotFound(plan.id));
        }
        tracing::info!(user = user_id, plan_id = %plan.id, "quit plan completed");
        self.db
            .get_plan(&plan.id)?
            .ok_or(CoreError::PlanNotFound(plan.id))
    }

    /// Delete one of the user's plans along with its milestones and progress.
    pub fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<()> {
        if !self.db.delete_plan(user_id, plan_id)? {
            return Err(CoreError::PlanNotFound(plan_id.to_string()));
        }
        tracing::info!(user = user_id, plan_id, "quit plan deleted");
        Ok(())
    }

    // === Progress ===

    /// Log cigarettes smoked on `log_date` against the user's active plan.
    pub fn record_progress(
        &self,
        user_id: &str,
        log_date: NaiveDate,
        smoked: i64,
        note: Option<&str>,
    ) -> Result<ProgressEntry> {
        let plan = self.active_plan(user_id)?;
        self.record_progress_for_plan(&plan.id, log_date, smoked, note)
    }

    /// Upsert the entry for `(plan_id, log_date)`.
    ///
    /// # Errors
    /// - `CoreError::PlanNotFound` for an unknown plan
    /// - `ValidationError::PlanCompleted` if the plan is done
    /// - `ValidationError::NegativeSmoked` if `smoked < 0`
    /// - `ValidationError::LogDateBeforeStart` if `log_date` precedes the plan start
    pub fn record_progress_for_plan(
        &self,
        plan_id: &str,
        log_date: NaiveDate,
        smoked: i64,
        note: Option<&str>,
    ) -> Result<ProgressEntry> {
        let plan = self
            .db
            .get_plan(plan_id)?
            .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))?;
        if plan.is_done {
            return Err(ValidationError::PlanCompleted(plan.id).into());
        }
        if smoked < 0 {
            return Err(ValidationError::NegativeSmoked(smoked).into());
        }
        let smoked = u32::try_from(smoked).map_err(|_| ValidationError::InvalidValue {
            field: "smoked".into(),
            message: format!("{smoked} is out of range"),
        })?;
        if log_date < plan.start_date {
            return Err(ValidationError::LogDateBeforeStart {
                log_date,
                start_date: plan.start_date,
            }
            .into());
        }

        let entry = self
            .db
            .upsert_progress(&plan.id, log_date, smoked, note, Utc::now())?;
        tracing::debug!(plan_id = %plan.id, date = %log_date, smoked, "progress recorded");
        Ok(entry)
    }

    /// Every entry of the active plan, oldest first.
    pub fn progress(&self, user_id: &str) -> Result<Vec<ProgressEntry>> {
        let plan = self.active_plan(user_id)?;
        Ok(self.db.list_progress(&plan.id)?)
    }

    /// Entries of the active plan within one calendar month.
    pub fn progress_for_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<ProgressEntry>> {
        let (start, end) = MonthWindow::new(year, month)?.bounds()?;
        let plan = self.active_plan(user_id)?;
        Ok(self.db.list_progress_between(&plan.id, start, end)?)
    }

    // === Reports ===

    /// Savings accumulated on the active plan, priced from the current baseline.
    pub fn savings(&self, user_id: &str) -> Result<SavingsReport> {
        let plan = self.active_plan(user_id)?;
        let baseline = self.current_baseline(user_id)?;
        let milestones = self.db.milestones_for_plan(&plan.id)?;
        let entries = self.db.list_progress(&plan.id)?;

        let price = baseline.price_per_cigarette(self.config.savings.pack_size);
        let report = self
            .config
            .calculator()
            .compute(&plan, &milestones, &entries, price)?;
        tracing::debug!(
            plan_id = %plan.id,
            days_logged = report.days_logged,
            avoided = report.cigarettes_avoided,
            "savings computed"
        );
        Ok(report)
    }

    /// Where the user stands on their active plan on `today`.
    ///
    /// A date before the plan start reports day 0.
    pub fn status(&self, user_id: &str, today: NaiveDate) -> Result<PlanStatus> {
        let plan = self.active_plan(user_id)?;
        let schedule = TargetSchedule::new(self.db.milestones_for_plan(&plan.id)?)?;

        let day_offset = u32::try_from(plan.days_since_start(today).max(0)).unwrap_or(u32::MAX);
        let resolved = schedule.resolve(day_offset);
        let total_days = schedule.final_day();

        Ok(PlanStatus {
            plan_id: plan.id,
            start_date: plan.start_date,
            date: today,
            day_offset,
            today_target: resolved.target_cigarettes,
            current_step: resolved.step_index,
            total_steps: schedule.milestones().len() as u32,
            total_days,
            days_remaining: total_days.saturating_sub(day_offset),
            schedule_complete: day_offset > total_days,
        })
    }
}
