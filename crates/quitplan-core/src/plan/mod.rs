//! Quit plans and their stair-step reduction schedule.

pub mod lookup;
pub mod schedule;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use lookup::{target_for_day_offset, ResolvedTarget, TargetSchedule};
pub use schedule::{
    check_cigarettes_per_day, generate_schedule, total_days, MAX_CIGARETTES_PER_DAY,
};

/// One quit attempt. Only `is_done` (and its timestamp) ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuitPlan {
    pub id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    /// Decimal months the reduction spans.
    pub quit_months: f64,
    /// Cigarettes per day the schedule was generated from (N0).
    pub baseline_cigarettes: u32,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuitPlan {
    /// Whole days between the plan start and `date`. Negative before the start.
    pub fn days_since_start(&self, date: NaiveDate) -> i64 {
        (date - self.start_date).num_days()
    }
}

/// One step of the schedule: `target_cigarettes` is in force up to and
/// including `day_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// 1..=N0, dense and ascending.
    pub step_index: u32,
    /// Days since plan start; non-decreasing with `step_index`.
    pub day_offset: u32,
    /// N0 - step_index.
    pub target_cigarettes: u32,
}

/// A plan together with its persisted milestones (ascending step index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWithMilestones {
    pub plan: QuitPlan,
    pub milestones: Vec<Milestone>,
}

/// Where a user stands on their active plan on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStatus {
    pub plan_id: String,
    pub start_date: NaiveDate,
    pub date: NaiveDate,
    pub day_offset: u32,
    pub today_target: u32,
    /// Step index the lookup resolved for `day_offset` (0 when no milestones).
    pub current_step: u32,
    pub total_steps: u32,
    pub total_days: u32,
    pub days_remaining: u32,
    /// True once `day_offset` is past the final milestone.
    pub schedule_complete: bool,
}
