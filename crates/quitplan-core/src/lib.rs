//! # Quitplan Core Library
//!
//! Scheduling and savings engine for gradual smoking cessation. A user records
//! a smoking baseline, creates a quit plan that steps the daily cigarette
//! target down to zero over a chosen number of months, logs what they actually
//! smoked each day, and gets back how many cigarettes, how much money and how
//! much time they have saved.
//!
//! ## Architecture
//!
//! - **Plan**: stair-step schedule generation and day-offset target lookup
//! - **Progress**: the per-day ledger and calendar-month windows over it
//! - **Savings**: reconciliation of the ledger against the schedule
//! - **Storage**: SQLite persistence and TOML configuration
//! - **Service**: validation and orchestration over storage
//!
//! The CLI binary is a thin layer over [`QuitPlanService`].

pub mod baseline;
pub mod error;
pub mod plan;
pub mod progress;
pub mod savings;
pub mod service;
pub mod storage;

pub use baseline::SmokingBaseline;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use plan::{
    generate_schedule, target_for_day_offset, Milestone, PlanStatus, PlanWithMilestones,
    QuitPlan, ResolvedTarget, TargetSchedule,
};
pub use progress::{MonthWindow, ProgressEntry};
pub use savings::{SavingsCalculator, SavingsReport};
pub use service::QuitPlanService;
pub use storage::{Config, Database};
