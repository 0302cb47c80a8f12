//! Savings aggregation
//!
//! Reconciles a plan's daily progress entries against its reduction schedule:
//!
//! - each entry's target is resolved from its day offset since plan start
//! - cigarettes avoided = sum(targets) - sum(smoked), floored at zero
//! - money saved = avoided * price per cigarette
//! - time saved = avoided * minutes per cigarette

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::plan::{Milestone, QuitPlan, TargetSchedule};
use crate::progress::ProgressEntry;

/// Default minutes of life attributed to one cigarette.
pub const DEFAULT_MINUTES_PER_CIGARETTE: u32 = 5;

/// Cumulative savings for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub plan_id: String,
    pub days_logged: u32,
    pub total_smoked: u64,
    pub total_target: u64,
    pub cigarettes_avoided: u64,
    pub price_per_cigarette: Decimal,
    pub money_saved: Decimal,
    pub time_saved_minutes: u64,
    pub time_saved_hours: Decimal,
}

/// Computes [`SavingsReport`]s.
#[derive(Debug, Clone, Copy)]
pub struct SavingsCalculator {
    pub minutes_per_cigarette: u32,
}

impl Default for SavingsCalculator {
    fn default() -> Self {
        Self {
            minutes_per_cigarette: DEFAULT_MINUTES_PER_CIGARETTE,
        }
    }
}

impl SavingsCalculator {
    pub fn new(minutes_per_cigarette: u32) -> Self {
        Self {
            minutes_per_cigarette,
        }
    }

    /// Reconcile `entries` against `milestones` for `plan`.
    ///
    /// Entries may arrive in any order and with gaps; missing days contribute
    /// nothing. An empty ledger yields an all-zero report.
    ///
    /// # Errors
    /// Returns `CoreError::Invariant` if an entry belongs to another plan, is
    /// dated before the plan start, or the milestones are inconsistent.
    pub fn compute(
        &self,
        plan: &QuitPlan,
        milestones: &[Milestone],
        entries: &[ProgressEntry],
        price_per_cigarette: Decimal,
    ) -> Result<SavingsReport> {
        let schedule = TargetSchedule::new(milestones.to_vec())?;

        let mut total_smoked: u64 = 0;
        let mut total_target: u64 = 0;
        for entry in entries {
            if entry.plan_id != plan.id {
                return Err(CoreError::Invariant(format!(
                    "progress entry {} belongs to plan {}, not {}",
                    entry.id, entry.plan_id, plan.id
                )));
            }
            let offset = plan.days_since_start(entry.log_date);
            let offset = u32::try_from(offset).map_err(|_| {
                CoreError::Invariant(format!(
                    "progress entry for {} precedes plan start {}",
                    entry.log_date, plan.start_date
                ))
            })?;
            total_smoked += u64::from(entry.smoked);
            total_target += u64::from(schedule.target_for(offset));
        }

        let cigarettes_avoided = total_target.saturating_sub(total_smoked);
        let time_saved_minutes = cigarettes_avoided * u64::from(self.minutes_per_cigarette);

        Ok(SavingsReport {
            plan_id: plan.id.clone(),
            days_logged: entries.len() as u32,
            total_smoked,
            total_target,
            cigarettes_avoided,
            price_per_cigarette,
            money_saved: Decimal::from(cigarettes_avoided) * price_per_cigarette,
            time_saved_minutes,
            time_saved_hours: minutes_to_hours(time_saved_minutes),
        })
    }
}

/// Minutes as hours, 2 decimal places, half-up.
pub fn minutes_to_hours(minutes: u64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::generate_schedule;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    fn plan() -> QuitPlan {
        QuitPlan {
            id: "plan-1".into(),
            user_id: "u".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quit_months: 1.0,
            baseline_cigarettes: 10,
            is_done: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn entry(day: i64, smoked: u32) -> ProgressEntry {
        ProgressEntry {
            id: day,
            plan_id: "plan-1".into(),
            log_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day),
            smoked,
            note: None,
            updated_at: Utc::now(),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        let report = SavingsCalculator::default()
            .compute(&plan(), &milestones, &[], dec("1000"))
            .unwrap();
        assert_eq!(report.cigarettes_avoided, 0);
        assert_eq!(report.money_saved, Decimal::ZERO);
        assert_eq!(report.time_saved_minutes, 0);
        assert_eq!(report.time_saved_hours, Decimal::ZERO);
        assert_eq!(report.days_logged, 0);
    }

    #[test]
    fn matching_target_contributes_nothing() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        // day 2 target is 9
        let report = SavingsCalculator::default()
            .compute(&plan(), &milestones, &[entry(2, 9)], dec("1000"))
            .unwrap();
        assert_eq!(report.total_target, 9);
        assert_eq!(report.cigarettes_avoided, 0);
    }

    #[test]
    fn sums_across_days() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        // targets: day 0 -> 9, day 4 -> 8, day 7 -> 7
        let entries = vec![entry(0, 5), entry(4, 2), entry(7, 7)];
        let report = SavingsCalculator::default()
            .compute(&plan(), &milestones, &entries, dec("1000"))
            .unwrap();
        assert_eq!(report.total_target, 24);
        assert_eq!(report.total_smoked, 14);
        assert_eq!(report.cigarettes_avoided, 10);
        assert_eq!(report.money_saved, dec("10000"));
        assert_eq!(report.time_saved_minutes, 50);
        assert_eq!(report.time_saved_hours, dec("0.83"));
    }

    #[test]
    fn overshoot_is_clamped_to_zero() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        let entries = vec![entry(0, 40), entry(1, 40), entry(40, 3)];
        let report = SavingsCalculator::default()
            .compute(&plan(), &milestones, &entries, dec("1000"))
            .unwrap();
        assert_eq!(report.cigarettes_avoided, 0);
        assert_eq!(report.money_saved, Decimal::ZERO);
    }

    #[test]
    fn fifty_avoided_at_one_thousand_each() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        // targets over days 0..=9: 9 x4, 8 x3, 7 x3 = 81; smoked 31
        let entries: Vec<ProgressEntry> = (0..10)
            .map(|d| entry(d, if d == 9 { 4 } else { 3 }))
            .collect();
        let report = SavingsCalculator::default()
            .compute(&plan(), &milestones, &entries, dec("1000"))
            .unwrap();
        assert_eq!(report.total_target, 81);
        assert_eq!(report.total_smoked, 31);
        assert_eq!(report.cigarettes_avoided, 50);
        assert_eq!(report.money_saved, dec("50000"));
        assert_eq!(report.time_saved_minutes, 250);
        assert_eq!(report.time_saved_hours, dec("4.17"));
        assert_eq!(report.days_logged, 10);
    }

    #[test]
    fn hours_round_half_up() {
        assert_eq!(minutes_to_hours(0), Decimal::ZERO);
        assert_eq!(minutes_to_hours(90), dec("1.5"));
        assert_eq!(minutes_to_hours(250), dec("4.17"));
        // 61 min = 1.0166.. h
        assert_eq!(minutes_to_hours(61), dec("1.02"));
    }

    #[test]
    fn entry_before_start_is_an_invariant_violation() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        let result =
            SavingsCalculator::default().compute(&plan(), &milestones, &[entry(-1, 0)], dec("1"));
        assert!(matches!(result, Err(CoreError::Invariant(_))));
    }

    #[test]
    fn foreign_entry_is_an_invariant_violation() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        let mut foreign = entry(1, 0);
        foreign.plan_id = "other".into();
        let result =
            SavingsCalculator::default().compute(&plan(), &milestones, &[foreign], dec("1"));
        assert!(matches!(result, Err(CoreError::Invariant(_))));
    }

    #[test]
    fn custom_minutes_per_cigarette() {
        let milestones = generate_schedule(10, 1.0, 30).unwrap();
        let report = SavingsCalculator::new(11)
            .compute(&plan(), &milestones, &[entry(0, 0)], dec("0.50"))
            .unwrap();
        assert_eq!(report.cigarettes_avoided, 9);
        assert_eq!(report.time_saved_minutes, 99);
        assert_eq!(report.time_saved_hours, dec("1.65"));
        assert_eq!(report.money_saved, dec("4.50"));
    }
}
