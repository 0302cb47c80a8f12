//! Stair-step schedule generation.
//!
//! A baseline of N0 cigarettes per day spread over `total_days` yields N0
//! milestones. Step `k` (1-based) drops the daily target to `N0 - k` and is in
//! force up to day `ceil(k * total_days / N0)`. The last step always lands on
//! `total_days` with a target of zero.

use crate::error::{CoreError, Result, ValidationError};

use super::Milestone;

/// Largest accepted daily baseline. One milestone is generated per cigarette.
pub const MAX_CIGARETTES_PER_DAY: u32 = 200;

/// Convert a decimal month count into whole days, `round(months * days_per_month)`.
///
/// # Errors
/// Returns `ValidationError::InvalidQuitDuration` when `quit_months` is not a
/// positive finite number or the duration rounds to zero days.
pub fn total_days(quit_months: f64, days_per_month: u32) -> Result<u32> {
    if !quit_months.is_finite() || quit_months <= 0.0 {
        return Err(ValidationError::InvalidQuitDuration(quit_months).into());
    }
    let days = (quit_months * f64::from(days_per_month)).round();
    if days < 1.0 || days > f64::from(u32::MAX) {
        return Err(ValidationError::InvalidQuitDuration(quit_months).into());
    }
    Ok(days as u32)
}

/// Bound a positive daily count to `MAX_CIGARETTES_PER_DAY`.
pub fn check_cigarettes_per_day(cigarettes_per_day: i64) -> Result<u32, ValidationError> {
    u32::try_from(cigarettes_per_day)
        .ok()
        .filter(|n| *n <= MAX_CIGARETTES_PER_DAY)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "cigarettes_per_day".into(),
            message: format!(
                "{cigarettes_per_day} exceeds the maximum of {MAX_CIGARETTES_PER_DAY}"
            ),
        })
}

/// Generate the reduction schedule for a new plan.
///
/// When `baseline` exceeds the number of days, several consecutive steps share
/// a day offset; they are kept as-is and lookups resolve to the lowest step.
///
/// # Errors
/// - `CoreError::InvalidBaseline` if `baseline <= 0`
/// - `ValidationError::InvalidValue` if `baseline > MAX_CIGARETTES_PER_DAY`
/// - `ValidationError::InvalidQuitDuration` for a non-positive duration
pub fn generate_schedule(
    baseline: i64,
    quit_months: f64,
    days_per_month: u32,
) -> Result<Vec<Milestone>> {
    if baseline <= 0 {
        return Err(CoreError::InvalidBaseline {
            cigarettes_per_day: baseline,
        });
    }
    let n0 = check_cigarettes_per_day(baseline)?;
    let total_days = u64::from(total_days(quit_months, days_per_month)?);
    let steps = u64::from(n0);

    let milestones = (1..=n0)
        .map(|k| {
            // ceil(k * total_days / n0) without floating-point drift
            let day_offset = (u64::from(k) * total_days + steps - 1) / steps;
            Milestone {
                step_index: k,
                day_offset: day_offset as u32,
                target_cigarettes: n0 - k,
            }
        })
        .collect();

    Ok(milestones)
}
