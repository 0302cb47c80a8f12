//! Day offset to target cigarette count.
//!
//! A milestone's target is in force up to and including its `day_offset`, so
//! the target for a day is the one of the first milestone (by step index)
//! whose offset is at or after that day. Past the final milestone the last
//! target (zero) stays in force.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

use super::Milestone;

/// Result of resolving a day offset against a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    /// Step in force; 0 for an empty schedule.
    pub step_index: u32,
    pub target_cigarettes: u32,
}

/// Precomputed step function over a plan's milestones.
///
/// Built once per aggregation; every lookup is a binary search over the
/// non-decreasing day offsets.
#[derive(Debug, Clone, Default)]
pub struct TargetSchedule {
    milestones: Vec<Milestone>,
}

impl TargetSchedule {
    /// Sort milestones by step index and check that day offsets never decrease.
    ///
    /// # Errors
    /// Returns `CoreError::Invariant` if offsets decrease or step indexes repeat.
    pub fn new(mut milestones: Vec<Milestone>) -> Result<Self> {
        milestones.sort_by_key(|m| m.step_index);
        for pair in milestones.windows(2) {
            if pair[0].step_index == pair[1].step_index {
                return Err(CoreError::Invariant(format!(
                    "duplicate milestone step {}",
                    pair[0].step_index
                )));
            }
            if pair[0].day_offset > pair[1].day_offset {
                return Err(CoreError::Invariant(format!(
                    "milestone step {} (day {}) precedes step {} (day {})",
                    pair[1].step_index, pair[1].day_offset, pair[0].step_index, pair[0].day_offset
                )));
            }
        }
        Ok(Self { milestones })
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Day offset of the final milestone (0 when empty).
    pub fn final_day(&self) -> u32 {
        self.milestones.last().map(|m| m.day_offset).unwrap_or(0)
    }

    /// Resolve the step in force on `day_offset`.
    pub fn resolve(&self, day_offset: u32) -> ResolvedTarget {
        let idx = self
            .milestones
            .partition_point(|m| m.day_offset < day_offset);
        match self.milestones.get(idx).or_else(|| self.milestones.last()) {
            Some(m) => ResolvedTarget {
                step_index: m.step_index,
                target_cigarettes: m.target_cigarettes,
            },
            None => ResolvedTarget {
                step_index: 0,
                target_cigarettes: 0,
            },
        }
    }

    pub fn target_for(&self, day_offset: u32) -> u32 {
        self.resolve(day_offset).target_cigarettes
    }
}

/// Target for `day_offset` by scanning `milestones` in step order.
///
/// Returns 0 for an empty list. `milestones` must be sorted by step index.
pub fn target_for_day_offset(day_offset: u32, milestones: &[Milestone]) -> u32 {
    milestones
        .iter()
        .find(|m| m.day_offset >= day_offset)
        .or_else(|| milestones.last())
        .map(|m| m.target_cigarettes)
        .unwrap_or(0)
}
