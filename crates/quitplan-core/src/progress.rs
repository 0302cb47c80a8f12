//! Daily progress entries and calendar-month windows over them.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Cigarettes actually smoked on one calendar day of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: i64,
    pub plan_id: String,
    pub log_date: NaiveDate,
    pub smoked: u32,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A calendar month, used for monthly progress views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    /// # Errors
    /// Returns `ValidationError::InvalidMonth` if the month is not a real calendar month.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        let window = Self { year, month };
        window.bounds()?;
        Ok(window)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidValue {
            field: "month".into(),
            message: format!("expected YYYY-MM, got '{s}'"),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    /// Half-open range `[first day of month, first day of next month)`.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let invalid = ValidationError::InvalidMonth {
            year: self.year,
            month: self.month,
        };
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(invalid.clone())?;
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or(invalid)?;
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_cover_whole_month() {
        let (start, end) = MonthWindow::new(2024, 2).unwrap().bounds().unwrap();
        assert_eq!(start, date(2024, 2, 1));
        assert_eq!(end, date(2024, 3, 1));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = MonthWindow::new(2023, 12).unwrap().bounds().unwrap();
        assert_eq!(start, date(2023, 12, 1));
        assert_eq!(end, date(2024, 1, 1));
    }

    #[test]
    fn rejects_month_thirteen() {
        assert_eq!(
            MonthWindow::new(2024, 13),
            Err(ValidationError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
        assert!(MonthWindow::new(2024, 0).is_err());
    }

    #[test]
    fn parses_year_month() {
        assert_eq!(
            MonthWindow::parse("2024-03").unwrap(),
            MonthWindow {
                year: 2024,
                month: 3
            }
        );
        assert!(MonthWindow::parse("2024/03").is_err());
        assert!(MonthWindow::parse("march").is_err());
    }

    #[test]
    fn containing_date() {
        assert_eq!(
            MonthWindow::containing(date(2024, 7, 19)),
            MonthWindow {
                year: 2024,
                month: 7
            }
        );
    }
}
