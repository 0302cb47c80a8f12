use chrono::NaiveDate;
use clap::Subcommand;
use quitplan_core::MonthWindow;

use super::{parse_date, print_json, today, Context};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Log cigarettes smoked on a day (overwrites an earlier log for that day)
    Log {
        #[arg(long, allow_negative_numbers = true)]
        smoked: i64,
        /// Day to log (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List logged days of the active plan
    List {
        /// Restrict to one calendar month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

pub fn run(user: &str, action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let svc = ctx.service();
    match action {
        ProgressAction::Log { smoked, date, note } => {
            let entry = svc.record_progress(
                user,
                date.unwrap_or_else(today),
                smoked,
                note.as_deref(),
            )?;
            print_json(&entry)?;
        }
        ProgressAction::List { month } => {
            let entries = match month {
                Some(month) => {
                    let window = MonthWindow::parse(&month)?;
                    svc.progress_for_month(user, window.year, window.month)?
                }
                None => svc.progress(user)?,
            };
            print_json(&entries)?;
        }
    }
    Ok(())
}
