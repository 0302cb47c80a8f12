use chrono::NaiveDate;
use clap::Subcommand;

use super::{parse_date, print_json, today, Context};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Create a quit plan from the current baseline, replacing any active plan
    Create {
        /// Months over which to taper to zero (decimals allowed)
        #[arg(long, allow_negative_numbers = true)]
        months: f64,
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
    },
    /// Show the active plan with its milestones
    Show,
    /// List all plans, newest first
    History,
    /// Mark the active plan as done
    Complete,
    /// Delete a plan and its progress
    Delete {
        /// Plan ID
        id: String,
    },
}

pub fn run(user: &str, action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let svc = ctx.service();
    match action {
        PlanAction::Create { months, start } => {
            let created = svc.create_plan(user, start.unwrap_or_else(today), months)?;
            print_json(&created)?;
        }
        PlanAction::Show => {
            let plan = svc.active_plan(user)?;
            print_json(&svc.plan_with_milestones(user, &plan.id)?)?;
        }
        PlanAction::History => {
            print_json(&svc.plan_history(user)?)?;
        }
        PlanAction::Complete => {
            print_json(&svc.complete_plan(user)?)?;
        }
        PlanAction::Delete { id } => {
            svc.delete_plan(user, &id)?;
            println!("Plan deleted: {id}");
        }
    }
    Ok(())
}
