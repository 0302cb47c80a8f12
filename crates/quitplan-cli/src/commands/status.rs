use chrono::NaiveDate;

use super::{print_json, today, Context};

pub fn run(user: &str, date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let status = ctx.service().status(user, date.unwrap_or_else(today))?;
    print_json(&status)
}
