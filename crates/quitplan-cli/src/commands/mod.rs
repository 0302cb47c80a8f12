pub mod baseline;
pub mod completions;
pub mod config;
pub mod plan;
pub mod progress;
pub mod savings;
pub mod status;

use std::error::Error;
use std::str::FromStr;

use chrono::NaiveDate;
use quitplan_core::{Config, Database, QuitPlanService};
use rust_decimal::Decimal;
use serde::Serialize;

/// Database and config opened once per invocation.
pub struct Context {
    db: Database,
    config: Config,
}

impl Context {
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self { db, config })
    }

    pub fn service(&self) -> QuitPlanService<'_> {
        QuitPlanService::new(&self.db, &self.config)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn parse_decimal(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s.trim()).map_err(|e| format!("invalid amount '{s}': {e}"))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
