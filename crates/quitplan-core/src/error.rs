//! Core error types for quitplan-core.
//!
//! A single [`CoreError`] is returned from the service layer. Storage and
//! configuration failures are wrapped in their own enums so callers can tell
//! user-facing validation failures apart from internal faults.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quitplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Baseline cigarette count is not positive; a plan cannot be generated.
    #[error("Invalid baseline: {cigarettes_per_day} cigarettes per day (must be positive)")]
    InvalidBaseline { cigarettes_per_day: i64 },

    /// Referenced plan does not exist (or the user has no active plan).
    #[error("Quit plan not found: {0}")]
    PlanNotFound(String),

    /// No smoking baseline recorded for the user.
    #[error("Smoking baseline not found for user '{0}'")]
    BaselineNotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persisted data breaks an engine invariant. Internal, not user input.
    #[error("Data invariant violated: {0}")]
    Invariant(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True for errors a caller should surface as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::PlanNotFound(_) | CoreError::BaselineNotFound(_)
        )
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Unique or foreign key constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors. Rejected synchronously and never persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Progress logged before the plan started
    #[error("Log date {log_date} precedes plan start date {start_date}")]
    LogDateBeforeStart {
        log_date: NaiveDate,
        start_date: NaiveDate,
    },

    /// Negative smoked count
    #[error("Smoked count must not be negative (got {0})")]
    NegativeSmoked(i64),

    /// Quit duration is not a positive number of months, or rounds to zero days
    #[error("Invalid quit duration: {0} months")]
    InvalidQuitDuration(f64),

    /// Price per pack is not positive
    #[error("Price per pack must be positive (got {0})")]
    InvalidPrice(Decimal),

    /// Month outside 1..=12 or year out of range
    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// Plan already completed
    #[error("Quit plan {0} is already completed")]
    PlanCompleted(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => match code.code {
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    DatabaseError::Locked
                }
                rusqlite::ErrorCode::ConstraintViolation => DatabaseError::ConstraintViolation(
                    msg.clone().unwrap_or_else(|| code.to_string()),
                ),
                _ => DatabaseError::QueryFailed(err.to_string()),
            },
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_failure_maps_to_constraint_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err();
        assert!(matches!(
            DatabaseError::from(err),
            DatabaseError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn not_found_classification() {
        assert!(CoreError::PlanNotFound("p".into()).is_not_found());
        assert!(CoreError::BaselineNotFound("u".into()).is_not_found());
        assert!(!CoreError::Invariant("x".into()).is_not_found());
    }

    #[test]
    fn validation_message_names_both_dates() {
        let err = ValidationError::LogDateBeforeStart {
            log_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-01-01"));
        assert!(msg.contains("2024-01-05"));
    }
}
