//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApplicationError::Conflict(format!("Duplicate record: {db_err}"))
        },
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            ApplicationError::Storage(format!("Constraint violated: {db_err}"))
        },
        sqlx::Error::Database(db_err) => {
            ApplicationError::Storage(format!("Database error: {db_err}"))
        },
        unavailable @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            ApplicationError::Storage(format!("Database unavailable: {unavailable}"))
        },
        other => ApplicationError::Internal(format!("Database error: {other}")),
    }
}

/// Map a column that does not fit the domain type
pub fn corrupt(column: &str, detail: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Internal(format!("Invalid {column} in database: {detail}"))
}

/// Fit a version or id into SQLite's signed integer column
pub fn to_i64(value: u64) -> Result<i64, ApplicationError> {
    i64::try_from(value).map_err(|_| ApplicationError::Internal(format!("{value} out of range")))
}
