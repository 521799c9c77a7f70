//! Mapping from database errors to storage errors.

use sea_orm::{DbErr, SqlErr};
use tracing::error;

use leavedesk_core::ports::StoreError;

/// Classifies a `DbErr` for the domain layer.
///
/// Unique-key violations become [`StoreError::Conflict`], dangling foreign
/// keys [`StoreError::Missing`]. Anything unrecognised is treated as an
/// outage.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => return StoreError::Conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => return StoreError::Missing(detail),
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(detail) => StoreError::Missing(detail),
        DbErr::RecordNotUpdated => StoreError::Missing("no row updated".to_string()),
        DbErr::Type(detail) | DbErr::Json(detail) => StoreError::Corrupt(detail),
        DbErr::TryIntoErr { from, into, source } => {
            StoreError::Corrupt(format!("cannot convert {from} into {into}: {source}"))
        }
        other => {
            error!(error = %other, "Database operation failed");
            StoreError::Unavailable(other.to_string())
        }
    }
}

/// Reads a non-negative day count stored as `INTEGER`.
pub(crate) fn days_from_column(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("{column} is negative: {value}")))
}

/// Converts a day count into its `INTEGER` column value.
pub(crate) fn days_to_column(value: u32, column: &str) -> Result<i32, StoreError> {
    i32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}
