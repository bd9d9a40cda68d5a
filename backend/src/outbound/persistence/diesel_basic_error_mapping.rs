//! Classification of Diesel failures shared by every repository.
//!
//! Constraint violations carry domain meaning (duplicate relation rows,
//! self-subscriptions, dangling references), so they are surfaced as their
//! own variants instead of collapsing into a generic query error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Storage failure as seen by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was lost.
    Connection(&'static str),
    /// Any other query failure.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// A check constraint rejected the write.
    CheckViolation,
    /// A foreign key referenced a missing row; holds the constraint name.
    ForeignKeyViolation(String),
}

/// Classify `error`, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            DieselFailure::CheckViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation(
                info.constraint_name().unwrap_or("unknown constraint").to_owned(),
            )
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}
