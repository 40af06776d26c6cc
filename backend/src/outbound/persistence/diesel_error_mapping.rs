//! Classification of Diesel failures shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// The server closed the connection mid-operation.
    Connection(&'static str),
    /// Anything else.
    Query(&'static str),
}

/// Classify `error`, logging the raw database message at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}
