//! Diesel and pool error translation for the ledger repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::LedgerRepositoryError;

use super::pool::PoolError;

/// Map pool errors onto the connection variant.
pub fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    LedgerRepositoryError::connection(message)
}

/// Map Diesel errors onto query/connection variants.
///
/// Unique violations are not special-cased here; callers that rely on a
/// unique index inspect the error before falling back to this mapping.
pub fn map_diesel_error(error: DieselError) -> LedgerRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => LedgerRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => LedgerRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            LedgerRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            LedgerRepositoryError::query("transaction serialisation failure")
        }
        _ => LedgerRepositoryError::query("database error"),
    }
}

/// True when `error` is a unique-constraint violation.
pub fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
