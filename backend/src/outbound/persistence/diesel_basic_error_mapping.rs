//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Integrity rule refused a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A unique key already holds the value.
    Duplicate,
    /// The row is still referenced by a child table.
    StillReferenced,
    /// The row points at a parent that does not exist.
    MissingReference,
    /// A `CHECK` rule rejected a value.
    Check,
}

/// Classify a Diesel error as an integrity violation, if it is one.
pub fn constraint_kind(error: &DieselError) -> Option<ConstraintKind> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Some(ConstraintKind::Duplicate)
        }
        // Postgres phrases parent-side violations as
        // "update or delete on table ... violates foreign key constraint".
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            if info.message().starts_with("update or delete") {
                Some(ConstraintKind::StillReferenced)
            } else {
                Some(ConstraintKind::MissingReference)
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            Some(ConstraintKind::Check)
        }
        _ => None,
    }
}

/// Whether a serialisable transaction lost a conflict and was aborted.
pub fn is_serialization_failure(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _)
    )
}

/// Text of an error raised by a server-side rule.
///
/// A trigger's `RAISE EXCEPTION` carries no SQLSTATE Diesel knows, so it
/// arrives with an unknown kind and its message is the only signal.
pub fn raised_message(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info) => Some(info.message()),
        _ => None,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; a closed
/// connection maps to a connection error.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Like [`map_basic_diesel_error`], but routes integrity violations through
/// `constraint` so adapters can attach a user-facing message.
pub fn map_constrained_diesel_error<E, Q, C, K>(
    error: DieselError,
    query: Q,
    connection: C,
    constraint: K,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    K: FnOnce(ConstraintKind) -> E,
{
    match constraint_kind(&error) {
        Some(kind) => {
            debug!(?kind, "integrity rule refused write");
            constraint(kind)
        }
        None => map_basic_diesel_error(error, query, connection),
    }
}

#[cfg(test)]
pub(super) mod fixtures {
    //! Hand-built database errors for adapter tests.
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    pub fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }
}
