//! Shared Diesel error mapping for the record store adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Integrity constraint a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Violation {
    Unique,
    ForeignKey,
}

/// Classify unique and foreign-key violations so adapters can surface them
/// as port-specific variants.
pub(super) fn constraint_violation(error: &DieselError) -> Option<Violation> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Some(Violation::Unique)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(Violation::ForeignKey)
        }
        _ => None,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map remaining Diesel errors into query/connection constructors.
///
/// Database messages are logged at `debug` and replaced with a fixed
/// description so SQL details never reach callers.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key constraint violated")
        }
        DieselError::DeserializationError(_) => query("stored row could not be decoded"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use super::*;

    #[derive(Debug)]
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

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom")))
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, Some(Violation::Unique))]
    #[case(DatabaseErrorKind::ForeignKeyViolation, Some(Violation::ForeignKey))]
    #[case(DatabaseErrorKind::CheckViolation, None)]
    fn classifies_constraint_violations(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: Option<Violation>,
    ) {
        assert_eq!(constraint_violation(&database_error(kind)), expected);
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let mapped = map_basic_diesel_error(
            database_error(DatabaseErrorKind::ClosedConnection),
            Mapped::Query,
            Mapped::Connection,
        );
        assert_eq!(mapped, Mapped::Connection("database connection error"));
    }

    #[rstest]
    fn database_message_is_not_forwarded() {
        let mapped = map_basic_diesel_error(
            database_error(DatabaseErrorKind::CheckViolation),
            Mapped::Query,
            Mapped::Connection,
        );
        assert_eq!(mapped, Mapped::Query("database error"));
    }

    #[rstest]
    fn pool_checkout_maps_to_connection() {
        let mapped: String =
            map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }
}
