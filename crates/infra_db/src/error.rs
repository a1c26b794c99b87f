//! Database error types
//!
//! SQLx errors are classified once, here, by PostgreSQL SQLSTATE so the
//! adapters can hand the domain a meaningful [`PortError`].

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// No connection became free within the acquire timeout
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// Unique, foreign key or check constraint (SQLSTATE class 23)
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Concurrent transaction could not be serialized (40001) or deadlocked (40P01)
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    /// Statement cancelled by `statement_timeout` (57014)
    #[error("Statement timed out: {0}")]
    StatementTimeout(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl DatabaseError {
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "CLM-123");
    /// assert_eq!(error.to_string(), "Claim 'CLM-123' not found");
    /// ```
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound {
                entity: "Row",
                key: String::new(),
            },
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some(code) if code.starts_with("23") => DatabaseError::ConstraintViolation {
                        constraint: db_err.constraint().map(str::to_string),
                        message,
                    },
                    Some("40001") | Some("40P01") => DatabaseError::SerializationFailure(message),
                    Some("57014") => DatabaseError::StatementTimeout(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Converts a database error to a port error at the adapter boundary
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, key } => PortError::not_found(entity, key),
            DatabaseError::ConstraintViolation {
                constraint: Some(name),
                message,
            } => PortError::constraint_on(message, name),
            DatabaseError::ConstraintViolation { message, .. } => PortError::constraint(message),
            DatabaseError::SerializationFailure(message) => PortError::conflict(message),
            DatabaseError::ConnectionFailed(message) => PortError::unavailable(message),
            DatabaseError::PoolExhausted => PortError::timeout("acquire connection"),
            DatabaseError::StatementTimeout(message) => PortError::timeout(message),
            other => PortError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port: PortError = DatabaseError::not_found("Claim", "abc").into();
        assert!(port.is_not_found());
    }

    #[test]
    fn test_serialization_failure_is_transient() {
        let port: PortError = DatabaseError::SerializationFailure("retry".to_string()).into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_pool_errors() {
        assert!(DatabaseError::from(sqlx::Error::RowNotFound).is_not_found());
        let exhausted = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(exhausted.is_connection_error());
        assert_eq!(
            PortError::from(exhausted),
            PortError::timeout("acquire connection")
        );
    }

    #[test]
    fn test_named_constraint_becomes_field() {
        let port: PortError = DatabaseError::ConstraintViolation {
            constraint: Some("claim_lines_provider_npi_check".to_string()),
            message: "new row violates check constraint".to_string(),
        }
        .into();
        assert_eq!(
            port,
            PortError::constraint_on(
                "new row violates check constraint",
                "claim_lines_provider_npi_check"
            )
        );
    }
}
