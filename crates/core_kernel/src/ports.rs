//! Port error and marker trait
//!
//! Domain crates declare their storage traits on top of [`DomainPort`].
//! Adapters (PostgreSQL in `infra_db`, in-memory doubles in tests) report
//! every failure as a [`PortError`], so the domain never sees driver types.
//!
//! ```text
//!   ClaimService ──► ClaimsStore / ClaimsUnitOfWork ◄── PgClaimsStore
//!                                                  ◄── InMemoryClaimsStore
//! ```

use thiserror::Error;

/// Storage failure as seen by the domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Not found: {entity} {key}")]
    NotFound { entity: String, key: String },

    /// A schema constraint rejected the write
    #[error("Constraint violated: {message}")]
    Constraint {
        message: String,
        field: Option<String>,
    },

    /// Lost a race with a concurrent transaction; retrying may succeed
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backing store could not be reached
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Timed out: {operation}")]
    Timeout { operation: String },

    #[error("Internal storage error: {message}")]
    Internal { message: String },
}

impl PortError {
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        PortError::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        PortError::Constraint {
            message: message.into(),
            field: None,
        }
    }

    /// Constraint failure attributed to one column or field
    pub fn constraint_on(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Constraint {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        PortError::Unavailable {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        PortError::Timeout {
            operation: operation.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// True when the same unit of work might succeed if started again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Unavailable { .. } | PortError::Timeout { .. } | PortError::Conflict { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across request tasks, so implementations must be
/// thread-safe and own their state.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = PortError::not_found("Claim", "CLM-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Not found: Claim CLM-123");
    }

    #[test]
    fn test_transient_classification() {
        assert!(PortError::timeout("acquire connection").is_transient());
        assert!(PortError::conflict("could not serialize access").is_transient());
        assert!(PortError::unavailable("pool closed").is_transient());

        assert!(!PortError::constraint_on("violates check", "provider_npi").is_transient());
        assert!(!PortError::internal("boom").is_transient());
    }

    #[test]
    fn test_constraint_keeps_field() {
        match PortError::constraint_on("bad value", "net_fee_cents") {
            PortError::Constraint { field, .. } => assert_eq!(field.as_deref(), Some("net_fee_cents")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
