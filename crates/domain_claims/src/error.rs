//! Claims domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the claims domain
///
/// The first failure encountered wins; errors are never aggregated.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Malformed amount in {field}: {source}")]
    MalformedAmount {
        field: &'static str,
        #[source]
        source: MoneyError,
    },

    /// Well-formed amounts whose computed net fee leaves the `i64` cent range
    #[error("Computed {field} exceeds the supported amount range")]
    AmountOverflow { field: &'static str },

    #[error("{reason}")]
    ValidationFailed { field: &'static str, reason: String },

    #[error("A claim must contain at least one line")]
    EmptyClaim,

    #[error("Storage failure: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    /// Returns true if the error was caused by the caller's input rather than storage
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ClaimError::Storage(_))
    }

    /// Returns the name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ClaimError::MalformedAmount { field, .. }
            | ClaimError::AmountOverflow { field }
            | ClaimError::ValidationFailed { field, .. } => Some(field),
            _ => None,
        }
    }
}
