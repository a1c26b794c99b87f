//! API error handling
//!
//! Every failure leaves the API as `{ "error": kind, "message": text }`,
//! with `details` listing per-field problems for request-shape errors.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use core_kernel::PortError;
use domain_claims::ClaimError;

/// Opaque message for any storage failure while handling a claim
pub const CLAIM_STORAGE_FAILURE: &str = "Failed to process claim";

/// Opaque message for a storage failure outside claim processing
pub const STORAGE_FAILURE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed request the domain rejected (bad procedure, NPI, amount)
    #[error("{0}")]
    BadRequest(String),

    /// Request body did not have the expected shape
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind placed in the `error` field
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation { .. } => "validation_error",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            ApiError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
            details: match self {
                ApiError::Validation { details, .. } => details,
                _ => Vec::new(),
            },
        };

        match retry_after {
            Some(secs) => (status, [(header::RETRY_AFTER, secs.to_string())], Json(body)).into_response(),
            None => (status, Json(body)).into_response(),
        }
    }
}

/// Client-input failures become 400 with the domain message; storage
/// failures are logged and reported opaquely
impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Storage(port_error) => {
                error!(error = %port_error, transient = port_error.is_transient(), "Failed to process claim");
                ApiError::Internal(CLAIM_STORAGE_FAILURE.to_string())
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// Direct store reads (rankings) surface as an opaque 500
impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        error!(error = %err, transient = err.is_transient(), "Storage failure");
        ApiError::Internal(STORAGE_FAILURE.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_rejection_is_bad_request_with_reason() {
        let err: ApiError = ClaimError::ValidationFailed {
            field: "provider_npi",
            reason: "provider_npi must be a 10 digit number".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "provider_npi must be a 10 digit number");
    }

    #[test]
    fn test_storage_failure_is_opaque() {
        let err: ApiError = ClaimError::Storage(PortError::unavailable("db down")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), CLAIM_STORAGE_FAILURE);
    }

    #[test]
    fn test_port_error_hides_detail() {
        let err: ApiError = PortError::timeout("acquire connection").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "internal_error");
        assert_eq!(err.to_string(), STORAGE_FAILURE);
    }

    #[test]
    fn test_amount_overflow_is_bad_request() {
        let err: ApiError = ClaimError::AmountOverflow { field: "total_net_fee" }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "bad_request");
    }

    #[test]
    fn test_rate_limited_kind() {
        let err = ApiError::RateLimited { retry_after_secs: 12 };
        assert_eq!(err.kind(), "rate_limited");
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }
}
