//! Claims handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::warn;
use validator::Validate;

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Processes a claim in a fresh unit of work
///
/// Shape errors (invalid JSON, missing fields, wrong types, unparseable
/// dates, empty `lines`) are rejected with 422 before the domain is reached. Domain
/// validation failures are 400; storage failures are 500.
pub async fn create_claim(
    State(state): State<AppState>,
    payload: Result<Json<CreateClaimRequest>, JsonRejection>,
) -> Result<Json<CreateClaimResponse>, ApiError> {
    let Json(request) = payload.map_err(rejection_to_error)?;

    request.validate().map_err(|e| {
        warn!(error = %e, "Claim request failed validation");
        ApiError::from(e)
    })?;

    let claim = state
        .claims
        .submit(state.store.as_ref(), request.into())
        .await?;

    Ok(Json(CreateClaimResponse::processed(*claim.id.as_uuid())))
}

/// Undecodable bodies, wrong content types and shape mismatches are all
/// request-shape failures, kept apart from domain rejections (400)
fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    let cause = match &rejection {
        JsonRejection::JsonSyntaxError(_) => "syntax",
        JsonRejection::JsonDataError(_) => "shape",
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "body",
    };
    warn!(cause, error = %rejection.body_text(), "Malformed claim request");
    ApiError::validation(rejection.body_text())
}
