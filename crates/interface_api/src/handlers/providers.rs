//! Provider handlers

use axum::{extract::State, Json};

use crate::dto::providers::TopProviderResponse;
use crate::{error::ApiError, AppState};

/// Number of providers returned by the ranking endpoint
pub const TOP_PROVIDERS_LIMIT: i64 = 10;

/// Top providers by total net fee, highest first
///
/// Reads the pre-aggregated totals; no line history is scanned.
pub async fn top_providers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TopProviderResponse>>, ApiError> {
    let providers = state.store.top_providers(TOP_PROVIDERS_LIMIT).await?;
    Ok(Json(providers.into_iter().map(Into::into).collect()))
}
