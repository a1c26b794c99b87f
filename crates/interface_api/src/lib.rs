//! HTTP surface of the claims analytics service
//!
//! | Route               | Handler                          |
//! |---------------------|----------------------------------|
//! | `POST /claims`      | [`handlers::claims::create_claim`] |
//! | `GET /providers/top`| [`handlers::providers::top_providers`] (rate limited) |
//! | `GET /health`       | [`handlers::health::health_check`] |
//! | `GET /health/ready` | [`handlers::health::readiness_check`] |
//!
//! Every response carries an `x-request-id` header; failures use the
//! body shape in [`error::ErrorResponse`].

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{ClaimService, ClaimsStore};

use crate::config::ApiConfig;
use crate::handlers::{claims, health, providers};
use crate::middleware::{rate_limit_middleware, request_log_middleware, RateLimiter};

/// Shared by every handler; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClaimsStore>,
    pub claims: Arc<ClaimService>,
    pub config: ApiConfig,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClaimsStore>, config: ApiConfig) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute)),
            claims: Arc::new(ClaimService::new()),
            store,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let observability = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .merge(probe_routes())
        .merge(claim_routes())
        .merge(provider_routes(&state))
        .layer(from_fn(request_log_middleware))
        .layer(observability)
        .with_state(state)
}

fn probe_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn claim_routes() -> Router<AppState> {
    Router::new()
        .route("/claims", post(claims::create_claim))
        .route("/claims/", post(claims::create_claim))
}

/// The limiter wraps only this route group
fn provider_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/providers/top", get(providers::top_providers))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware))
}
