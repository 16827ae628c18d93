//! HTTP routes for the identity API.
//!
//! Thin layer: deserialize, delegate to [`IdentityService`], map the result.
//! All policy (validation, duplicate checks, credential handling) lives in
//! the service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use mercato_core::Account;
use mercato_db::AccountRepository;

use crate::error::ApiError;
use crate::service::IdentityService;

/// Shared application state.
pub struct AppState {
    pub service: IdentityService<AccountRepository>,
}

/// Builds the identity API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    customer_id: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state
        .service
        .register(&req.customer_id, &req.username, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.service.login(&req.username, &req.password).await?;

    Ok(Json(LoginResponse { token }))
}
