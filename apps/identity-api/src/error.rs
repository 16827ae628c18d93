//! API error type and HTTP status mapping.
//!
//! ## Status Mapping
//! ```text
//! ValidationError            → 422 Unprocessable Entity
//! CoreError::DuplicateIdentity → 409 Conflict
//! AuthError::AuthenticationFailed → 401 (uniform body, no credential detail)
//! DbError / AuthError::Internal   → 500 (detail logged, never sent)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use mercato_auth::AuthError;
use mercato_core::{CoreError, ValidationError};
use mercato_db::DbError;

/// Errors surfaced by the identity API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),

            ApiError::Core(CoreError::Validation(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Core(e @ CoreError::DuplicateIdentity { .. }) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            ApiError::Core(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),

            // One body for every credential failure: no hint whether the
            // username or the password was wrong
            ApiError::Auth(AuthError::AuthenticationFailed) => (
                StatusCode::UNAUTHORIZED,
                AuthError::AuthenticationFailed.to_string(),
            ),
            ApiError::Auth(AuthError::Internal(detail)) => {
                error!(%detail, "Internal auth error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),

            ApiError::Db(e) => {
                error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
