//! API error type and HTTP status mapping.
//!
//! ## Status Mapping
//! ```text
//! Unauthenticated              → 401 (one body for malformed / bad
//!                                    signature / expired - nothing leaks)
//! ValidationError              → 422 Unprocessable Entity
//! CoreError::ItemNotFound      → 404 Not Found
//! DbError                      → 500 (detail logged, never sent)
//! ```
//!
//! Authentication failures short-circuit in the extractor, before any
//! mutation logic runs; they can never leave partially applied state.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use mercato_core::{CoreError, ValidationError};

use crate::engine::EngineError;

/// Errors surfaced by the cart API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, forged, or expired bearer token. The cause is
    /// logged; the response is the same 401 for all of them.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string())
            }

            ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),

            ApiError::Engine(EngineError::Core(e @ CoreError::ItemNotFound { .. })) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Engine(EngineError::Core(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }

            ApiError::Engine(EngineError::Db(e)) => {
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
