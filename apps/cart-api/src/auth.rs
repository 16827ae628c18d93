//! # Request Authentication
//!
//! Extracts the authenticated customer from the `Authorization: Bearer`
//! header, before any mutation logic runs.
//!
//! ## Explicit, Not Ambient
//! The authenticated caller is an ordinary extractor argument threaded into
//! each handler - there is no process-global security context to consult or
//! to forget to clear. A handler that needs the caller says so in its
//! signature; a handler without the argument cannot touch a cart.
//!
//! ## One Outcome
//! Missing header, malformed token, bad signature, and expired token all
//! collapse into the same 401. The real cause is logged at debug level for
//! operators; callers learn nothing they could use to probe the secret.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use mercato_auth::{extract_bearer_token, AuthenticatedCustomer};

use crate::error::ApiError;
use crate::routes::AppState;

/// The validated caller, as an extractor.
///
/// ```rust,ignore
/// async fn get_cart(
///     Authenticated(customer): Authenticated,
///     State(state): State<Arc<AppState>>,
/// ) -> ... {
///     state.engine.get_or_create(&customer.customer_id).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedCustomer);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = extract_bearer_token(header).ok_or(ApiError::Unauthenticated)?;

        match state.validator.validate(token) {
            Ok(customer) => Ok(Authenticated(customer)),
            Err(reason) => {
                debug!(%reason, "Rejected bearer token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
