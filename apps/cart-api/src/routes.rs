//! HTTP routes for the cart API.
//!
//! Thin layer: authenticate, validate input, delegate to [`CartEngine`].
//! The customer identifier ALWAYS comes from the validated token's claim -
//! there is no client-supplied customer field on any of these routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use mercato_auth::TokenValidator;
use mercato_core::validation::{validate_product_id, validate_quantity};
use mercato_core::Cart;
use mercato_db::CartRepository;

use crate::auth::Authenticated;
use crate::engine::CartEngine;
use crate::error::ApiError;
use crate::events::RedisEventPublisher;

/// Shared application state.
pub struct AppState {
    pub engine: CartEngine<CartRepository, RedisEventPublisher>,
    pub validator: TokenValidator,
}

/// Builds the cart API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:item_id", put(update_item).delete(remove_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest {
    product_id: i64,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemRequest {
    quantity: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /cart
async fn get_cart(
    Authenticated(customer): Authenticated,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Cart>, ApiError> {
    let cart = state.engine.get_or_create(&customer.customer_id).await?;
    Ok(Json(cart))
}

/// POST /cart/items
async fn add_item(
    Authenticated(customer): Authenticated,
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    validate_product_id(req.product_id)?;
    validate_quantity(req.quantity)?;

    let cart = state
        .engine
        .add_item(&customer.customer_id, req.product_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// PUT /cart/items/{item_id}
async fn update_item(
    Authenticated(customer): Authenticated,
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    validate_quantity(req.quantity)?;

    let cart = state
        .engine
        .update_item(&customer.customer_id, &item_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// DELETE /cart/items/{item_id}
async fn remove_item(
    Authenticated(customer): Authenticated,
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    let cart = state
        .engine
        .remove_item(&customer.customer_id, &item_id)
        .await?;
    Ok(Json(cart))
}

/// DELETE /cart
async fn clear_cart(
    Authenticated(customer): Authenticated,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Cart>, ApiError> {
    let cart = state.engine.clear(&customer.customer_id).await?;
    Ok(Json(cart))
}
