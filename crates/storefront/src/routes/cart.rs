//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use cart::CartCommand;
use cart_views::{CartListing, FloatingCart};
use common::{Product, ProductId};

use crate::AppState;
use crate::error::ApiError;

/// GET /cart: every entry as a display row, plus the summary.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CartListing> {
    Json(state.listing.listing().await)
}

/// GET /cart/summary: what the floating cart shows.
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<FloatingCart> {
    Json(state.floating_cart.current().await)
}

/// POST /cart/items: adds one unit of the posted product.
#[tracing::instrument(skip(state, product), fields(product_id = %product.id))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(product): Json<Product>,
) -> Result<Json<FloatingCart>, ApiError> {
    apply(&state, CartCommand::AddToCart(product)).await?;
    Ok(Json(state.floating_cart.current().await))
}

/// POST /cart/items/{id}/increment
#[tracing::instrument(skip(state))]
pub async fn increment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FloatingCart>, ApiError> {
    let id = ProductId::new(id);
    if !apply(&state, CartCommand::Increment(id.clone())).await? {
        return Err(not_in_cart(&id));
    }
    Ok(Json(state.floating_cart.current().await))
}

/// POST /cart/items/{id}/decrement
#[tracing::instrument(skip(state))]
pub async fn decrement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FloatingCart>, ApiError> {
    let id = ProductId::new(id);
    if !apply(&state, CartCommand::Decrement(id.clone())).await? {
        return Err(not_in_cart(&id));
    }
    Ok(Json(state.floating_cart.current().await))
}

/// Runs a command and brings the views up to date under the cart lock.
///
/// Returns false when the command had no effect.
async fn apply(state: &AppState, command: CartCommand) -> Result<bool, ApiError> {
    let mut cart = state.cart.lock().await;
    let changed = !cart.execute(command).is_empty();
    if changed {
        state.processor.process(&cart.snapshot()).await?;
    }
    Ok(changed)
}

fn not_in_cart(id: &ProductId) -> ApiError {
    ApiError::NotFound(format!("Product {id} is not in the cart"))
}
