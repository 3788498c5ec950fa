//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub cart: CartHealth,
}

/// Cart persistence state as seen by the health check.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartHealth {
    pub key: String,
    pub load_outcome: String,
    pub revision: u64,
    pub persisted_revision: u64,
    pub last_save_failed: bool,
}

/// GET /health: returns service health and cart persistence status.
///
/// A failed save degrades the status but the service keeps serving the
/// in-memory cart.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cart = state.cart.lock().await;
    let persist = cart.persist_status();

    let health = CartHealth {
        key: cart.key().to_string(),
        load_outcome: cart.load_outcome().to_string(),
        revision: cart.revision().as_u64(),
        persisted_revision: persist.revision.as_u64(),
        last_save_failed: !persist.is_ok(),
    };

    Json(HealthResponse {
        status: if health.last_save_failed { "degraded" } else { "ok" },
        cart: health,
    })
}
