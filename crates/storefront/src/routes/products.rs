//! Product listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Product;

use crate::AppState;
use crate::error::ApiError;

/// GET /products: lists the products from the feed.
///
/// A feed failure is reported once, as a 502 carrying the alert message;
/// the request is not retried.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    match state.feed.fetch_products().await {
        Ok(products) => Ok(Json(products)),
        Err(err) => {
            metrics::counter!("product_feed_failures_total").increment(1);
            tracing::warn!(error = %err, "failed to fetch products");
            Err(err.into())
        }
    }
}
