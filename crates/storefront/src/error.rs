//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;
use cart_views::ViewError;

use crate::catalog::FeedError;

/// Message shown to the user when the product list cannot be loaded.
pub const PRODUCTS_ALERT: &str = "Could not load the products. Please try again later.";

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Product feed could not be fetched.
    Feed(FeedError),
    /// Cart manager error.
    Cart(CartError),
    /// View update error.
    View(ViewError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Feed(err) => {
                let body = serde_json::json!({
                    "error": err.to_string(),
                    "alert": PRODUCTS_ALERT,
                });
                return (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response();
            }
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::View(err) => {
                tracing::error!(error = %err, "failed to update cart views");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match &err {
        CartError::StoreRead(_) | CartError::StoreWrite { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        CartError::PersistenceStopped | CartError::Closed => {
            tracing::error!(error = %err, "cart manager unavailable");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        ApiError::Feed(err)
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        ApiError::View(err)
    }
}
