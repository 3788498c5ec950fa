//! Storefront HTTP service with a persistent cart.
//!
//! Provides REST endpoints for listing products and managing the cart,
//! with structured logging (tracing) and Prometheus metrics.

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use cart::CartManager;
use cart_store::{CartStore, StoreKey};
use cart_views::{CartListingView, CurrencyFormat, FloatingCartView, ViewProcessor};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use catalog::ProductFeed;

/// Shared application state accessible from all handlers.
///
/// The cart manager is the single writer; handlers take the lock, run one
/// command and bring the views up to date before releasing it, so every
/// response reflects one consistent snapshot.
pub struct AppState {
    pub cart: Mutex<CartManager<dyn CartStore>>,
    pub processor: ViewProcessor,
    pub floating_cart: FloatingCartView,
    pub listing: CartListingView,
    pub feed: Arc<dyn ProductFeed>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list))
        .route("/cart", get(routes::cart::get))
        .route("/cart/summary", get(routes::cart::summary))
        .route("/cart/items", post(routes::cart::add))
        .route("/cart/items/{id}/increment", post(routes::cart::increment))
        .route("/cart/items/{id}/decrement", post(routes::cart::decrement))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Loads the cart from `store` and wires up the views.
pub async fn create_state(
    store: Arc<dyn CartStore>,
    key: StoreKey,
    feed: Arc<dyn ProductFeed>,
    format: CurrencyFormat,
) -> Result<Arc<AppState>, cart_views::ViewError> {
    let manager = CartManager::initialize(store, key).await;

    let floating_cart = FloatingCartView::new(format.clone());
    let listing = CartListingView::new(format);

    let mut processor = ViewProcessor::new();
    processor.register(Box::new(floating_cart.clone()));
    processor.register(Box::new(listing.clone()));
    processor.process(&manager.snapshot()).await?;

    Ok(Arc::new(AppState {
        cart: Mutex::new(manager),
        processor,
        floating_cart,
        listing,
        feed,
    }))
}
