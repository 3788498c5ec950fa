//! Storefront server entry point.

use std::sync::Arc;

use cart_store::{CartStore, FileCartStore, InMemoryCartStore, PostgresCartStore};
use cart_views::CurrencyFormat;
use storefront::catalog::{HttpProductFeed, ProductFeed, StaticProductFeed};
use storefront::config::{Config, ConfigError, StoreBackend};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Opens the configured durable store.
async fn open_store(config: &Config) -> Result<Arc<dyn CartStore>, BoxError> {
    let store: Arc<dyn CartStore> = match config.store {
        StoreBackend::Memory => Arc::new(InMemoryCartStore::new()),
        StoreBackend::File => {
            tracing::info!(dir = %config.store_dir.display(), "using file cart store");
            Arc::new(FileCartStore::new(&config.store_dir))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let store = PostgresCartStore::connect(url).await?;
            store.run_migrations().await?;
            tracing::info!("using postgres cart store");
            Arc::new(store)
        }
    };
    Ok(store)
}

fn product_feed(config: &Config) -> Result<Arc<dyn ProductFeed>, BoxError> {
    match &config.product_feed_url {
        Some(url) => {
            tracing::info!(%url, "using HTTP product feed");
            Ok(Arc::new(HttpProductFeed::new(url.as_str())?))
        }
        None => {
            tracing::info!("PRODUCT_FEED_URL not set, using built-in catalog");
            Ok(Arc::new(StaticProductFeed::demo()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // 1. Load configuration
    let config = Config::from_env()?;

    // 2. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 4. Open the store, load the cart and wire up the views
    let store = open_store(&config).await?;
    let feed = product_feed(&config)?;
    let format = CurrencyFormat::for_locale(&config.currency_locale).unwrap_or_else(|| {
        tracing::warn!(locale = %config.currency_locale, "unknown currency locale, using en-US");
        CurrencyFormat::en_us()
    });
    let state = storefront::create_state(store, config.cart_key()?, feed, format).await?;

    // 5. Build the application
    let app = storefront::create_app(state.clone(), metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting storefront server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. Make sure the last cart change reached the store
    if let Err(e) = state.cart.lock().await.flush().await {
        tracing::warn!(error = %e, "cart not fully persisted at shutdown");
    }

    tracing::info!("server shut down gracefully");
    Ok(())
}
