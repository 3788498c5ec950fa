//! Product feed: where the storefront gets the products it lists.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{Money, Product};
use thiserror::Error;

/// Errors fetching the product feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("product feed returned status {0}")]
    Status(u16),

    #[error("product feed unavailable: {0}")]
    Unavailable(String),
}

/// A source of product records.
#[async_trait]
pub trait ProductFeed: Send + Sync {
    /// Fetches the full product list.
    async fn fetch_products(&self) -> Result<Vec<Product>, FeedError>;
}

/// Product feed served over HTTP at `{base_url}/products`.
pub struct HttpProductFeed {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductFeed {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

#[async_trait]
impl ProductFeed for HttpProductFeed {
    #[tracing::instrument(skip(self), fields(url = %self.products_url()))]
    async fn fetch_products(&self) -> Result<Vec<Product>, FeedError> {
        let response = self.client.get(self.products_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let products: Vec<Product> = response.json().await?;
        tracing::debug!(count = products.len(), "fetched products");
        Ok(products)
    }
}

/// Fixed in-process product list.
///
/// Backs the storefront when no feed URL is configured, and lets tests
/// simulate an unreachable feed.
pub struct StaticProductFeed {
    products: Vec<Product>,
    failing: AtomicBool,
}

impl StaticProductFeed {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            failing: AtomicBool::new(false),
        }
    }

    /// The built-in demo catalog.
    pub fn demo() -> Self {
        let product = |id: &str, title: &str, cents: i64| {
            Product::new(
                id,
                title,
                format!("https://images.example.com/products/{id}.png"),
                Money::from_cents(cents),
            )
        };

        Self::new(vec![
            product("1", "Rivatti Chair", 120_000),
            product("2", "Wooden Armchair", 190_000),
            product("3", "Corner Sofa", 350_000),
            product("4", "Coffee Table", 45_990),
            product("5", "Floor Lamp", 29_900),
            product("6", "Shag Rug", 18_950),
        ])
    }

    /// Makes every subsequent fetch fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductFeed for StaticProductFeed {
    async fn fetch_products(&self) -> Result<Vec<Product>, FeedError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::Unavailable(
                "static feed configured to fail".to_string(),
            ));
        }
        Ok(self.products.clone())
    }
}
