//! Cart listing read model: one row per entry, as shown on the cart page.

use std::sync::Arc;

use async_trait::async_trait;
use cart::{CartSnapshot, Revision};
use common::{CartEntry, ProductId};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::format::CurrencyFormat;
use crate::summary::CartSummary;
use crate::view::CartView;

/// A display row for one cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRow {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl CartRow {
    fn from_entry(entry: &CartEntry, format: &CurrencyFormat) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            image_url: entry.image_url.clone(),
            quantity: entry.quantity,
            unit_price: format.format(entry.price),
            subtotal: format.format(entry.subtotal()),
        }
    }
}

/// The cart page: rows in cart order plus the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartListing {
    pub rows: Vec<CartRow>,
    pub summary: CartSummary,
}

/// Read model view for the cart page.
#[derive(Clone)]
pub struct CartListingView {
    format: CurrencyFormat,
    listing: Arc<RwLock<CartListing>>,
    revision: Arc<RwLock<Option<Revision>>>,
}

impl CartListingView {
    pub fn new(format: CurrencyFormat) -> Self {
        let empty = Self::empty_listing(&format);
        Self {
            format,
            listing: Arc::new(RwLock::new(empty)),
            revision: Arc::new(RwLock::new(None)),
        }
    }

    fn empty_listing(format: &CurrencyFormat) -> CartListing {
        CartListing {
            rows: Vec::new(),
            summary: CartSummary::empty(format),
        }
    }

    /// Returns the whole listing.
    pub async fn listing(&self) -> CartListing {
        self.listing.read().await.clone()
    }

    /// Gets the row for a specific product.
    pub async fn get_row(&self, id: &ProductId) -> Option<CartRow> {
        self.listing
            .read()
            .await
            .rows
            .iter()
            .find(|row| &row.id == id)
            .cloned()
    }

    /// Returns the number of rows.
    pub async fn row_count(&self) -> usize {
        self.listing.read().await.rows.len()
    }
}

impl Default for CartListingView {
    fn default() -> Self {
        Self::new(CurrencyFormat::default())
    }
}

#[async_trait]
impl CartView for CartListingView {
    fn name(&self) -> &'static str {
        "CartListingView"
    }

    async fn handle(&self, snapshot: &CartSnapshot) -> Result<()> {
        let rows = snapshot
            .entries()
            .iter()
            .map(|entry| CartRow::from_entry(entry, &self.format))
            .collect();
        let summary = CartSummary::compute(snapshot, &self.format);

        *self.listing.write().await = CartListing { rows, summary };
        *self.revision.write().await = Some(snapshot.revision());
        Ok(())
    }

    async fn revision(&self) -> Option<Revision> {
        *self.revision.read().await
    }

    async fn reset(&self) -> Result<()> {
        *self.listing.write().await = Self::empty_listing(&self.format);
        *self.revision.write().await = None;
        Ok(())
    }
}
