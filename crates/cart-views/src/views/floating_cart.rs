//! Floating cart read model: the badge shown on every page.

use std::sync::Arc;

use async_trait::async_trait;
use cart::{CartSnapshot, Revision};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::format::CurrencyFormat;
use crate::summary::CartSummary;
use crate::view::CartView;

/// What the floating cart displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingCart {
    pub revision: Revision,
    pub item_count: u64,
    /// `"1 item"` or `"N items"`.
    pub label: String,
    pub formatted_total: String,
}

impl FloatingCart {
    fn from_summary(summary: CartSummary) -> Self {
        Self {
            revision: summary.revision,
            item_count: summary.total_items,
            label: item_label(summary.total_items),
            formatted_total: summary.formatted_total,
        }
    }
}

/// Label for an item count.
pub fn item_label(count: u64) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

/// Read model view for the floating cart.
#[derive(Clone)]
pub struct FloatingCartView {
    format: CurrencyFormat,
    current: Arc<RwLock<FloatingCart>>,
    revision: Arc<RwLock<Option<Revision>>>,
}

impl FloatingCartView {
    pub fn new(format: CurrencyFormat) -> Self {
        let empty = FloatingCart::from_summary(CartSummary::empty(&format));
        Self {
            format,
            current: Arc::new(RwLock::new(empty)),
            revision: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns what the floating cart currently shows.
    pub async fn current(&self) -> FloatingCart {
        self.current.read().await.clone()
    }
}

impl Default for FloatingCartView {
    fn default() -> Self {
        Self::new(CurrencyFormat::default())
    }
}

#[async_trait]
impl CartView for FloatingCartView {
    fn name(&self) -> &'static str {
        "FloatingCartView"
    }

    async fn handle(&self, snapshot: &CartSnapshot) -> Result<()> {
        let summary = CartSummary::compute(snapshot, &self.format);
        *self.current.write().await = FloatingCart::from_summary(summary);
        *self.revision.write().await = Some(snapshot.revision());
        Ok(())
    }

    async fn revision(&self) -> Option<Revision> {
        *self.revision.read().await
    }

    async fn reset(&self) -> Result<()> {
        *self.current.write().await = FloatingCart::from_summary(CartSummary::empty(&self.format));
        *self.revision.write().await = None;
        Ok(())
    }
}
