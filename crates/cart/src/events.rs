//! Cart events.

use common::{CartEntry, ProductId};
use serde::{Deserialize, Serialize};

/// Facts produced by executing a [`CartCommand`](crate::CartCommand).
///
/// Events carry the resulting quantity rather than a delta, so applying
/// them is idempotent per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A product entered the cart with quantity 1.
    ItemAdded(CartEntry),

    /// An entry's quantity went up.
    QuantityIncreased { id: ProductId, quantity: u32 },

    /// An entry's quantity went down but stayed at least 1.
    QuantityDecreased { id: ProductId, quantity: u32 },

    /// An entry left the cart.
    ItemRemoved { id: ProductId },
}

impl CartEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::QuantityIncreased { .. } => "QuantityIncreased",
            CartEvent::QuantityDecreased { .. } => "QuantityDecreased",
            CartEvent::ItemRemoved { .. } => "ItemRemoved",
        }
    }

    /// Returns the product the event concerns.
    pub fn product_id(&self) -> &ProductId {
        match self {
            CartEvent::ItemAdded(entry) => &entry.id,
            CartEvent::QuantityIncreased { id, .. }
            | CartEvent::QuantityDecreased { id, .. }
            | CartEvent::ItemRemoved { id } => id,
        }
    }
}
