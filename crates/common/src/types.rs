use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Money;

/// Unique product identifier, as issued by the product feed.
///
/// Wraps a string to keep product ids from being mixed up with titles
/// or image urls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A product record as published by the product feed.
///
/// `image_url` is written as `imageUrl`; the feed's own `image_url`
/// spelling is accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "image_url")]
    pub image_url: String,
    /// Unit price.
    pub price: Money,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// One product line in the cart.
///
/// The title, image and price are a snapshot taken when the product was
/// first added; later additions of the same product only bump `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "image_url")]
    pub image_url: String,
    /// Unit price.
    pub price: Money,
    /// Always at least 1 while the entry is in a cart.
    pub quantity: u32,
}

impl CartEntry {
    /// Creates an entry for a product with quantity 1.
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// Returns the line subtotal (price * quantity).
    pub fn subtotal(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// Error returned when a sequence of entries violates the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryValidationError {
    #[error("duplicate cart entry for product {0}")]
    DuplicateId(ProductId),

    #[error("cart entry for product {0} has quantity 0")]
    ZeroQuantity(ProductId),

    #[error("cart entry for product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Validates that entries are unique by id and have positive quantities.
pub fn validate_entries(entries: &[CartEntry]) -> Result<(), EntryValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(&entry.id) {
            return Err(EntryValidationError::DuplicateId(entry.id.clone()));
        }
        if entry.quantity == 0 {
            return Err(EntryValidationError::ZeroQuantity(entry.id.clone()));
        }
        if entry.price.is_negative() {
            return Err(EntryValidationError::NegativePrice(entry.id.clone()));
        }
    }
    Ok(())
}
