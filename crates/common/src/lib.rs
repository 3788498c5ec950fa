//! Shared value types for the storefront cart.

mod money;
mod types;

pub use money::{Money, MoneyError};
pub use types::{CartEntry, EntryValidationError, Product, ProductId, validate_entries};
