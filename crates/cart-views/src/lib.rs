//! Derived cart views.
//!
//! This crate provides everything computed from the cart rather than stored:
//! - [`total_price`] and [`total_item_count`] over a [`cart::CartState`]
//! - [`CurrencyFormat`] for rendering money amounts per locale
//! - [`CartSummary`] and the [`CartView`] read models
//! - [`ViewProcessor`] for keeping views in step with a cart subscriber

pub mod error;
pub mod format;
pub mod processor;
pub mod summary;
pub mod totals;
pub mod view;
pub mod views;

pub use error::{Result, ViewError};
pub use format::{CurrencyFormat, SymbolPosition};
pub use processor::ViewProcessor;
pub use summary::CartSummary;
pub use totals::{total_item_count, total_price};
pub use view::CartView;
pub use views::{CartListing, CartListingView, CartRow, FloatingCart, FloatingCartView};
