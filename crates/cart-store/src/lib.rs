//! Durable store for the shopping cart.
//!
//! A [`CartStore`] keeps the full list of cart entries under a namespaced
//! [`StoreKey`]. Backends:
//! - [`InMemoryCartStore`] for tests and throwaway runs
//! - [`FileCartStore`] for on-device style persistence
//! - [`PostgresCartStore`] for a shared database

pub mod codec;
pub mod error;
pub mod file;
pub mod key;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{CartEntry, Money, Product, ProductId};
pub use error::{Result, StoreError};
pub use file::FileCartStore;
pub use key::{CART_BUCKET, DEFAULT_NAMESPACE, StoreKey};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use store::{CartStore, CartStoreExt};
