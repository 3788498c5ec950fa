use std::sync::Arc;

use async_trait::async_trait;
use common::CartEntry;

use crate::{Result, StoreKey};

/// Core trait for cart store implementations.
///
/// A cart store is a key-value persistence boundary: each key holds the full
/// list of cart entries, rewritten wholesale on every save. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the entries stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. A read that fails,
    /// or a payload that is malformed, is reported as an error and never
    /// folded into an empty result.
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>>;

    /// Replaces whatever is stored under `key` with `entries`.
    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()>;

    /// Removes the bucket stored under `key`. Removing a missing key is not
    /// an error.
    async fn remove(&self, key: &StoreKey) -> Result<()>;
}

/// Extension trait providing convenience methods for cart stores.
#[async_trait]
pub trait CartStoreExt: CartStore {
    /// Checks whether anything is stored under `key`.
    async fn contains(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.load(key).await?.is_some())
    }
}

// Blanket implementation for all CartStore implementations
impl<T: CartStore + ?Sized> CartStoreExt for T {}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()> {
        (**self).save(key, entries).await
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        (**self).remove(key).await
    }
}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Box<T> {
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()> {
        (**self).save(key, entries).await
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        (**self).remove(key).await
    }
}
