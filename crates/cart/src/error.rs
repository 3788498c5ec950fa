//! Cart error types.

use std::sync::Arc;

use cart_store::StoreError;
use thiserror::Error;

use crate::Revision;

/// Errors that can occur around the cart manager.
///
/// Cart commands themselves never fail; these errors come from the durable
/// store and from talking to a manager that has gone away.
#[derive(Debug, Error)]
pub enum CartError {
    /// Loading the persisted cart failed.
    #[error("Failed to load persisted cart: {0}")]
    StoreRead(#[source] StoreError),

    /// Saving a cart revision failed.
    #[error("Failed to persist cart revision {revision}: {source}")]
    StoreWrite {
        revision: Revision,
        #[source]
        source: Arc<StoreError>,
    },

    /// The background persistence task is no longer running.
    #[error("Cart persistence worker stopped")]
    PersistenceStopped,

    /// The cart manager was dropped.
    #[error("Cart manager closed")]
    Closed,
}

/// Result type for cart manager operations.
pub type Result<T> = std::result::Result<T, CartError>;
