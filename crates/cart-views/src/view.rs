//! Core view trait.

use async_trait::async_trait;
use cart::{CartSnapshot, Revision};

use crate::Result;

/// A display read model kept up to date from cart snapshots.
///
/// Each snapshot is complete, so a view rebuilds its model from the
/// snapshot alone and never depends on having seen earlier ones.
#[async_trait]
pub trait CartView: Send + Sync {
    /// Returns the name of this view.
    fn name(&self) -> &'static str;

    /// Rebuilds the view from a snapshot.
    async fn handle(&self, snapshot: &CartSnapshot) -> Result<()>;

    /// Returns the revision of the last handled snapshot, if any.
    async fn revision(&self) -> Option<Revision>;

    /// Resets the view to its initial state.
    async fn reset(&self) -> Result<()>;
}
