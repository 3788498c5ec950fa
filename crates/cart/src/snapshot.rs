//! Published cart snapshots and subscriptions.

use std::sync::Arc;

use common::CartEntry;
use tokio::sync::watch;

use crate::{CartError, CartState, Result, Revision};

/// An immutable, complete view of the cart after a mutation.
///
/// Snapshots are cheap to clone and share; subscribers never see a
/// half-applied mutation.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    revision: Revision,
    state: Arc<CartState>,
}

impl CartSnapshot {
    pub fn new(revision: Revision, state: CartState) -> Self {
        Self {
            revision,
            state: Arc::new(state),
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Shorthand for `state().entries()`.
    pub fn entries(&self) -> &[CartEntry] {
        self.state.entries()
    }
}

impl PartialEq for CartSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision && self.state == other.state
    }
}

/// Read-only handle onto the manager's published snapshots.
///
/// Any number of subscribers may exist. Each sees the latest snapshot; if
/// several mutations land between two reads, only the newest is observed.
#[derive(Debug, Clone)]
pub struct CartSubscriber {
    rx: watch::Receiver<CartSnapshot>,
}

impl CartSubscriber {
    pub(crate) fn new(rx: watch::Receiver<CartSnapshot>) -> Self {
        Self { rx }
    }

    /// Returns the latest published snapshot without waiting.
    pub fn current(&self) -> CartSnapshot {
        self.rx.borrow().clone()
    }

    /// Returns true if a snapshot was published since this subscriber last
    /// observed one.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next published snapshot and returns it.
    ///
    /// Fails with [`CartError::Closed`] once the manager is gone and every
    /// published snapshot has been observed.
    pub async fn changed(&mut self) -> Result<CartSnapshot> {
        self.rx.changed().await.map_err(|_| CartError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Marks the current snapshot as observed and returns it.
    pub fn observe(&mut self) -> CartSnapshot {
        self.rx.borrow_and_update().clone()
    }
}
