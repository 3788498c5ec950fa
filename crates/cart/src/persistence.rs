//! Background persistence of cart snapshots.
//!
//! The worker subscribes to the same channel the manager publishes on and
//! saves whatever snapshot is newest when it gets to run. Saves happen one at
//! a time, so an older snapshot can never land after a newer one, and bursts
//! of mutations collapse into a single write.

use std::sync::Arc;

use cart_store::{CartStore, StoreError, StoreKey};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{CartError, CartSnapshot, Result, Revision};

/// Outcome of the most recent save attempt.
#[derive(Debug, Clone)]
pub struct PersistStatus {
    /// Newest revision a save was attempted for.
    pub revision: Revision,
    /// Set when that attempt failed.
    pub failure: Option<Arc<StoreError>>,
    pub at: DateTime<Utc>,
}

impl PersistStatus {
    fn settled(revision: Revision) -> Self {
        Self {
            revision,
            failure: None,
            at: Utc::now(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts the status into a result for `revision`.
    pub fn into_result(self) -> Result<()> {
        match self.failure {
            Some(source) => Err(CartError::StoreWrite {
                revision: self.revision,
                source,
            }),
            None => Ok(()),
        }
    }
}

pub(crate) struct PersistenceHandle {
    status: watch::Receiver<PersistStatus>,
    task: JoinHandle<()>,
}

impl PersistenceHandle {
    pub(crate) fn status(&self) -> PersistStatus {
        self.status.borrow().clone()
    }

    /// Waits until a save for `target` (or something newer) was attempted.
    pub(crate) async fn settle(&self, target: Revision) -> Result<PersistStatus> {
        let mut status = self.status.clone();
        let settled = status
            .wait_for(|s| s.revision >= target)
            .await
            .map_err(|_| CartError::PersistenceStopped)?
            .clone();
        Ok(settled)
    }

    pub(crate) async fn join(self) -> Result<()> {
        self.task.await.map_err(|_| CartError::PersistenceStopped)
    }
}

/// Spawns the persistence worker.
///
/// `snapshots` must be a fresh subscription: its current value counts as
/// already persisted (it is what was loaded), so only later revisions are
/// written.
pub(crate) fn spawn<S>(
    store: Arc<S>,
    key: StoreKey,
    mut snapshots: watch::Receiver<CartSnapshot>,
) -> PersistenceHandle
where
    S: CartStore + ?Sized + 'static,
{
    let initial = snapshots.borrow_and_update().revision();
    let (status_tx, status_rx) = watch::channel(PersistStatus::settled(initial));

    let task = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            let status = save(store.as_ref(), &key, &snapshot).await;
            status_tx.send_replace(status);
        }
        tracing::debug!(key = %key, "cart persistence worker stopped");
    });

    PersistenceHandle {
        status: status_rx,
        task,
    }
}

#[tracing::instrument(skip(store, snapshot), fields(revision = %snapshot.revision(), entries = snapshot.entries().len()))]
async fn save<S>(store: &S, key: &StoreKey, snapshot: &CartSnapshot) -> PersistStatus
where
    S: CartStore + ?Sized,
{
    match store.save(key, snapshot.entries()).await {
        Ok(()) => {
            metrics::counter!("cart_store_saves_total").increment(1);
            tracing::debug!("cart persisted");
            PersistStatus::settled(snapshot.revision())
        }
        Err(e) => {
            metrics::counter!("cart_store_write_failures_total").increment(1);
            tracing::warn!(error = %e, "failed to persist cart; in-memory state remains authoritative");
            PersistStatus {
                revision: snapshot.revision(),
                failure: Some(Arc::new(e)),
                at: Utc::now(),
            }
        }
    }
}
