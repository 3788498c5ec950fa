//! View processor for feeding cart snapshots to views.

use cart::{CartError, CartSnapshot, CartSubscriber};

use crate::Result;
use crate::view::CartView;

/// Delivers cart snapshots to registered views.
///
/// The processor supports:
/// - Single snapshot delivery, skipping views that already saw the revision
/// - Following a [`CartSubscriber`] until the cart manager goes away
/// - Rebuild: resets all views and replays a snapshot
pub struct ViewProcessor {
    views: Vec<Box<dyn CartView>>,
}

impl ViewProcessor {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Registers a view with this processor.
    pub fn register(&mut self, view: Box<dyn CartView>) {
        self.views.push(view);
    }

    /// Returns the number of registered views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Delivers a snapshot to every view that has not handled its revision.
    #[tracing::instrument(skip(self, snapshot), fields(revision = %snapshot.revision()))]
    pub async fn process(&self, snapshot: &CartSnapshot) -> Result<()> {
        for view in &self.views {
            let seen = view.revision().await;
            if seen.is_some_and(|revision| revision >= snapshot.revision()) {
                continue;
            }
            view.handle(snapshot).await?;
            metrics::counter!("cart_views_snapshots_processed", "view" => view.name())
                .increment(1);
        }
        Ok(())
    }

    /// Drives the views from a subscriber until the cart manager is gone.
    ///
    /// The subscriber's current snapshot is delivered first.
    #[tracing::instrument(skip_all)]
    pub async fn run(&self, mut subscriber: CartSubscriber) -> Result<()> {
        self.process(&subscriber.observe()).await?;

        loop {
            match subscriber.changed().await {
                Ok(snapshot) => self.process(&snapshot).await?,
                Err(CartError::Closed) => break,
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(views = self.views.len(), "cart closed, view processor stopped");
        Ok(())
    }

    /// Resets all views and delivers `snapshot` from scratch.
    #[tracing::instrument(skip(self, snapshot))]
    pub async fn rebuild_all(&self, snapshot: &CartSnapshot) -> Result<()> {
        for view in &self.views {
            view.reset().await?;
        }
        self.process(snapshot).await
    }
}

impl Default for ViewProcessor {
    fn default() -> Self {
        Self::new()
    }
}
