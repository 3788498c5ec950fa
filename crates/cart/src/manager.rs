//! Cart manager: the single writer for the cart.

use std::sync::Arc;

use cart_store::{CartStore, StoreError, StoreKey};
use common::{Product, ProductId};
use tokio::sync::watch;

use crate::persistence::{self, PersistStatus, PersistenceHandle};
use crate::{CartCommand, CartError, CartEvent, CartSnapshot, CartState, CartSubscriber, Result, Revision};

/// What happened when the manager loaded the persisted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored cart was found and restored.
    Restored { entries: usize },
    /// Nothing was stored yet.
    Empty,
    /// The load failed and the manager started from an empty cart.
    ///
    /// The stored payload is left untouched until the first mutation
    /// overwrites it.
    Recovered { reason: String },
}

impl std::fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadOutcome::Restored { entries } => write!(f, "restored({entries})"),
            LoadOutcome::Empty => write!(f, "empty"),
            LoadOutcome::Recovered { .. } => write!(f, "recovered"),
        }
    }
}

/// Owns the cart state, publishes snapshots and keeps the store in sync.
///
/// The manager only exists once the initial load has resolved, so no
/// command can run against a state that a late load would later replace.
/// Commands run synchronously through `&mut self`: their effect is visible
/// to subscribers before the call returns, while the matching save runs in
/// the background.
pub struct CartManager<S: CartStore + ?Sized + 'static> {
    store: Arc<S>,
    key: StoreKey,
    state: CartState,
    revision: Revision,
    publisher: watch::Sender<CartSnapshot>,
    persistence: PersistenceHandle,
    load_outcome: LoadOutcome,
}

impl<S: CartStore + ?Sized + 'static> CartManager<S> {
    /// Loads the persisted cart and starts the manager.
    ///
    /// Never fails: a store that cannot be read leaves the manager with an
    /// empty cart and a [`LoadOutcome::Recovered`] outcome.
    #[tracing::instrument(skip(store))]
    pub async fn initialize(store: Arc<S>, key: StoreKey) -> Self {
        let (state, outcome) = match Self::load(store.as_ref(), &key).await {
            Ok(Some(state)) => {
                let entries = state.len();
                (state, LoadOutcome::Restored { entries })
            }
            Ok(None) => (CartState::new(), LoadOutcome::Empty),
            Err(e) => {
                metrics::counter!("cart_store_load_failures_total").increment(1);
                tracing::warn!(error = %e, "could not load persisted cart, starting with an empty cart");
                (
                    CartState::new(),
                    LoadOutcome::Recovered {
                        reason: e.to_string(),
                    },
                )
            }
        };

        Self::start(store, key, state, outcome)
    }

    /// Loads the persisted cart and starts the manager, failing if the store
    /// cannot be read.
    #[tracing::instrument(skip(store))]
    pub async fn try_initialize(store: Arc<S>, key: StoreKey) -> Result<Self> {
        let (state, outcome) = match Self::load(store.as_ref(), &key).await? {
            Some(state) => {
                let entries = state.len();
                (state, LoadOutcome::Restored { entries })
            }
            None => (CartState::new(), LoadOutcome::Empty),
        };

        Ok(Self::start(store, key, state, outcome))
    }

    async fn load(store: &S, key: &StoreKey) -> Result<Option<CartState>> {
        let Some(entries) = store.load(key).await.map_err(CartError::StoreRead)? else {
            return Ok(None);
        };

        CartState::from_entries(entries)
            .map(Some)
            .map_err(|source| {
                CartError::StoreRead(StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })
            })
    }

    fn start(store: Arc<S>, key: StoreKey, state: CartState, load_outcome: LoadOutcome) -> Self {
        tracing::info!(key = %key, entries = state.len(), outcome = %load_outcome, "cart initialized");
        metrics::gauge!("cart_items").set(state.len() as f64);

        let (publisher, _) = watch::channel(CartSnapshot::new(Revision::initial(), state.clone()));
        let persistence = persistence::spawn(store.clone(), key.clone(), publisher.subscribe());

        Self {
            store,
            key,
            state,
            revision: Revision::initial(),
            publisher,
            persistence,
            load_outcome,
        }
    }
}

// Query methods
impl<S: CartStore + ?Sized + 'static> CartManager<S> {
    /// Returns the durable store backing this cart.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Returns the current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Returns the revision of the current state.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the current state as a snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.publisher.borrow().clone()
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Creates a new subscriber positioned at the current snapshot.
    pub fn subscribe(&self) -> CartSubscriber {
        CartSubscriber::new(self.publisher.subscribe())
    }

    /// Returns the outcome of the most recent save attempt.
    pub fn persist_status(&self) -> PersistStatus {
        self.persistence.status()
    }
}

// Command methods
impl<S: CartStore + ?Sized + 'static> CartManager<S> {
    /// Executes a command, publishes the new snapshot and schedules a save.
    ///
    /// Commands that produce no events (unknown product) leave the revision
    /// alone and neither publish nor save.
    #[tracing::instrument(skip(self), fields(command = command.name(), product_id = %command.product_id()))]
    pub fn execute(&mut self, command: CartCommand) -> Vec<CartEvent> {
        let name = command.name();
        let events = self.state.execute(command);

        if events.is_empty() {
            tracing::debug!("command had no effect");
            return events;
        }

        self.revision = self.revision.next();
        self.publisher
            .send_replace(CartSnapshot::new(self.revision, self.state.clone()));

        metrics::counter!("cart_mutations_total", "command" => name).increment(1);
        metrics::gauge!("cart_items").set(self.state.len() as f64);
        tracing::debug!(revision = %self.revision, events = events.len(), "cart updated");

        events
    }

    /// Adds one unit of `product`. Returns true if the cart changed.
    pub fn add_to_cart(&mut self, product: Product) -> bool {
        !self.execute(CartCommand::AddToCart(product)).is_empty()
    }

    /// Adds one unit of an entry already in the cart. Unknown ids are a no-op.
    pub fn increment(&mut self, id: impl Into<ProductId>) -> bool {
        !self.execute(CartCommand::Increment(id.into())).is_empty()
    }

    /// Removes one unit of an entry, dropping it at zero. Unknown ids are a
    /// no-op.
    pub fn decrement(&mut self, id: impl Into<ProductId>) -> bool {
        !self.execute(CartCommand::Decrement(id.into())).is_empty()
    }

    /// Waits until the current revision has been handed to the store.
    ///
    /// Returns the write failure if that save failed. A later successful
    /// save supersedes an earlier failure.
    pub async fn flush(&self) -> Result<()> {
        self.persistence.settle(self.revision).await?.into_result()
    }

    /// Flushes pending writes and stops the persistence worker.
    pub async fn shutdown(self) -> Result<()> {
        let flushed = self.flush().await;
        let CartManager {
            publisher,
            persistence,
            ..
        } = self;
        drop(publisher);
        persistence.join().await?;
        flushed
    }
}
