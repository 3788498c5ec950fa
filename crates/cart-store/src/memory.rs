use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::CartEntry;
use tokio::sync::RwLock;

use crate::{Result, StoreError, StoreKey, codec, store::CartStore};

#[derive(Debug, Default)]
struct Faults {
    fail_on_load: AtomicBool,
    fail_on_save: AtomicBool,
    latency_ms: AtomicU64,
}

/// In-memory cart store for tests and local runs.
///
/// Payloads are kept as the same JSON strings the durable backends write, so
/// tests can plant malformed data with [`InMemoryCartStore::insert_raw`].
/// Failures and latency can be injected to exercise the manager's recovery
/// paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    payloads: Arc<RwLock<HashMap<StoreKey, String>>>,
    faults: Arc<Faults>,
    saves: Arc<AtomicU64>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw payload under `key`, bypassing encoding.
    pub async fn insert_raw(&self, key: &StoreKey, payload: impl Into<String>) {
        self.payloads
            .write()
            .await
            .insert(key.clone(), payload.into());
    }

    /// Returns the raw payload stored under `key`.
    pub async fn raw(&self, key: &StoreKey) -> Option<String> {
        self.payloads.read().await.get(key).cloned()
    }

    /// Returns the number of successful saves.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    /// Configures every subsequent load to fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.faults.fail_on_load.store(fail, Ordering::SeqCst);
    }

    /// Configures every subsequent save to fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.faults.fail_on_save.store(fail, Ordering::SeqCst);
    }

    /// Delays every load and save by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.faults.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Clears all stored payloads.
    pub async fn clear(&self) {
        self.payloads.write().await.clear();
    }

    async fn simulate_latency(&self) {
        let millis = self.faults.latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>> {
        self.simulate_latency().await;

        if self.faults.fail_on_load.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store configured to fail on load".to_string(),
            ));
        }

        let payloads = self.payloads.read().await;
        payloads
            .get(key)
            .map(|payload| codec::decode(key, payload))
            .transpose()
    }

    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()> {
        self.simulate_latency().await;

        if self.faults.fail_on_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store configured to fail on save".to_string(),
            ));
        }

        let payload = codec::encode(entries)?;
        self.payloads.write().await.insert(key.clone(), payload);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        self.payloads.write().await.remove(key);
        Ok(())
    }
}
