//! Integration tests for the cart manager.
//!
//! These tests drive the manager against real store backends and check what
//! ends up persisted, what subscribers observe, and how store failures are
//! absorbed.

use std::sync::Arc;
use std::time::Duration;

use cart::{CartError, CartManager, CartSnapshot, LoadOutcome, Revision};
use cart_store::{
    CartEntry, CartStore, CartStoreExt, FileCartStore, InMemoryCartStore, Money, Product,
    ProductId, StoreKey,
};

fn shirt() -> Product {
    Product::new("p1", "Shirt", "u", Money::from_units(29.9).unwrap())
}

fn mug() -> Product {
    Product::new("p2", "Mug", "m", Money::from_cents(1250))
}

fn total(snapshot: &CartSnapshot) -> Money {
    snapshot.entries().iter().map(CartEntry::subtotal).sum()
}

fn item_count(snapshot: &CartSnapshot) -> u64 {
    snapshot.entries().iter().map(|e| u64::from(e.quantity)).sum()
}

async fn seeded(entries: &[CartEntry]) -> Arc<InMemoryCartStore> {
    let store = Arc::new(InMemoryCartStore::new());
    store.save(&StoreKey::cart(), entries).await.unwrap();
    store
}

fn entry(product: Product, quantity: u32) -> CartEntry {
    let mut entry = CartEntry::from_product(product);
    entry.quantity = quantity;
    entry
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn add_to_empty_cart() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;

        manager.add_to_cart(shirt());

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.entries(), &[entry(shirt(), 1)]);
        assert_eq!(item_count(&snapshot), 1);
        assert_eq!(total(&snapshot).to_string(), "29.90");
    }

    #[tokio::test]
    async fn add_same_product_twice() {
        let store = seeded(&[entry(shirt(), 1)]).await;
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;

        manager.add_to_cart(shirt());

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.entries().len(), 1);
        assert_eq!(snapshot.entries()[0].quantity, 2);
        assert_eq!(total(&snapshot).to_string(), "59.80");
    }

    #[tokio::test]
    async fn decrement_last_unit_removes_entry() {
        let store = seeded(&[entry(shirt(), 1)]).await;
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;

        manager.decrement("p1");

        let snapshot = manager.snapshot();
        assert!(snapshot.entries().is_empty());
        assert_eq!(item_count(&snapshot), 0);
        assert_eq!(total(&snapshot).to_string(), "0.00");
    }

    #[tokio::test]
    async fn decrement_keeps_entry_above_one() {
        let store = seeded(&[entry(shirt(), 3)]).await;
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;

        manager.decrement("p1");

        assert_eq!(manager.state().quantity_of(&ProductId::new("p1")), 2);
    }

    #[tokio::test]
    async fn increment_missing_leaves_state_unchanged() {
        let store = seeded(&[entry(shirt(), 1), entry(mug(), 4)]).await;
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;
        let before = manager.snapshot();

        assert!(!manager.increment("missing"));

        assert_eq!(manager.snapshot(), before);
    }
}

mod persistence {
    use super::*;

    #[tokio::test]
    async fn every_mutation_is_eventually_persisted() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;

        manager.add_to_cart(shirt());
        manager.add_to_cart(mug());
        manager.increment("p2");
        manager.decrement("p1");
        manager.flush().await.unwrap();

        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored, manager.state().entries());
        assert_eq!(stored, vec![entry(mug(), 2)]);
    }

    #[tokio::test]
    async fn burst_collapses_into_latest_snapshot() {
        let store = Arc::new(InMemoryCartStore::new());
        store.set_latency(Duration::from_millis(20));
        let mut manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;

        for _ in 0..10 {
            manager.add_to_cart(shirt());
        }
        manager.flush().await.unwrap();

        assert!(store.save_count() <= 2);
        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored, manager.state().entries());
        assert_eq!(stored[0].quantity, 10);
    }

    #[tokio::test]
    async fn initial_load_is_not_written_back() {
        let store = seeded(&[entry(shirt(), 2)]).await;
        let before = store.save_count();

        let manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;
        manager.flush().await.unwrap();

        assert_eq!(store.save_count(), before);
    }

    #[tokio::test]
    async fn slow_load_completes_before_first_mutation() {
        let store = seeded(&[entry(shirt(), 1)]).await;
        store.set_latency(Duration::from_millis(50));

        let mut manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;
        manager.add_to_cart(shirt());
        manager.flush().await.unwrap();

        assert_eq!(manager.state().quantity_of(&ProductId::new("p1")), 2);
        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored[0].quantity, 2);
    }

    #[tokio::test]
    async fn write_failure_keeps_memory_state_and_recovers() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;

        store.set_fail_on_save(true);
        manager.add_to_cart(shirt());
        let err = manager.flush().await.unwrap_err();
        match err {
            CartError::StoreWrite { revision, .. } => assert_eq!(revision, Revision::new(1)),
            other => panic!("expected StoreWrite, got {other:?}"),
        }
        assert!(!store.contains(&StoreKey::cart()).await.unwrap());
        assert_eq!(manager.state().len(), 1);

        store.set_fail_on_save(false);
        manager.add_to_cart(mug());
        manager.flush().await.unwrap();

        assert!(manager.persist_status().is_ok());
        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored, manager.state().entries());
    }

    #[tokio::test]
    async fn separate_keys_do_not_interfere() {
        let store = Arc::new(InMemoryCartStore::new());
        let other = StoreKey::cart_in("OtherApp").unwrap();
        let mut first = CartManager::initialize(store.clone(), StoreKey::cart()).await;
        let mut second = CartManager::initialize(store.clone(), other.clone()).await;

        first.add_to_cart(shirt());
        second.add_to_cart(mug());
        first.flush().await.unwrap();
        second.flush().await.unwrap();

        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored, vec![entry(shirt(), 1)]);
        let stored = store.load(&other).await.unwrap().unwrap();
        assert_eq!(stored, vec![entry(mug(), 1)]);
    }
}

mod loading {
    use super::*;

    #[tokio::test]
    async fn load_failure_recovers_without_overwriting() {
        let store = seeded(&[entry(shirt(), 3)]).await;
        store.set_fail_on_load(true);

        let manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;
        manager.flush().await.unwrap();

        assert!(matches!(
            manager.load_outcome(),
            LoadOutcome::Recovered { .. }
        ));
        assert!(manager.state().is_empty());

        store.set_fail_on_load(false);
        let stored = store.load(&StoreKey::cart()).await.unwrap().unwrap();
        assert_eq!(stored, vec![entry(shirt(), 3)]);
    }

    #[tokio::test]
    async fn corrupt_payload_recovers_to_empty() {
        let store = Arc::new(InMemoryCartStore::new());
        store.insert_raw(&StoreKey::cart(), "{not json").await;

        let manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;

        assert!(matches!(
            manager.load_outcome(),
            LoadOutcome::Recovered { .. }
        ));
        assert!(manager.state().is_empty());
        assert_eq!(
            store.raw(&StoreKey::cart()).await.as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn duplicate_ids_in_payload_are_rejected() {
        let store = Arc::new(InMemoryCartStore::new());
        let payload = r#"[
            {"id":"p1","title":"Shirt","imageUrl":"u","price":29.9,"quantity":1},
            {"id":"p1","title":"Shirt","imageUrl":"u","price":29.9,"quantity":2}
        ]"#;
        store.insert_raw(&StoreKey::cart(), payload).await;

        let result = CartManager::try_initialize(store, StoreKey::cart()).await;

        assert!(matches!(result, Err(CartError::StoreRead(_))));
    }

    #[tokio::test]
    async fn legacy_snake_case_payload_loads() {
        let store = Arc::new(InMemoryCartStore::new());
        let payload =
            r#"[{"id":"p1","title":"Shirt","image_url":"u","price":29.9,"quantity":2}]"#;
        store.insert_raw(&StoreKey::cart(), payload).await;

        let manager = CartManager::initialize(store, StoreKey::cart()).await;

        assert_eq!(manager.load_outcome(), &LoadOutcome::Restored { entries: 1 });
        assert_eq!(manager.state().entries(), &[entry(shirt(), 2)]);
    }

    #[tokio::test]
    async fn try_initialize_fails_on_unreadable_store() {
        let store = Arc::new(InMemoryCartStore::new());
        store.set_fail_on_load(true);

        let result = CartManager::try_initialize(store, StoreKey::cart()).await;

        assert!(matches!(result, Err(CartError::StoreRead(_))));
    }
}

mod subscriptions {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_post_mutation_snapshot() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;
        let mut first = manager.subscribe();
        let mut second = manager.subscribe();

        manager.add_to_cart(shirt());

        let a = first.changed().await.unwrap();
        let b = second.changed().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.revision(), Revision::new(1));
        assert_eq!(a.entries(), manager.state().entries());
    }

    #[tokio::test]
    async fn slow_subscriber_skips_to_latest() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;
        let mut subscriber = manager.subscribe();

        manager.add_to_cart(shirt());
        manager.add_to_cart(shirt());
        manager.add_to_cart(mug());

        let snapshot = subscriber.changed().await.unwrap();
        assert_eq!(snapshot.revision(), Revision::new(3));
        assert_eq!(snapshot.entries().len(), 2);
        assert!(!subscriber.has_changed());
    }

    #[tokio::test]
    async fn subscriber_outlives_manager_with_last_snapshot() {
        let store = Arc::new(InMemoryCartStore::new());
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;
        let mut subscriber = manager.subscribe();
        manager.add_to_cart(shirt());
        manager.shutdown().await.unwrap();

        let snapshot = subscriber.changed().await.unwrap();
        assert_eq!(snapshot.revision(), Revision::new(1));
        assert!(matches!(subscriber.changed().await, Err(CartError::Closed)));
        assert_eq!(subscriber.current().revision(), Revision::new(1));
    }
}

mod file_backend {
    use super::*;

    #[tokio::test]
    async fn cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let store = Arc::new(FileCartStore::new(dir.path()));
        let mut manager = CartManager::initialize(store, StoreKey::cart()).await;
        manager.add_to_cart(shirt());
        manager.add_to_cart(mug());
        manager.increment("p1");
        manager.shutdown().await.unwrap();

        let store = Arc::new(FileCartStore::new(dir.path()));
        let manager = CartManager::initialize(store, StoreKey::cart()).await;

        assert_eq!(manager.load_outcome(), &LoadOutcome::Restored { entries: 2 });
        assert_eq!(
            manager.state().entries(),
            &[entry(shirt(), 2), entry(mug(), 1)]
        );
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn CartStore> = Arc::new(FileCartStore::new(dir.path()));

        let mut manager = CartManager::initialize(store.clone(), StoreKey::cart()).await;
        manager.add_to_cart(shirt());
        manager.flush().await.unwrap();

        assert!(store.contains(&StoreKey::cart()).await.unwrap());
    }
}
