//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. Each test
//! writes under its own key, so they can share one table.
//! Run with:
//!
//! ```bash
//! cargo test -p cart-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use cart_store::{CartEntry, CartStore, CartStoreExt, Money, PostgresCartStore, StoreError, StoreKey};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_cart_store_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool
async fn get_test_store() -> PostgresCartStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    PostgresCartStore::new(pool)
}

fn test_key(name: &str) -> StoreKey {
    StoreKey::namespaced("PgTest", name).unwrap()
}

fn entry(id: &str, quantity: u32, cents: i64) -> CartEntry {
    CartEntry {
        id: id.into(),
        title: format!("Product {id}"),
        image_url: format!("https://img.example/{id}.png"),
        price: Money::from_cents(cents),
        quantity,
    }
}

#[tokio::test]
async fn load_missing_key_returns_none() {
    let store = get_test_store().await;

    let loaded = store.load(&test_key("missing")).await.unwrap();
    assert!(loaded.is_none());
    assert!(!store.contains(&test_key("missing")).await.unwrap());
}

#[tokio::test]
async fn save_and_load_round_trip() {
    let store = get_test_store().await;
    let key = test_key("round-trip");
    let entries = vec![entry("p1", 1, 2990), entry("p2", 3, 1250)];

    store.save(&key, &entries).await.unwrap();

    let loaded = store.load(&key).await.unwrap();
    assert_eq!(loaded, Some(entries));
    assert!(store.updated_at(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn save_replaces_whole_payload() {
    let store = get_test_store().await;
    let key = test_key("replace");

    store
        .save(&key, &[entry("p1", 1, 100), entry("p2", 1, 200)])
        .await
        .unwrap();
    store.save(&key, &[entry("p2", 5, 200)]).await.unwrap();

    let loaded = store.load(&key).await.unwrap().unwrap();
    assert_eq!(loaded, vec![entry("p2", 5, 200)]);
}

#[tokio::test]
async fn preserves_insertion_order() {
    let store = get_test_store().await;
    let key = test_key("order");
    let entries = vec![entry("z", 1, 100), entry("a", 1, 100), entry("m", 2, 100)];

    store.save(&key, &entries).await.unwrap();

    let ids: Vec<_> = store
        .load(&key)
        .await
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|e| e.id.to_string())
        .collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[tokio::test]
async fn remove_deletes_row() {
    let store = get_test_store().await;
    let key = test_key("remove");
    store.save(&key, &[entry("p1", 1, 100)]).await.unwrap();

    store.remove(&key).await.unwrap();

    assert!(store.load(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_row_is_reported() {
    let store = get_test_store().await;
    let key = test_key("corrupt");

    sqlx::query("INSERT INTO cart_store (key, payload) VALUES ($1, $2)")
        .bind(key.as_str())
        .bind(serde_json::json!([
            {"id": "p1", "title": "A", "imageUrl": "u", "price": 1.0, "quantity": 0}
        ]))
        .execute(store.pool())
        .await
        .unwrap();

    let result = store.load(&key).await;
    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}
