use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::CartEntry;
use sqlx::PgPool;

use crate::{Result, StoreKey, codec, store::CartStore};

/// PostgreSQL-backed cart store.
///
/// Each key is one row in `cart_store`; the payload column holds the same
/// JSON array the other backends write.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and returns a store over a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Returns when `key` was last written, if it exists.
    pub async fn updated_at(&self, key: &StoreKey) -> Result<Option<DateTime<Utc>>> {
        let updated_at: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT updated_at FROM cart_store WHERE key = $1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(updated_at)
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    #[tracing::instrument(skip(self))]
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>> {
        let payload: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT payload FROM cart_store WHERE key = $1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(|payload| codec::decode_value(key, payload))
            .transpose()
    }

    #[tracing::instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()> {
        let payload = codec::encode_value(entries)?;

        sqlx::query(
            r#"
            INSERT INTO cart_store (key, payload, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        sqlx::query("DELETE FROM cart_store WHERE key = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
