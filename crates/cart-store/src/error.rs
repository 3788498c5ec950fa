use common::EntryValidationError;
use thiserror::Error;

/// Errors that can occur when interacting with a cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored payload parsed but breaks the cart invariants.
    #[error("Corrupt payload for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: EntryValidationError,
    },

    /// The store key is not usable.
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    /// A filesystem error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
