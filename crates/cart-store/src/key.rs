use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// Namespace the storefront uses for its own keys.
pub const DEFAULT_NAMESPACE: &str = "GoMarketPlace";

/// Name of the cart bucket within the namespace.
pub const CART_BUCKET: &str = "products";

/// Key identifying one bucket in a cart store.
///
/// Keys are namespaced (`@{namespace}:{name}`) so the cart never collides
/// with unrelated data kept in the same storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);

impl StoreKey {
    /// Creates a key from a raw string.
    ///
    /// Fails if the key is empty or contains control characters.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        if key.chars().any(char::is_control) {
            return Err(StoreError::InvalidKey(format!(
                "key {key:?} contains control characters"
            )));
        }
        Ok(Self(key))
    }

    /// Builds `@{namespace}:{name}`.
    pub fn namespaced(namespace: &str, name: &str) -> Result<Self> {
        if namespace.is_empty() || name.is_empty() {
            return Err(StoreError::InvalidKey(
                "namespace and name must not be empty".to_string(),
            ));
        }
        Self::new(format!("@{namespace}:{name}"))
    }

    /// The cart key under a custom namespace.
    pub fn cart_in(namespace: &str) -> Result<Self> {
        Self::namespaced(namespace, CART_BUCKET)
    }

    /// The default cart key, `@GoMarketPlace:products`.
    pub fn cart() -> Self {
        Self(format!("@{DEFAULT_NAMESPACE}:{CART_BUCKET}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StoreKey {
    fn default() -> Self {
        Self::cart()
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
