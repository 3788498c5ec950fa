//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use cart_store::{StoreKey, StoreError};
use thiserror::Error;

/// Which durable store backs the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "postgres" => Ok(StoreBackend::Postgres),
            _ => Err(ConfigError::Invalid {
                var: "CART_STORE",
                value: s.to_string(),
            }),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid cart namespace: {0}")]
    Namespace(#[from] StoreError),
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CART_STORE`: `memory`, `file` or `postgres` (default: `file`)
/// - `CART_STORE_DIR`: directory for the file store (default: `./data`)
/// - `DATABASE_URL`: required when `CART_STORE=postgres`
/// - `CART_NAMESPACE`: store key namespace (default: `"GoMarketPlace"`)
/// - `PRODUCT_FEED_URL`: product feed base URL (unset: built-in catalog)
/// - `CURRENCY_LOCALE`: display locale for prices (default: `"en-US"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub store: StoreBackend,
    pub store_dir: PathBuf,
    pub database_url: Option<String>,
    pub namespace: String,
    pub product_feed_url: Option<String>,
    pub currency_locale: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: port,
            })?,
            None => defaults.port,
        };
        let store = match lookup("CART_STORE") {
            Some(store) => store.parse()?,
            None => defaults.store,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            store,
            store_dir: lookup("CART_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            database_url,
            namespace: lookup("CART_NAMESPACE").unwrap_or(defaults.namespace),
            product_feed_url: lookup("PRODUCT_FEED_URL").filter(|url| !url.is_empty()),
            currency_locale: lookup("CURRENCY_LOCALE").unwrap_or(defaults.currency_locale),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the store key of the cart.
    pub fn cart_key(&self) -> Result<StoreKey, ConfigError> {
        Ok(StoreKey::cart_in(&self.namespace)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            store: StoreBackend::default(),
            store_dir: PathBuf::from("./data"),
            database_url: None,
            namespace: cart_store::DEFAULT_NAMESPACE.to_string(),
            product_feed_url: None,
            currency_locale: "en-US".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.store, StoreBackend::File);
        assert_eq!(config.namespace, "GoMarketPlace");
        assert_eq!(config.currency_locale, "en-US");
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.store_dir, PathBuf::from("./data"));
        assert!(config.product_feed_url.is_none());
        assert_eq!(config.cart_key().unwrap().as_str(), "@GoMarketPlace:products");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("CART_STORE", "Memory"),
            ("CART_NAMESPACE", "Shop"),
            ("PRODUCT_FEED_URL", "http://localhost:3333"),
            ("CURRENCY_LOCALE", "pt-BR"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.cart_key().unwrap().as_str(), "@Shop:products");
        assert_eq!(config.product_feed_url.as_deref(), Some("http://localhost:3333"));
        assert_eq!(config.currency_locale, "pt-BR");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("CART_STORE", "redis")])),
            Err(ConfigError::Invalid { var: "CART_STORE", .. })
        ));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("CART_STORE", "postgres")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        let config = Config::from_lookup(lookup(&[
            ("CART_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/cart"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreBackend::Postgres);
    }
}
