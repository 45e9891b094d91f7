//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the stock/product service (e.g. `http://localhost:3333`)
//!
//! ## Optional
//! - `CATALOG_API_TOKEN` - Bearer token sent to the catalog service
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CART_STORAGE_PATH` - File backing the cart slot (default: data/storage.json)
//! - `CART_STORAGE_KEY` - Key of the cart slot (default: @RocketShoes:cart)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the cart has always been persisted under.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

const DEFAULT_STORAGE_PATH: &str = "data/storage.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Stock/product service
    pub catalog: CatalogConfig,
    /// Cart persistence slot
    pub cart: CartStorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Stock/product service configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where and under which key the cart is persisted.
#[derive(Debug, Clone)]
pub struct CartStorageConfig {
    pub path: PathBuf,
    pub key: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;

        Ok(Self {
            host,
            port,
            catalog: CatalogConfig::from_env(&env)?,
            cart: CartStorageConfig::from_env(&env),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Load only the catalog section (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CATALOG_API_URL` is missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_env(&Env(&lookup))
    }

    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw_url = env.required("CATALOG_API_URL")?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let timeout_secs: u64 =
            env.parse_or("CATALOG_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_token: env
                .optional("CATALOG_API_TOKEN")
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl CartStorageConfig {
    /// Load only the storage section (used by the CLI).
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_env(&Env(&lookup))
    }

    fn from_env(env: &Env<'_>) -> Self {
        Self {
            path: PathBuf::from(env.or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            key: env.or_default("CART_STORAGE_KEY", DEFAULT_CART_KEY),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the section loaders.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            StorefrontConfig::from_lookup(lookup(&[("CATALOG_API_URL", "http://localhost:3333")]))
                .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert!(config.catalog.api_token.is_none());
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
        assert_eq!(config.cart.key, "@RocketShoes:cart");
        assert_eq!(config.cart.path, PathBuf::from("data/storage.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_catalog_url() {
        let err = StorefrontConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "CATALOG_API_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = StorefrontConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "http://localhost:3333"),
            ("STOREFRONT_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_catalog_url() {
        let err = CatalogConfig::from_lookup(lookup(&[("CATALOG_API_URL", "mailto:x@y.z")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = CatalogConfig::from_lookup(lookup(&[("CATALOG_API_URL", "::nope")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = CatalogConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "http://localhost:3333"),
            ("CATALOG_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "CATALOG_TIMEOUT_SECS"));
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "https://api.rocketshoes.test/v1/"),
            ("CATALOG_API_TOKEN", "tok_9f8e7d"),
            ("CATALOG_TIMEOUT_SECS", "3"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("CART_STORAGE_KEY", "cart"),
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.catalog.api_token.as_ref().unwrap().expose_secret(),
            "tok_9f8e7d"
        );
        assert_eq!(config.catalog.timeout, Duration::from_secs(3));
        assert_eq!(config.cart.key, "cart");
        assert_eq!(config.cart.path, PathBuf::from("/tmp/cart.json"));
    }

    #[test]
    fn test_catalog_config_debug_redacts_token() {
        let config = CatalogConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "http://localhost:3333"),
            ("CATALOG_API_TOKEN", "super_secret_catalog_token"),
        ]))
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:3333"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_catalog_token"));
    }
}
