//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::cart::{CartError, CartStore};
use crate::catalog::{Catalog, CatalogError, HttpCatalog};
use crate::config::StorefrontConfig;
use crate::storage::FileStore;

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart: {0}")]
    Cart(#[from] CartError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, the catalog and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartStore,
    catalog: Arc<dyn Catalog>,
}

impl AppState {
    /// Create a new application state from already-built parts.
    #[must_use]
    pub fn new(config: StorefrontConfig, cart: CartStore, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                catalog,
            }),
        }
    }

    /// Build the HTTP catalog and file slot from configuration and load the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the persisted
    /// cart cannot be read.
    pub async fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog: Arc<dyn Catalog> = Arc::new(HttpCatalog::new(&config.catalog)?);
        let storage = Arc::new(FileStore::new(config.cart.path.clone()));
        let cart = CartStore::load(Arc::clone(&catalog), storage, config.cart.key.clone()).await?;

        Ok(Self::new(config, cart, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.inner.catalog.as_ref()
    }
}
