//! The cart store.
//!
//! Holds the shopper's cart for the session, mirrors it to a key-value slot,
//! and checks every quantity change against live stock.
//!
//! # Operations
//!
//! - [`CartStore::add_product`] - add one unit (new line or +1)
//! - [`CartStore::remove_product`] - drop a line
//! - [`CartStore::update_product_amount`] - set a line's quantity
//! - [`CartStore::snapshot`] - current cart
//!
//! # Commit protocol
//!
//! Each successful operation builds a new [`Cart`], writes it to the slot,
//! and only then publishes it as the current snapshot. A failed write leaves
//! both copies on the previous cart.
//!
//! Operations run one at a time: a writer lock is held from the first read
//! of the cart until the commit, across the stock and product lookups.
//! Snapshots never wait on it.

mod error;
mod notice;

pub use error::CartError;
pub use notice::{CartOperation, Notice, NoticeLevel, messages};

use std::sync::Arc;

use arc_swap::ArcSwap;
use rocketshoes_core::{Cart, ProductId};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::catalog::{Catalog, CatalogError};
use crate::storage::KeyValueStore;

/// Request to set a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity; anything below 1 is rejected.
    pub amount: i64,
}

/// Session cart backed by a catalog and a persistence slot.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    current: ArcSwap<Cart>,
    writer: Mutex<()>,
}

impl CartStore {
    /// Start a session: read the cart from `key`, or start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or holds something that
    /// is not a serialized cart.
    pub async fn load(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, CartError> {
        let key = key.into();
        let cart = read_persisted(storage.as_ref(), &key).await?;
        tracing::debug!(key = %key, items = cart.len(), "Cart loaded");

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                key,
                current: ArcSwap::from_pointee(cart),
                writer: Mutex::new(()),
            }),
        })
    }

    /// The current cart.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Cart> {
        self.inner.current.load_full()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets +1 if stock allows more than the
    /// current quantity. A new product is fetched from the catalog and
    /// appended with quantity 1 if any unit is in stock.
    ///
    /// # Errors
    ///
    /// `OutOfStock` when stock does not allow it; `Catalog`, `Storage` or
    /// `Serialization` on a collaborator fault. The cart is unchanged.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let result = self.try_add(product_id).await;
        log_outcome(CartOperation::Add, &result);
        result
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// `NotInCart` if there is no such line; `Storage` or `Serialization` if
    /// the commit fails. The cart is unchanged.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let result = self.try_remove(product_id).await;
        log_outcome(CartOperation::Remove, &result);
        result
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` below 1 (checked before any lookup), `OutOfStock`
    /// above the stock level, `NotInCart` if there is no such line, or a
    /// collaborator fault. The cart is unchanged.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Arc<Cart>, CartError> {
        let result = self.try_update(request).await;
        log_outcome(CartOperation::UpdateAmount, &result);
        result
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _writer = self.inner.writer.lock().await;
        let cart = self.snapshot();
        let existing = cart.find(product_id).map(|item| item.amount);

        let stock = self.inner.catalog.stock(product_id).await?;

        let next = if let Some(amount) = existing {
            let requested = i64::from(amount) + 1;
            if !stock.covers(requested) {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested,
                    available: stock.amount,
                });
            }
            cart.with_incremented(product_id)
        } else {
            let product = self.inner.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::NotFound(format!(
                    "products {product_id} (service returned product {})",
                    product.id
                ))
                .into());
            }
            if !stock.covers(1) {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: 1,
                    available: stock.amount,
                });
            }
            cart.with_added(product)
        };

        let next = next.ok_or(CartError::NotInCart(product_id))?;
        self.commit(next).await
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _writer = self.inner.writer.lock().await;
        let next = self
            .snapshot()
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        self.commit(next).await
    }

    async fn try_update(&self, request: UpdateProductAmount) -> Result<Arc<Cart>, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }

        let _writer = self.inner.writer.lock().await;
        let stock = self.inner.catalog.stock(product_id).await?;

        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }
        let amount = u32::try_from(amount).map_err(|_| CartError::InvalidAmount(amount))?;

        let next = self
            .snapshot()
            .with_amount(product_id, amount)
            .ok_or(CartError::NotInCart(product_id))?;
        self.commit(next).await
    }

    /// Persist `next`, then publish it.
    async fn commit(&self, next: Cart) -> Result<Arc<Cart>, CartError> {
        let serialized = serde_json::to_string(&next)?;
        self.inner.storage.set(&self.inner.key, serialized).await?;

        let next = Arc::new(next);
        self.inner.current.store(Arc::clone(&next));
        Ok(next)
    }
}

/// Read the cart persisted under `key` without starting a session.
///
/// An empty slot reads as an empty cart.
///
/// # Errors
///
/// Returns an error if the slot cannot be read or holds something that is
/// not a serialized cart.
pub async fn read_persisted(storage: &dyn KeyValueStore, key: &str) -> Result<Cart, CartError> {
    match storage.get(key).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Cart::new()),
    }
}

/// Rejections are expected traffic; only collaborator faults are warnings.
fn log_outcome(operation: CartOperation, result: &Result<Arc<Cart>, CartError>) {
    match result {
        Ok(cart) => tracing::info!(
            ?operation,
            items = cart.len(),
            quantity = cart.total_quantity(),
            "Cart updated"
        ),
        Err(error) if error.is_rejection() => {
            tracing::info!(?operation, reason = %error, "Cart operation rejected");
        }
        Err(error) => tracing::warn!(?operation, error = %error, "Cart operation failed"),
    }
}
