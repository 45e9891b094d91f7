//! Cart operation errors.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Why a cart operation did not change the cart.
///
/// The first three variants are business rejections; the rest are faults in
/// a collaborator.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the units in stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Quantities below 1 are never accepted.
    #[error("invalid amount {0}, must be at least 1")]
    InvalidAmount(i64),

    /// Stock or product lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart could not be read from or written to its slot.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// `true` for rejections caused by the request itself rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfStock { .. } | Self::NotInCart(_) | Self::InvalidAmount(_)
        )
    }
}
