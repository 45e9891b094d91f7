//! Catalog records as served by the stock/product API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A product record from `GET /products/{id}`.
///
/// Only `id` is required. Display attributes are optional: a record without
/// a title or price still goes in the cart. Any other attribute the catalog
/// sends is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Unit price; `None` when the record has no usable price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra attributes.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price: Some(price),
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// Stock level from `GET /stock/{id}`.
///
/// Signed: the service may report zero or a negative count, and both mean
/// nothing can be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Units available.
    pub amount: i64,
}

impl Stock {
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self { amount }
    }

    /// Whether `quantity` units can be held at this level.
    #[must_use]
    pub const fn covers(&self, quantity: i64) -> bool {
        quantity <= self.amount
    }
}
