//! Stock and product lookups.
//!
//! # Architecture
//!
//! - The [`Catalog`] trait is the seam the cart store depends on
//! - [`HttpCatalog`] talks to the REST stock/product service with `reqwest`
//! - Product records are cached in memory via `moka` (5 minute TTL)
//! - Stock is always fetched live; it is the value every cart rule checks
//!
//! # Endpoints
//!
//! ```text
//! GET /stock/{id}     -> { "id": 1, "amount": 3 }
//! GET /products/{id}  -> { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! ```

mod client;

pub use client::HttpCatalog;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a body that is not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No stock or product record for this id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered with an unexpected status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Read-only access to stock levels and product records.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;

    /// Full product record.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Check that the service is reachable.
    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}
