//! CLI command implementations.

pub mod cart;

use rocketshoes_storefront::cart::{CartError, Notice};
use rocketshoes_storefront::catalog::CatalogError;
use rocketshoes_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built.
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart could not be loaded.
    #[error("Could not load cart: {0}")]
    Load(#[source] CartError),

    /// The operation did not change the cart.
    #[error("{}: {source}", notice.message)]
    Rejected {
        notice: Notice,
        #[source]
        source: CartError,
    },
}
