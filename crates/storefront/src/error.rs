//! Unified error handling with Sentry integration.
//!
//! Every cart route failure answers with the cart as it stands and the
//! shopper-facing notice. Collaborator faults are captured to Sentry before
//! responding; rejections and unreadable requests are not.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartError, CartOperation, Notice};
use crate::routes::cart::CartView;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation did not change the cart.
    #[error("Cart error: {source}")]
    Cart {
        operation: CartOperation,
        #[source]
        source: CartError,
        /// Cart as it stands after the failed operation.
        cart: CartView,
    },

    /// The request body could not be read as the operation's input.
    #[error("Invalid request: {source}")]
    Request {
        operation: CartOperation,
        #[source]
        source: JsonRejection,
        cart: CartView,
    },
}

/// Body of every cart operation response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    pub notice: Notice,
}

/// Status code for a cart operation failure.
#[must_use]
pub const fn cart_status(error: &CartError) -> StatusCode {
    match error {
        CartError::OutOfStock { .. } => StatusCode::CONFLICT,
        CartError::NotInCart(_) => StatusCode::NOT_FOUND,
        CartError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CartError::Catalog(_) => StatusCode::BAD_GATEWAY,
        CartError::Storage(_) | CartError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Cart { source, .. } = &self
            && !source.is_rejection()
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, cart, notice) = match self {
            Self::Cart {
                operation,
                source,
                cart,
            } => (
                cart_status(&source),
                cart,
                Notice::failure(operation, &source),
            ),
            Self::Request {
                operation,
                source,
                cart,
            } => {
                tracing::debug!(error = %source, ?operation, "Unreadable cart request");
                (source.status(), cart, Notice::generic_failure(operation))
            }
        };
        (status, Json(CartResponse { cart, notice })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use rocketshoes_core::{Cart, ProductId};

    use super::*;
    use crate::catalog::CatalogError;
    use crate::storage::StorageError;

    fn cart_error(source: CartError) -> AppError {
        AppError::Cart {
            operation: CartOperation::Add,
            source,
            cart: CartView::from(&Cart::new()),
        }
    }

    #[test]
    fn test_app_error_display() {
        let err = cart_error(CartError::NotInCart(ProductId::new(2)));
        assert_eq!(err.to_string(), "Cart error: product 2 is not in the cart");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(cart_error(CartError::OutOfStock {
                product_id: ProductId::new(1),
                requested: 2,
                available: 1,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(cart_error(CartError::NotInCart(ProductId::new(1)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(cart_error(CartError::InvalidAmount(0))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(cart_error(CartError::Catalog(CatalogError::NotFound(
                "stock 1".to_string()
            )))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(cart_error(CartError::Storage(StorageError::Io(
                std::io::Error::other("disk full")
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
