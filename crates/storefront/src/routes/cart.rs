//! Cart route handlers.
//!
//! Every mutation answers with the cart as it stands afterwards plus the
//! notice to show the shopper. Successful mutations also send an
//! `HX-Trigger: cart-updated` header so other fragments can refresh.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{AppendHeaders, IntoResponse, Response},
};
use rocketshoes_core::{Cart, CartItem, ProductId, format_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartError, CartOperation, Notice, UpdateProductAmount};
use crate::error::{AppError, CartResponse, Result};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    /// `None` when the catalog record carries no price.
    pub price: Option<Decimal>,
    pub price_formatted: Option<String>,
    pub subtotal: Option<Decimal>,
    pub subtotal_formatted: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub total_formatted: String,
    /// Distinct products (the header badge).
    pub item_count: usize,
    pub total_quantity: u64,
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: usize,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            total,
            total_formatted: format_price(total),
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let subtotal = item.subtotal();
        Self {
            product_id: item.id(),
            title: item.product.title.clone(),
            image: item.product.image.clone(),
            amount: item.amount,
            price: item.product.price,
            price_formatted: item.product.price.map(format_price),
            subtotal,
            subtotal_formatted: subtotal.map(format_price),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub product_id: ProductId,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveProductRequest {
    pub product_id: ProductId,
}

/// Turn a store result into the response for `operation`.
fn respond(
    state: &AppState,
    operation: CartOperation,
    result: std::result::Result<std::sync::Arc<Cart>, CartError>,
) -> Result<Response> {
    match result {
        Ok(cart) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            Json(CartResponse {
                cart: CartView::from(cart.as_ref()),
                notice: Notice::success(operation),
            }),
        )
            .into_response()),
        Err(source) => Err(AppError::Cart {
            operation,
            source,
            cart: CartView::from(state.cart().snapshot().as_ref()),
        }),
    }
}

/// Unwrap a JSON body, answering an unreadable one in the cart envelope.
fn read_body<T>(
    state: &AppState,
    operation: CartOperation,
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|source| AppError::Request {
            operation,
            source,
            cart: CartView::from(state.cart().snapshot().as_ref()),
        })
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(state.cart().snapshot().as_ref()))
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    Json(CartCountView {
        count: state.cart().snapshot().len(),
    })
}

/// Add one unit of a product.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<Response> {
    let request = read_body(&state, CartOperation::Add, payload)?;
    let result = state.cart().add_product(request.product_id).await;
    respond(&state, CartOperation::Add, result)
}

/// Remove a product's line.
#[instrument(skip_all)]
pub async fn remove(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RemoveProductRequest>, JsonRejection>,
) -> Result<Response> {
    let request = read_body(&state, CartOperation::Remove, payload)?;
    let result = state.cart().remove_product(request.product_id).await;
    respond(&state, CartOperation::Remove, result)
}

/// Set a line's quantity.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateProductAmount>, JsonRejection>,
) -> Result<Response> {
    let request = read_body(&state, CartOperation::UpdateAmount, payload)?;
    let result = state.cart().update_product_amount(request).await;
    respond(&state, CartOperation::UpdateAmount, result)
}
