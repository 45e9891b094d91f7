//! Cart lines and the cart itself.
//!
//! A [`Cart`] is never mutated in place. Every transition (`with_added`,
//! `with_incremented`, `with_amount`, `without`) returns a new cart and leaves
//! the receiver untouched, so a snapshot handed out earlier stays valid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::id::ProductId;
use super::product::Product;

/// A product in the cart together with the selected quantity.
///
/// Serializes as the product record with an extra `amount` field, the same
/// shape the storefront has always persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Selected quantity, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// A new line for `product` with quantity 1.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity, if the product has a price.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.product
            .price
            .map(|price| price * Decimal::from(self.amount))
    }
}

/// Ordered list of cart lines, unique by product id.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines.
    ///
    /// Keeps the first line for any repeated id and skips zero quantities.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount > 0 && !cart.contains(item.id()) {
                cart.items.push(item);
            }
        }
        cart
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals. Lines without a price add nothing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().filter_map(CartItem::subtotal).sum()
    }

    /// Append `product` with quantity 1.
    ///
    /// Returns `None` if the product is already in the cart.
    #[must_use]
    pub fn with_added(&self, product: Product) -> Option<Self> {
        if self.contains(product.id) {
            return None;
        }
        let mut items = self.items.clone();
        items.push(CartItem::new(product));
        Some(Self { items })
    }

    /// Increase the quantity of `id` by one.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn with_incremented(&self, id: ProductId) -> Option<Self> {
        let current = self.find(id)?.amount;
        self.with_amount(id, current.saturating_add(1))
    }

    /// Replace the quantity of `id`.
    ///
    /// Returns `None` if the product is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    CartItem {
                        product: item.product.clone(),
                        amount,
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }

    /// Drop the line for `id`, keeping the others in order.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        Some(Self { items })
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
