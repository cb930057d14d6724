//! Cart value type and its transitions.
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s with at most one line per
//! product. Insertion order is display order.
//!
//! Transitions never modify the receiver: `with_added`, `without` and
//! `with_amount` run every stock check first and then build a fresh `Cart`.
//! A failed check leaves the caller holding exactly the cart it started with.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::{Product, StockInfo};

/// Cart rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product is unknown to the catalog or not in the cart.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The requested amount exceeds available stock.
    #[error("Out of stock: product {product_id} requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Stored cart lists the same product twice.
    #[error("Duplicate line item for product {0}")]
    DuplicateLineItem(ProductId),

    /// Stored cart has a line with amount zero.
    #[error("Line item for product {0} has zero amount")]
    ZeroAmount(ProductId),
}

/// A product in the cart together with its quantity.
///
/// Serializes as the product's fields plus `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLineItem {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub const fn single(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}

/// Ordered, duplicate-free collection of line items.
///
/// Serializes as a bare JSON array. Deserialization rejects duplicate product
/// IDs and zero amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateLineItem` if two lines share a product ID,
    /// or `CartError::ZeroAmount` if any line has amount zero.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartError> {
        for (index, item) in items.iter().enumerate() {
            if item.amount == 0 {
                return Err(CartError::ZeroAmount(item.product_id()));
            }
            if items
                .iter()
                .take(index)
                .any(|earlier| earlier.product_id() == item.product_id())
            {
                return Err(CartError::DuplicateLineItem(item.product_id()));
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart is incremented by one, provided its
    /// current amount is below `stock`. A product not yet in the cart is
    /// appended with amount 1 without consulting `stock`: a listed product is
    /// assumed to have at least one unit.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` when the line already holds every
    /// available unit.
    pub fn with_added(&self, product: &Product, stock: &StockInfo) -> Result<Self, CartError> {
        let Some(existing) = self.get(product.id) else {
            let mut items = self.items.clone();
            items.push(CartLineItem::single(product.clone()));
            return Ok(Self { items });
        };

        let requested = existing.amount.saturating_add(1);
        if existing.amount >= stock.amount {
            return Err(CartError::OutOfStock {
                product_id: product.id,
                requested,
                available: stock.amount,
            });
        }

        Ok(self.replacing_amount(product.id, requested))
    }

    /// Drop the line for `product_id`.
    ///
    /// Returns `None` when the product is not in the cart, so callers can
    /// skip persisting an unchanged cart.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Set the amount of an existing line to exactly `amount`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is not in the cart
    /// and `CartError::OutOfStock` if `amount` exceeds `stock`.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: NonZeroU32,
        stock: &StockInfo,
    ) -> Result<Self, CartError> {
        if !self.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }
        if !stock.allows(amount.get()) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount.get(),
                available: stock.amount,
            });
        }
        Ok(self.replacing_amount(product_id, amount.get()))
    }

    fn replacing_amount(&self, product_id: ProductId, amount: u32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    CartLineItem {
                        product: item.product.clone(),
                        amount,
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
