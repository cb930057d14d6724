//! Cart store: the single owner of the shopper's cart.
//!
//! # Operations
//!
//! - [`CartStore::add_product`] - add one unit, checking stock for existing lines
//! - [`CartStore::remove_product`] - drop a line (absent lines are a no-op)
//! - [`CartStore::update_product_amount`] - set a line's amount, checking stock
//!
//! Each operation fetches what it needs from the [`Catalog`], computes the
//! next [`Cart`] with every check done up front, and only then commits it and
//! writes it to storage. Failures never escape: they are logged, turned into a
//! [`Notification`] for the [`Notifier`], and the cart stays as it was.
//!
//! Operations take `&mut self`, so two operations can never interleave on the
//! same store. Drivers that share a store across tasks wrap it in a mutex.

mod error;

pub use error::CartOperationError;

use std::num::NonZeroU32;

use rocketshoes_core::{Cart, CartError, ProductId};
use tracing::{debug, instrument, warn};

use crate::catalog::Catalog;
use crate::error::add_breadcrumb;
use crate::notify::{CartOperation, Notification, Notifier};
use crate::storage::{CartPersistence, KeyValueStore, StorageError};

/// Owns the cart and mediates every change to it.
pub struct CartStore<C, S, N> {
    catalog: C,
    persistence: CartPersistence<S>,
    notifier: N,
    cart: Cart,
}

impl<C, S, N> CartStore<C, S, N>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    /// Open the store, restoring the cart from `persistence`.
    pub fn open(catalog: C, persistence: CartPersistence<S>, notifier: N) -> Self {
        let cart = persistence.load();
        Self {
            catalog,
            persistence,
            notifier,
            cart,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Add one unit of a product.
    ///
    /// Products already in the cart are incremented when stock allows; new
    /// products are appended with amount 1.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> &Cart {
        let id = product_id.to_string();
        add_breadcrumb("cart", "Add product", Some(&[("product_id", id.as_str())]));

        match self.try_add(product_id).await {
            Ok(next) => self.commit(next),
            Err(e) => self.report(CartOperation::Add, product_id, &e),
        }
        &self.cart
    }

    /// Remove a product's line. Removing a product that is not in the cart
    /// changes nothing and is not a failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> &Cart {
        let id = product_id.to_string();
        add_breadcrumb("cart", "Remove product", Some(&[("product_id", id.as_str())]));

        match self.cart.without(product_id) {
            Some(next) => self.commit(next),
            None => debug!("Product not in cart, nothing to remove"),
        }
        &self.cart
    }

    /// Set a line's amount to exactly `amount`.
    ///
    /// Amounts of zero or less are ignored without contacting the catalog.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&mut self, product_id: ProductId, amount: i64) -> &Cart {
        let Some(amount) = positive_amount(amount) else {
            debug!(amount, "Ignoring non-positive amount");
            return &self.cart;
        };

        let (id, requested) = (product_id.to_string(), amount.to_string());
        add_breadcrumb(
            "cart",
            "Update product amount",
            Some(&[("product_id", id.as_str()), ("amount", requested.as_str())]),
        );

        match self.try_update(product_id, amount).await {
            Ok(next) => self.commit(next),
            Err(e) => self.report(CartOperation::UpdateAmount, product_id, &e),
        }
        &self.cart
    }

    /// Empty the cart and remove its storage slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed; the cart is left
    /// untouched in that case.
    pub fn clear(&mut self) -> Result<&Cart, StorageError> {
        self.persistence.clear()?;
        self.cart = Cart::new();
        debug!("Cart cleared");
        Ok(&self.cart)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartOperationError> {
        let product = self.catalog.get_product(product_id).await?;
        let stock = self.catalog.get_stock(product.id).await?;
        Ok(self.cart.with_added(&product, &stock)?)
    }

    async fn try_update(
        &self,
        product_id: ProductId,
        amount: NonZeroU32,
    ) -> Result<Cart, CartOperationError> {
        if !self.cart.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id).into());
        }
        let stock = self.catalog.get_stock(product_id).await?;
        Ok(self.cart.with_amount(product_id, amount, &stock)?)
    }

    /// Replace the cart and persist it.
    ///
    /// A failed write is logged; the in-memory cart still advances.
    fn commit(&mut self, next: Cart) {
        if let Err(e) = self.persistence.save(&next) {
            tracing::error!(
                error = %e,
                key = %self.persistence.key(),
                "Failed to persist cart"
            );
        }
        self.cart = next;
    }

    fn report(&self, operation: CartOperation, product_id: ProductId, err: &CartOperationError) {
        warn!(
            ?operation,
            product_id = %product_id,
            error = %err,
            "Cart operation failed"
        );
        self.notifier
            .notify(Notification::failure(operation, err.kind(), product_id));
    }
}

/// Amounts above `u32::MAX` saturate; no stock level can satisfy them anyway.
fn positive_amount(amount: i64) -> Option<NonZeroU32> {
    if amount <= 0 {
        return None;
    }
    NonZeroU32::new(u32::try_from(amount).unwrap_or(u32::MAX))
}
