//! Durable key-value storage for the cart.
//!
//! The cart lives in a single named slot, the server-side counterpart of a
//! browser's local storage entry. [`KeyValueStore`] is the slot backend;
//! [`CartPersistence`] layers JSON (de)serialization of the whole cart on top.
//!
//! Every save overwrites the entire slot. There is no incremental update.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use rocketshoes_core::Cart;
use thiserror::Error;
use tracing::{debug, warn};

/// Slot key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String-valued key-value slots.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Empty a slot. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Loads and saves the cart as a JSON array in one slot.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Persist under a custom slot key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Restore the cart.
    ///
    /// An absent, unreadable or malformed slot yields an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, lines = cart.len(), "Restored cart");
                cart
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored cart is malformed, starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the slot with the full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        self.store.set(&self.key, &json)
    }

    /// Remove the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{CartLineItem, Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn sample_cart() -> Cart {
        Cart::from_items(vec![
            CartLineItem {
                product: Product {
                    id: ProductId::new(1),
                    title: "Tênis de Caminhada Leve Confortável".to_string(),
                    price: Decimal::new(17990, 2),
                    image: "https://cdn.example.com/1.jpg".to_string(),
                },
                amount: 2,
            },
            CartLineItem::single(Product {
                id: ProductId::new(3),
                title: "Tênis Adidas Duramo Lite 2.0".to_string(),
                price: Decimal::new(21990, 2),
                image: "https://cdn.example.com/3.jpg".to_string(),
            }),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let persistence = CartPersistence::new(MemoryStore::new());
        let cart = sample_cart();

        persistence.save(&cart).unwrap();

        assert_eq!(persistence.load(), cart);
    }

    #[test]
    fn test_absent_slot_loads_empty() {
        let persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_malformed_slot_loads_empty() {
        let store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, "{not json").unwrap();

        let persistence = CartPersistence::new(store);
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_invalid_cart_loads_empty() {
        let store = MemoryStore::new();
        store
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":1,"title":"a","price":1,"image":"a.jpg","amount":0}]"#,
            )
            .unwrap();

        assert!(CartPersistence::new(store).load().is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let persistence = CartPersistence::new(MemoryStore::new());
        persistence.save(&sample_cart()).unwrap();
        persistence.save(&Cart::new()).unwrap();

        assert_eq!(
            persistence.store().get(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_clear() {
        let persistence = CartPersistence::new(MemoryStore::new());
        persistence.save(&sample_cart()).unwrap();
        persistence.clear().unwrap();

        assert!(persistence.store().get(CART_STORAGE_KEY).unwrap().is_none());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_custom_key() {
        let persistence = CartPersistence::with_key(MemoryStore::new(), "cart:guest");
        persistence.save(&sample_cart()).unwrap();

        assert_eq!(persistence.key(), "cart:guest");
        assert!(persistence.store().get(CART_STORAGE_KEY).unwrap().is_none());
        assert!(persistence.store().get("cart:guest").unwrap().is_some());
    }
}
