//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cart::CartStore;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::notify::ToastQueue;
use crate::storage::{CartPersistence, FileStore};

/// Cart store as wired by the server: HTTP catalog, file-backed slot, toasts
/// collected per request.
pub type ServerCartStore = CartStore<CatalogClient, FileStore, ToastQueue>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart store sits behind an
/// async mutex held for a whole operation, so cart requests run one at a
/// time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: Mutex<ServerCartStore>,
    toasts: ToastQueue,
}

impl AppState {
    /// Create a new application state, restoring the cart from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let persistence = CartPersistence::new(FileStore::new(&config.storage_dir));
        let toasts = ToastQueue::new();
        let store = CartStore::open(catalog, persistence, toasts.clone());

        Ok(Self::from_parts(config, store, toasts))
    }

    /// Assemble state from an already opened store.
    ///
    /// `toasts` must be the queue the store notifies.
    #[must_use]
    pub fn from_parts(config: StorefrontConfig, store: ServerCartStore, toasts: ToastQueue) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart: Mutex::new(store),
                toasts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the cart store for one operation.
    pub async fn cart(&self) -> MutexGuard<'_, ServerCartStore> {
        self.inner.cart.lock().await
    }

    /// Toasts raised by the cart store.
    ///
    /// Drain while holding the cart lock so toasts belong to this request.
    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.inner.toasts
    }
}
