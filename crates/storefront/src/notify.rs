//! User-facing failure notifications ("toasts").
//!
//! The cart store never returns errors to its caller. Each failure is turned
//! into a [`Notification`] and handed to a [`Notifier`]; the caller only sees
//! that the cart did not change.

use std::sync::{Arc, Mutex, PoisonError};

use rocketshoes_core::ProductId;
use serde::Serialize;

/// The cart operation a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    UpdateAmount,
}

impl CartOperation {
    /// Message shown for any failure other than running out of stock.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::UpdateAmount => "Error updating product quantity",
        }
    }
}

/// Why an operation failed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ProductNotFound,
    OutOfStock,
    NetworkError,
}

/// Message shown when a requested quantity exceeds stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub operation: CartOperation,
    pub kind: FailureKind,
    pub product_id: ProductId,
    pub message: String,
}

impl Notification {
    /// Build the toast for `kind` failing during `operation`.
    #[must_use]
    pub fn failure(operation: CartOperation, kind: FailureKind, product_id: ProductId) -> Self {
        let message = match kind {
            FailureKind::OutOfStock => OUT_OF_STOCK_MESSAGE,
            FailureKind::ProductNotFound | FailureKind::NetworkError => {
                operation.failure_message()
            }
        };
        Self {
            operation,
            kind,
            product_id,
            message: message.to_string(),
        }
    }
}

/// Receives toasts from the cart store.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Collects toasts until the driver drains them.
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    pending: Arc<Mutex<Vec<Notification>>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued toast, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
