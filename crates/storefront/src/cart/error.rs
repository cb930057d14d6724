//! Failures of a single cart operation.

use rocketshoes_core::CartError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::notify::FailureKind;

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartOperationError {
    /// A cart rule rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The catalog could not be reached or answered with an error.
    #[error("Catalog request failed: {0}")]
    Network(#[source] CatalogError),
}

impl From<CatalogError> for CartOperationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::Cart(CartError::ProductNotFound(id)),
            other => Self::Network(other),
        }
    }
}

impl CartOperationError {
    /// Classify for the user-facing toast.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Cart(CartError::OutOfStock { .. }) => FailureKind::OutOfStock,
            Self::Cart(
                CartError::ProductNotFound(_)
                | CartError::DuplicateLineItem(_)
                | CartError::ZeroAmount(_),
            ) => FailureKind::ProductNotFound,
            Self::Network(_) => FailureKind::NetworkError,
        }
    }
}

#[cfg(test)]
mod tests {
    use rocketshoes_core::ProductId;

    use super::*;

    #[test]
    fn test_catalog_not_found_becomes_product_not_found() {
        let err = CartOperationError::from(CatalogError::NotFound(ProductId::new(8)));
        assert!(matches!(
            err,
            CartOperationError::Cart(CartError::ProductNotFound(id)) if id == ProductId::new(8)
        ));
        assert_eq!(err.kind(), FailureKind::ProductNotFound);
    }

    #[test]
    fn test_catalog_api_error_is_network() {
        let err = CartOperationError::from(CatalogError::Api {
            status: 500,
            message: String::new(),
        });
        assert_eq!(err.kind(), FailureKind::NetworkError);
    }

    #[test]
    fn test_out_of_stock_kind() {
        let err = CartOperationError::from(CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 3,
            available: 2,
        });
        assert_eq!(err.kind(), FailureKind::OutOfStock);
    }
}
