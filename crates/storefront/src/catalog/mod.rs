//! Remote product catalog access.
//!
//! # Architecture
//!
//! - The catalog service is the source of truth for products and stock levels
//! - [`Catalog`] is the seam the cart store depends on, so tests can swap in
//!   an in-memory catalog
//! - [`CatalogClient`] is the HTTP implementation (`reqwest`), caching
//!   products in memory via `moka`. Stock is always fetched fresh.
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/products/{id}  -> Product
//! GET {base}/stock/{id}     -> StockInfo
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::catalog::{Catalog, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! let stock = client.get_stock(product.id).await?;
//! ```

mod client;

pub use client::CatalogClient;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog has no such product or stock record.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client could not be built from configuration.
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

/// Read access to products and stock levels.
pub trait Catalog: Send + Sync {
    /// Fetch a product listing.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the current stock level for a product.
    fn get_stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockInfo, CatalogError>> + Send;
}
