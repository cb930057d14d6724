//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed. The catalog is a `wiremock` server and
//! carts are persisted in temporary directories.
//!
//! # Test Categories
//!
//! - `cart_store` - Cart store against a mocked catalog and real file storage
//! - `cart_api` - JSON cart API through the full router

use std::path::Path;

use rocketshoes_storefront::config::StorefrontConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Catalog service double backed by a local mock HTTP server.
pub struct MockCatalog {
    server: MockServer,
}

impl MockCatalog {
    /// Start an empty catalog. Unknown resources answer 404.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Serve `GET /products/{id}`.
    pub async fn product(&self, id: i32, title: &str, price: f64) {
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.rocketshoes.test/{id}.jpg"),
            })))
            .mount(&self.server)
            .await;
    }

    /// Serve `GET /stock/{id}`.
    pub async fn stock(&self, id: i32, amount: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/stock/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "amount": amount,
            })))
            .mount(&self.server)
            .await;
    }

    /// Make every request fail with a server error.
    pub async fn outage(&self) {
        self.server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&self.server)
            .await;
    }
}

/// Configuration pointing at `catalog_uri` and persisting under `storage_dir`.
///
/// # Panics
///
/// Panics if the URI is not a valid catalog URL.
#[must_use]
pub fn config_for(catalog_uri: &str, storage_dir: &Path) -> StorefrontConfig {
    let storage_dir = storage_dir.display().to_string();
    match StorefrontConfig::from_vars(|key| match key {
        "CATALOG_API_URL" => Some(catalog_uri.to_string()),
        "CART_STORAGE_DIR" => Some(storage_dir.clone()),
        _ => None,
    }) {
        Ok(config) => config,
        Err(e) => panic!("invalid test configuration: {e}"),
    }
}
