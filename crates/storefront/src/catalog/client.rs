//! HTTP catalog client.
//!
//! Uses `reqwest` for HTTP and caches products with `moka`. Product listings
//! are immutable once fetched, so they are served from cache until the TTL
//! expires. Stock levels change with every sale and are never cached.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, StockInfo};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Maximum number of products kept in memory.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Characters of an error body kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the remote catalog service.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| CatalogError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                products,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// GET `{base}/{resource}/{id}` and decode the body.
    ///
    /// A `404` or a JSON `null` body is reported as `NotFound`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = self
            .inner
            .base_url
            .join(&format!("{resource}/{id}"))
            .map_err(|e| CatalogError::Config(format!("Invalid request URL: {e}")))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                resource,
                product_id = %id,
                body = %body.chars().take(ERROR_BODY_PREVIEW * 2).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let parsed: Option<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                resource,
                product_id = %id,
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        parsed.ok_or(CatalogError::NotFound(id))
    }
}

impl Catalog for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.fetch("products", id).await?;

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        self.fetch("stock", id).await
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> CatalogClient {
        let config = CatalogConfig::new(Url::parse(&server.uri()).unwrap());
        CatalogClient::new(&config).unwrap()
    }

    fn sneaker_json(id: i32) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://cdn.example.com/sneaker.jpg"
        })
    }

    #[test]
    fn test_base_url_resolves_nested_paths() {
        let config = CatalogConfig::new(Url::parse("https://catalog.example.com/v1").unwrap());
        let client = CatalogClient::new(&config).unwrap();

        assert_eq!(client.base_url().as_str(), "https://catalog.example.com/v1/");
    }

    #[test]
    fn test_with_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://catalog.example.com/v1").unwrap());
        assert_eq!(url.as_str(), "https://catalog.example.com/v1/");
        assert_eq!(
            url.join("stock/3").unwrap().as_str(),
            "https://catalog.example.com/v1/stock/3"
        );

        let url = with_trailing_slash(Url::parse("http://localhost:3333").unwrap());
        assert_eq!(url.as_str(), "http://localhost:3333/");
    }

    #[tokio::test]
    async fn test_get_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sneaker_json(1)))
            .mount(&server)
            .await;

        let product = client_for(&server)
            .get_product(ProductId::new(1))
            .await
            .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(1799, 1));
    }

    #[tokio::test]
    async fn test_get_product_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sneaker_json(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.get_product(ProductId::new(1)).await.unwrap();
        let second = client.get_product(ProductId::new(1)).await.unwrap();

        assert_eq!(first, second);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_get_stock_is_never_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "amount": 5})))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let stock = client.get_stock(ProductId::new(2)).await.unwrap();
        assert_eq!(stock.amount, 5);
        client.get_stock(ProductId::new(2)).await.unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_product(ProductId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(99)));
    }

    #[tokio::test]
    async fn test_null_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_product(ProductId::new(4))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_stock(ProductId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 503, ref message } if message == "maintenance"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": 1"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_stock(ProductId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stock/1"))
            .and(header("Authorization", "Bearer tok_9f8e7d6c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "amount": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = CatalogConfig::new(Url::parse(&server.uri()).unwrap());
        config.api_token = Some(SecretString::from("tok_9f8e7d6c"));
        let client = CatalogClient::new(&config).unwrap();

        client.get_stock(ProductId::new(1)).await.unwrap();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let config = CatalogConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let client = CatalogClient::new(&config).unwrap();

        let err = client.get_stock(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
