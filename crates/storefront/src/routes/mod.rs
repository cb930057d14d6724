//! HTTP route handlers for the storefront cart API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Health check
//!
//! # Cart (JSON)
//! GET    /cart                      - Current cart
//! DELETE /cart                      - Empty the cart
//! POST   /cart/items                - Add one unit ({"product_id": 1})
//! PATCH  /cart/items/{product_id}   - Set amount ({"amount": 3})
//! DELETE /cart/items/{product_id}   - Remove line
//! ```
//!
//! Cart routes always answer with the resulting cart. Failed operations show
//! up as `toasts` in the body, not as error statuses.

pub mod cart;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Cart routes, without state applied.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{product_id}",
            patch(cart::update).delete(cart::remove),
        )
}

/// Full application router with health check, fallback and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app(storage_dir: &std::path::Path) -> Router {
        let dir = storage_dir.display().to_string();
        let config = StorefrontConfig::from_vars(|key| {
            (key == "CART_STORAGE_DIR").then(|| dir.clone())
        })
        .unwrap();
        app(AppState::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_health_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let response = test_app(tmp.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(body.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let tmp = tempfile::tempdir().unwrap();
        let response = test_app(tmp.path())
            .oneshot(Request::builder().uri("/wishlist").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Not found: /wishlist");
    }

    #[tokio::test]
    async fn test_show_cart_restored_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let response = test_app(tmp.path())
            .oneshot(Request::builder().uri("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["item_count"], 0);
    }
}
