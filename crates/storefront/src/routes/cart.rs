//! Cart route handlers.
//!
//! Every handler locks the cart store for the whole operation and drains the
//! toasts it raised before releasing the lock.

use axum::{
    Json,
    extract::{Path, State},
};
use rocketshoes_core::{Cart, CartLineItem, ProductId, format_price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::notify::Notification;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

/// Body of every cart response.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: CartView,
    pub toasts: Vec<Notification>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.subtotal()),
            item_count: cart.total_quantity(),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.product.id,
            title: line.product.title.clone(),
            image: line.product.image.clone(),
            amount: line.amount,
            price: format_price(line.product.price),
            line_price: format_price(line.line_total()),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update amount request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<ProductId>()
        .map_err(|_| AppError::BadRequest(format!("invalid product id: {raw}")))
}

fn respond(cart: &Cart, toasts: Vec<Notification>) -> Json<CartResponse> {
    Json(CartResponse {
        cart: CartView::from(cart),
        toasts,
    })
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartResponse> {
    let store = state.cart().await;
    respond(store.cart(), Vec::new())
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Json<CartResponse> {
    let mut store = state.cart().await;
    let cart = store.add_product(request.product_id).await;
    respond(cart, state.toasts().drain())
}

/// Set a line's amount.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = parse_product_id(&product_id)?;

    let mut store = state.cart().await;
    let cart = store
        .update_product_amount(product_id, request.amount)
        .await;
    Ok(respond(cart, state.toasts().drain()))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>> {
    let product_id = parse_product_id(&product_id)?;

    let mut store = state.cart().await;
    let cart = store.remove_product(product_id);
    Ok(respond(cart, state.toasts().drain()))
}

/// Empty the cart and its storage slot.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartResponse>> {
    let mut store = state.cart().await;
    let cart = store.clear()?;
    Ok(respond(cart, Vec::new()))
}
