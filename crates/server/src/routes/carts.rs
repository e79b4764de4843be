//! Cart API route handlers.
//!
//! Carts are created out of band (see the CLI); the HTTP surface reads,
//! edits and deletes them.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shelf_core::{Cart, CartId, LineItem, PopulatedCart, ProductId, Quantity};
use tracing::instrument;

use super::MessageResponse;
use crate::error::Result;
use crate::state::AppState;

/// Body of `PUT /api/carts/{cid}`.
#[derive(Debug, Deserialize)]
pub struct ReplaceProductsBody {
    pub products: Vec<LineItem>,
}

/// Body of `PUT /api/carts/{cid}/products/{pid}`.
#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    pub quantity: Quantity,
}

/// Get a cart with every line item resolved to its product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> Result<Json<PopulatedCart>> {
    let cart = state
        .cart_repository()
        .get_populated(&CartId::new(cid))
        .await?;
    Ok(Json(cart))
}

/// Replace the cart's product list.
#[instrument(skip(state, body))]
pub async fn replace_products(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    Json(body): Json<ReplaceProductsBody>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart_repository()
        .replace_products(&CartId::new(cid), body.products)
        .await?;
    Ok(Json(cart))
}

/// Set the quantity of a product already in the cart.
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    Json(body): Json<QuantityBody>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart_repository()
        .set_quantity(&CartId::new(cid), &ProductId::new(pid), body.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a product from the cart.
#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    state
        .cart_repository()
        .remove_product(&CartId::new(cid), &ProductId::new(pid))
        .await?;
    Ok(Json(MessageResponse::new(
        "Product removed from cart successfully",
    )))
}

/// Delete a cart.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.cart_repository().delete(&CartId::new(cid)).await?;
    Ok(Json(MessageResponse::new("Cart deleted successfully")))
}
