//! Product API route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use shelf_core::{Product, ProductId, ProductInput};
use tracing::instrument;

use super::{MessageResponse, request_url};
use crate::error::Result;
use crate::listing::{ListingEnvelope, ListingQuery, list_products};
use crate::state::AppState;

/// List products with filtering, sorting and pagination.
#[instrument(skip(state, headers))]
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingEnvelope<Product>>> {
    let products = state.product_repository().list().await?;
    let page = list_products(products, &query);
    let base = request_url(&headers, state.config().socket_addr(), "/api/products")?;

    Ok(Json(ListingEnvelope::new(page, &query, &base)))
}

/// Get a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(pid): Path<String>) -> Result<Json<Product>> {
    let product = state.product_repository().get(&ProductId::new(pid)).await?;
    Ok(Json(product))
}

/// Create a product from a complete set of fields.
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.product_repository().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Merge the supplied fields into a product.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let product = state
        .product_repository()
        .update(&ProductId::new(pid), input)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<MessageResponse>> {
    state
        .product_repository()
        .delete(&ProductId::new(pid))
        .await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
