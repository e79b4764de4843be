//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (data directory)
//!
//! # Products (JSON)
//! GET    /api/products                      - Filtered, sorted, paginated listing
//! POST   /api/products                      - Create product
//! GET    /api/products/{pid}                - Product detail
//! PUT    /api/products/{pid}                - Merge fields into product
//! DELETE /api/products/{pid}                - Delete product
//!
//! # Carts (JSON)
//! GET    /api/carts/{cid}                   - Cart with populated products
//! PUT    /api/carts/{cid}                   - Replace cart products
//! DELETE /api/carts/{cid}                   - Delete cart
//! PUT    /api/carts/{cid}/products/{pid}    - Set line item quantity
//! DELETE /api/carts/{cid}/products/{pid}    - Remove line item
//!
//! # Pages (HTML)
//! GET  /products                            - Product listing page
//! ```

pub mod carts;
pub mod health;
pub mod pages;
pub mod products;

use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderMap, header},
    routing::get,
};
use serde::Serialize;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Header set by reverse proxies to report the client-facing scheme.
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// `{"message": "..."}` body for confirmations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the product API routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{pid}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart API routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{cid}",
            get(carts::show)
                .put(carts::replace_products)
                .delete(carts::delete),
        )
        .route(
            "/{cid}/products/{pid}",
            axum::routing::put(carts::set_quantity).delete(carts::remove_product),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .nest("/api/carts", cart_routes())
        .route("/products", get(pages::products))
}

/// Absolute URL of `path` as the client addressed this server.
///
/// The scheme comes from `X-Forwarded-Proto` (`http` unless it says `https`)
/// and the authority from the `Host` header, falling back to `fallback`.
///
/// # Errors
///
/// Returns `AppError::Internal` if no valid URL can be built.
pub fn request_url(headers: &HeaderMap, fallback: SocketAddr, path: &str) -> Result<Url, AppError> {
    let scheme = match headers
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    let from_host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|host| !host.is_empty())
        .and_then(|host| Url::parse(&format!("{scheme}://{host}{path}")).ok())
        .filter(|url| url.path() == path);

    match from_host {
        Some(url) => Ok(url),
        None => Url::parse(&format!("{scheme}://{fallback}{path}"))
            .map_err(|e| AppError::Internal(format!("cannot build request URL: {e}"))),
    }
}
