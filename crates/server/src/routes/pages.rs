//! Server-rendered HTML pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use shelf_core::Product;

use super::request_url;
use crate::error::{AppError, INTERNAL_ERROR_MESSAGE};
use crate::filters;
use crate::listing::{ListingQuery, list_products, page_link};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub title: String,
    pub price: String,
    pub category: String,
    pub available: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            title: product.title,
            price: product.price.to_string(),
            category: product.category,
            available: product.status,
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

/// Display the product listing page.
///
/// Accepts the same parameters as `GET /api/products`. Any failure renders a
/// plain-text 500.
pub async fn products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Response {
    match render_products(&state, &headers, &query).await {
        Ok(template) => template.into_response(),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Product page failed");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
        }
    }
}

async fn render_products(
    state: &AppState,
    headers: &HeaderMap,
    query: &ListingQuery,
) -> Result<ProductsIndexTemplate, AppError> {
    let products = state.product_repository().list().await?;
    let page = list_products(products, query);
    let base = request_url(headers, state.config().socket_addr(), "/products")?;

    Ok(ProductsIndexTemplate {
        current_page: page.page,
        total_pages: page.total_pages,
        prev_link: page.prev_page().map(|n| page_link(&base, query, n)),
        next_link: page.next_page().map(|n| page_link(&base, query, n)),
        products: page.items.into_iter().map(ProductView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shelf_core::{Price, ProductId, Quantity};

    use super::*;

    #[test]
    fn test_template_renders_products_and_links() {
        let product = Product {
            id: ProductId::new("p1"),
            title: "Red <Shirt>".to_string(),
            description: "d".to_string(),
            code: "c1".to_string(),
            price: Price::from_cents(1250),
            status: false,
            stock: Quantity::default(),
            category: "Clothes".to_string(),
            thumbnails: Vec::new(),
        };

        let html = ProductsIndexTemplate {
            products: vec![product.into()],
            current_page: 2,
            total_pages: 3,
            prev_link: Some("http://host/products?limit=1&page=1".to_string()),
            next_link: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("Red &#60;Shirt&#62;") || html.contains("Red &lt;Shirt&gt;"));
        assert!(html.contains("$12.50"));
        assert!(html.contains("Clothes"));
        assert!(html.contains("Unavailable"));
        assert!(html.contains("page=1"));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn test_template_renders_empty_catalog() {
        let html = ProductsIndexTemplate {
            products: Vec::new(),
            current_page: 1,
            total_pages: 0,
            prev_link: None,
            next_link: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("No products found"));
    }
}
