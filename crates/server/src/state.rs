//! Application state shared across handlers.

use std::sync::Arc;

use shelf_core::{Cart, Product};

use crate::config::ShelfConfig;
use crate::db::{CartRepository, Collection, Collections, ProductRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the collection handles. It holds no entity data: every
/// request reads the collection files afresh.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShelfConfig,
    collections: Collections,
}

impl AppState {
    /// Create a new application state for the configured data directory.
    #[must_use]
    pub fn new(config: ShelfConfig) -> Self {
        let collections = config.collections();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                collections,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ShelfConfig {
        &self.inner.config
    }

    /// Get the products collection.
    #[must_use]
    pub fn products(&self) -> &Collection<Product> {
        &self.inner.collections.products
    }

    /// Get the carts collection.
    #[must_use]
    pub fn carts(&self) -> &Collection<Cart> {
        &self.inner.collections.carts
    }

    /// Repository over the products collection.
    #[must_use]
    pub fn product_repository(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.products())
    }

    /// Repository over the carts collection.
    #[must_use]
    pub fn cart_repository(&self) -> CartRepository<'_> {
        CartRepository::new(self.carts(), self.products())
    }
}
