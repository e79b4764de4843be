//! Persistence for the catalog and carts.
//!
//! # Collections
//!
//! State lives in two flat JSON files inside the data directory:
//!
//! - `products.json` - every [`Product`](shelf_core::Product)
//! - `carts.json` - every [`Cart`](shelf_core::Cart)
//!
//! Each file is owned by a [`Collection`]; the repositories in this module are
//! the only code that reads or writes them. Nothing is cached between calls:
//! every operation loads the whole file and every mutation rewrites it.

pub mod carts;
pub mod products;
pub mod store;

use std::path::Path;

use shelf_core::{Cart, Product, ProductError};
use thiserror::Error;

pub use carts::CartRepository;
pub use products::ProductRepository;
pub use store::{Collection, StoreError};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Collection file could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Request input failed validation.
    #[error("invalid product: {0}")]
    Validation(#[from] ProductError),

    /// No product with the requested id.
    #[error("product not found")]
    ProductNotFound,

    /// No cart with the requested id.
    #[error("cart not found")]
    CartNotFound,

    /// The cart exists but holds no line item for the requested product.
    #[error("product not found in cart")]
    LineItemNotFound,
}

/// Handles to both collections of a data directory.
#[derive(Debug, Clone)]
pub struct Collections {
    pub products: Collection<Product>,
    pub carts: Collection<Cart>,
}

impl Collections {
    /// Open the collections stored as `products_file` and `carts_file` in `data_dir`.
    #[must_use]
    pub fn open(data_dir: &Path, products_file: &str, carts_file: &str) -> Self {
        Self {
            products: Collection::new(data_dir.join(products_file)),
            carts: Collection::new(data_dir.join(carts_file)),
        }
    }
}
