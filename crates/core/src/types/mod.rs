//! Core types for Shelf.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use cart::{Cart, LineItem, PopulatedCart, PopulatedLineItem};
pub use id::*;
pub use price::Price;
pub use product::{NewProduct, Product, ProductError, ProductInput};
pub use quantity::Quantity;
