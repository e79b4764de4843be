//! Shelf Core - Shared domain types.
//!
//! This crate provides the types used by every Shelf component:
//! - `server` - HTTP API and product page
//! - `cli` - Operator commands over the data files
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no file access,
//! no HTTP. Merging product updates, validating new products, mutating cart
//! line items and joining carts to products all live here so they can be
//! tested without a data directory.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids and prices, products, carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
