//! Catalog products.
//!
//! A [`Product`] is the stored record. [`ProductInput`] is the loosely-typed
//! request body shared by create and update: every field is optional, and
//! what "optional" means differs per operation:
//!
//! - create requires title, description, code, price, stock and category to be
//!   present and truthy (non-empty strings, non-zero numbers)
//! - update merges whatever is present over the stored record and leaves the
//!   rest untouched

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::quantity::Quantity;

/// Errors raised while turning request input into a product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// One or more required fields were absent, empty or zero.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A catalog product as persisted in the products collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: Price,
    /// Availability flag. New products are available.
    pub status: bool,
    pub stock: Quantity,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

/// Validated fields for a product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: Price,
    pub stock: Quantity,
    pub category: String,
    pub thumbnails: Vec<String>,
}

/// Product fields as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<Price>,
    pub status: Option<bool>,
    pub stock: Option<Quantity>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

impl ProductInput {
    /// Validate the input as a new product.
    ///
    /// Empty strings and zero numbers count as missing, so a product priced at
    /// zero or with zero stock is rejected. `status` is ignored; new products
    /// are always created available.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::MissingFields` listing every missing field.
    pub fn into_new_product(self) -> Result<NewProduct, ProductError> {
        let mut missing = Vec::new();

        let title = present_text(self.title, "title", &mut missing);
        let description = present_text(self.description, "description", &mut missing);
        let code = present_text(self.code, "code", &mut missing);
        let price = self.price.filter(|p| !p.is_zero());
        if price.is_none() {
            missing.push("price");
        }
        let stock = self.stock.filter(|s| !s.is_zero());
        if stock.is_none() {
            missing.push("stock");
        }
        let category = present_text(self.category, "category", &mut missing);

        match (title, description, code, price, stock, category) {
            (Some(title), Some(description), Some(code), Some(price), Some(stock), Some(category))
                if missing.is_empty() =>
            {
                Ok(NewProduct {
                    title,
                    description,
                    code,
                    price,
                    stock,
                    category,
                    thumbnails: self.thumbnails.unwrap_or_default(),
                })
            }
            _ => Err(ProductError::MissingFields(missing)),
        }
    }
}

fn present_text(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty());
    if value.is_none() {
        missing.push(field);
    }
    value
}

impl Product {
    /// Build a stored product from validated input and an id.
    #[must_use]
    pub fn create(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            code: new.code,
            price: new.price,
            status: true,
            stock: new.stock,
            category: new.category,
            thumbnails: new.thumbnails,
        }
    }

    /// Merge supplied fields over this record.
    ///
    /// Fields absent from `input` keep their current value. The id never
    /// changes.
    pub fn apply(&mut self, input: ProductInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(code) = input.code {
            self.code = code;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(stock) = input.stock {
            self.stock = stock;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(thumbnails) = input.thumbnails {
            self.thumbnails = thumbnails;
        }
    }
}
