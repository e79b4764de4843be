//! Shopping carts and their line items.
//!
//! A cart is an ordered multiset of product references. Nothing checks that a
//! referenced product exists; [`Cart::populate`] resolves references at read
//! time and yields `None` for dangling ones.

use serde::{Deserialize, Serialize};

use super::id::{CartId, ProductId};
use super::product::Product;
use super::quantity::Quantity;

/// A persisted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub products: Vec<LineItem>,
}

/// One entry in a cart: a product reference and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A cart whose line items carry the referenced product records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedCart {
    pub id: CartId,
    pub products: Vec<PopulatedLineItem>,
}

/// A line item joined to its product, if the product still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedLineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub product: Option<Product>,
}

impl Cart {
    /// Create an empty cart with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CartId::generate(),
            products: Vec::new(),
        }
    }

    /// Set the quantity of the first line item referencing `product_id`.
    ///
    /// Returns `false` if the cart has no such line item.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: Quantity) -> bool {
        match self
            .products
            .iter_mut()
            .find(|item| &item.product_id == product_id)
        {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line item referencing `product_id`.
    ///
    /// Returns the number of line items removed.
    pub fn remove_product(&mut self, product_id: &ProductId) -> usize {
        let before = self.products.len();
        self.products.retain(|item| &item.product_id != product_id);
        before - self.products.len()
    }

    /// Join each line item to its product, preserving line item order.
    pub fn populate<'a, F>(self, mut lookup: F) -> PopulatedCart
    where
        F: FnMut(&ProductId) -> Option<&'a Product>,
    {
        let products = self
            .products
            .into_iter()
            .map(|item| {
                let product = lookup(&item.product_id).cloned();
                PopulatedLineItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    product,
                }
            })
            .collect();

        PopulatedCart {
            id: self.id,
            products,
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
