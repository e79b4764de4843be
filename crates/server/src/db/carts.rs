//! Cart repository over the carts collection.
//!
//! Populating a cart reads the products collection once and joins every line
//! item against it in memory.

use std::collections::HashMap;

use shelf_core::{Cart, CartId, LineItem, PopulatedCart, Product, ProductId, Quantity};

use super::{Collection, RepositoryError};

/// Repository for cart operations.
pub struct CartRepository<'a> {
    store: &'a Collection<Cart>,
    products: &'a Collection<Product>,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    ///
    /// `products` is only read, to populate carts.
    #[must_use]
    pub const fn new(store: &'a Collection<Cart>, products: &'a Collection<Product>) -> Self {
        Self { store, products }
    }

    /// Get every cart in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the collection cannot be loaded.
    pub async fn list(&self) -> Result<Vec<Cart>, RepositoryError> {
        Ok(self.store.load().await?)
    }

    /// Get a cart by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be loaded.
    pub async fn get(&self, id: &CartId) -> Result<Cart, RepositoryError> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::CartNotFound)
    }

    /// Get a cart with every line item joined to its product.
    ///
    /// Line items keep their order. A line item whose product no longer
    /// exists carries no product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::Storage` if either collection cannot be loaded.
    pub async fn get_populated(&self, id: &CartId) -> Result<PopulatedCart, RepositoryError> {
        let cart = self.get(id).await?;
        let catalog: HashMap<ProductId, Product> = self
            .products
            .load()
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let populated = cart.populate(|product_id| catalog.get(product_id));

        let dangling = populated
            .products
            .iter()
            .filter(|item| item.product.is_none())
            .count();
        if dangling > 0 {
            tracing::debug!(cart_id = %id, dangling, "Cart references missing products");
        }

        Ok(populated)
    }

    /// Create a cart holding `products`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn create(&self, products: Vec<LineItem>) -> Result<Cart, RepositoryError> {
        let cart = Cart {
            products,
            ..Cart::new()
        };

        let created = cart.clone();
        self.store
            .modify(move |carts| {
                carts.push(cart);
                Ok::<_, RepositoryError>(())
            })
            .await?;

        tracing::info!(cart_id = %created.id, "Cart created");
        Ok(created)
    }

    /// Replace a cart's whole product list.
    ///
    /// Referenced product ids are not checked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn replace_products(
        &self,
        id: &CartId,
        products: Vec<LineItem>,
    ) -> Result<Cart, RepositoryError> {
        self.update_cart(id, move |cart| {
            cart.products = products;
            Ok(())
        })
        .await
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::LineItemNotFound` if the cart holds no such product.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn set_quantity(
        &self,
        id: &CartId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Cart, RepositoryError> {
        let product_id = product_id.clone();
        self.update_cart(id, move |cart| {
            if cart.set_quantity(&product_id, quantity) {
                Ok(())
            } else {
                Err(RepositoryError::LineItemNotFound)
            }
        })
        .await
    }

    /// Remove every line item for a product from the cart.
    ///
    /// Removing a product the cart does not hold is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn remove_product(
        &self,
        id: &CartId,
        product_id: &ProductId,
    ) -> Result<Cart, RepositoryError> {
        let product_id = product_id.clone();
        self.update_cart(id, move |cart| {
            cart.remove_product(&product_id);
            Ok(())
        })
        .await
    }

    /// Delete a cart by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CartNotFound` if no cart has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn delete(&self, id: &CartId) -> Result<(), RepositoryError> {
        let target = id.clone();
        self.store
            .modify(move |carts| {
                let index = carts
                    .iter()
                    .position(|c| c.id == target)
                    .ok_or(RepositoryError::CartNotFound)?;
                carts.remove(index);
                Ok::<_, RepositoryError>(())
            })
            .await?;

        tracing::info!(cart_id = %id, "Cart deleted");
        Ok(())
    }

    async fn update_cart<F>(&self, id: &CartId, f: F) -> Result<Cart, RepositoryError>
    where
        F: FnOnce(&mut Cart) -> Result<(), RepositoryError> + Send + 'static,
    {
        let target = id.clone();
        let cart = self
            .store
            .modify(move |carts| {
                let cart = carts
                    .iter_mut()
                    .find(|c| c.id == target)
                    .ok_or(RepositoryError::CartNotFound)?;
                f(cart)?;
                Ok::<_, RepositoryError>(cart.clone())
            })
            .await?;

        tracing::info!(cart_id = %cart.id, items = cart.products.len(), "Cart updated");
        Ok(cart)
    }
}
