//! Product repository over the products collection.

use shelf_core::{Product, ProductId, ProductInput};

use super::{Collection, RepositoryError};

/// Repository for product operations.
pub struct ProductRepository<'a> {
    store: &'a Collection<Product>,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a Collection<Product>) -> Self {
        Self { store }
    }

    /// Get every product in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the collection cannot be loaded.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.store.load().await?)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ProductNotFound` if no product has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be loaded.
    pub async fn get(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::ProductNotFound)
    }

    /// Create a new product with a generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if required fields are missing.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn create(&self, input: ProductInput) -> Result<Product, RepositoryError> {
        let product = Product::create(ProductId::generate(), input.into_new_product()?);

        let created = product.clone();
        self.store
            .modify(move |products| {
                products.push(product);
                Ok::<_, RepositoryError>(())
            })
            .await?;

        tracing::info!(product_id = %created.id, code = %created.code, "Product created");
        Ok(created)
    }

    /// Merge supplied fields over an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ProductNotFound` if no product has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn update(
        &self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        let id = id.clone();
        let updated = self
            .store
            .modify(move |products| {
                let product = products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(RepositoryError::ProductNotFound)?;
                product.apply(input);
                Ok::<_, RepositoryError>(product.clone())
            })
            .await?;

        tracing::info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    /// Delete a product by its ID.
    ///
    /// Carts referencing the product are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ProductNotFound` if no product has this id.
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let target = id.clone();
        self.store
            .modify(move |products| {
                let index = products
                    .iter()
                    .position(|p| p.id == target)
                    .ok_or(RepositoryError::ProductNotFound)?;
                products.remove(index);
                Ok::<_, RepositoryError>(())
            })
            .await?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Append products as they are, keeping their ids.
    ///
    /// Returns the number of products added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the collection cannot be saved.
    pub async fn import(&self, incoming: Vec<Product>) -> Result<usize, RepositoryError> {
        self.store
            .modify(move |products| {
                let count = incoming.len();
                products.extend(incoming);
                Ok(count)
            })
            .await
    }
}
