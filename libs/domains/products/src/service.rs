//! Product service - business logic layer

use std::sync::Arc;

use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, MAX_IMAGES_PER_REQUEST, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        check_image_count(input.images.len())?;
        self.repository.create(input).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// List all products
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        if let Some(ref images) = input.images {
            check_image_count(images.len())?;
        }
        self.repository.update(id, input).await
    }

    /// Flip the favorite flag and return the product with its new state.
    ///
    /// Read-then-write; two concurrent toggles can land on the same value.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: &str) -> ProductResult<Product> {
        let product = self.get_product(id).await?;
        self.repository
            .set_favorite(id, !product.is_favorite)
            .await
    }

    /// Delete a product. Succeeds whether or not the product exists.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        self.repository.delete(id).await
    }
}

fn check_image_count(count: usize) -> ProductResult<()> {
    if count > MAX_IMAGES_PER_REQUEST {
        return Err(ProductError::Validation(format!(
            "At most {} images are allowed per request, got {}",
            MAX_IMAGES_PER_REQUEST, count
        )));
    }
    Ok(())
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
