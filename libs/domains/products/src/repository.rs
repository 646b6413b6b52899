use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// IDs are hex-encoded ObjectIds carried as strings; implementations
/// reject malformed IDs rather than treating them as absent.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// List all products
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Update an existing product (read-modify-write)
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product>;

    /// Set the favorite flag to an explicit value
    async fn set_favorite(&self, id: &str, is_favorite: bool) -> ProductResult<Product>;

    /// Delete a product by ID; deleting an absent product is not an error
    async fn delete(&self, id: &str) -> ProductResult<()>;
}

pub(crate) fn parse_id(id: &str) -> ProductResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ProductError::InvalidId(id.to_string()))
}

/// In-memory repository backed by a HashMap, for tests and local runs
/// without a database.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products
            .write()
            .await
            .insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        parse_id(id)?;
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        parse_id(id)?;
        let mut products = self.products.write().await;
        let product = products
            .get_mut(id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        product.apply_update(input);
        Ok(product.clone())
    }

    async fn set_favorite(&self, id: &str, is_favorite: bool) -> ProductResult<Product> {
        parse_id(id)?;
        let mut products = self.products.write().await;
        let product = products
            .get_mut(id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        product.is_favorite = is_favorite;
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> ProductResult<()> {
        parse_id(id)?;
        self.products.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> CreateProduct {
        CreateProduct {
            sku: format!("SKU-{name}"),
            name: name.to_string(),
            quantity: 1,
            description: String::new(),
            images: vec![],
            featured_image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(input("a")).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_invalid_not_absent() {
        let repo = InMemoryProductRepository::new();
        let result = repo.get_by_id("not-an-object-id").await;
        assert!(matches!(result, Err(ProductError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let id = ObjectId::new().to_hex();
        let result = repo.update(&id, UpdateProduct::default()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let repo = InMemoryProductRepository::new();
        let id = ObjectId::new().to_hex();
        assert!(repo.delete(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_favorite_persists() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(input("a")).await.unwrap();

        let updated = repo.set_favorite(&created.id, true).await.unwrap();
        assert!(updated.is_favorite);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(fetched.is_favorite);
    }
}
