//! MongoDB repository implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::{ProductRepository, parse_id};

const COLLECTION_NAME: &str = "products";

/// Persisted shape of a product. Identical to [`Product`] except the ID
/// is a native ObjectId rather than its hex encoding.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    sku: String,
    name: String,
    quantity: i64,
    description: String,
    images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_image: Option<String>,
    #[serde(default)]
    is_favorite: bool,
}

impl ProductDocument {
    fn from_product(product: &Product) -> ProductResult<Self> {
        Ok(Self {
            id: parse_id(&product.id)?,
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity: product.quantity,
            description: product.description.clone(),
            images: product.images.clone(),
            featured_image: product.featured_image.clone(),
            is_favorite: product.is_favorite,
        })
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            sku: doc.sku,
            name: doc.name,
            quantity: doc.quantity,
            description: doc.description,
            images: doc.images,
            featured_image: doc.featured_image,
            is_favorite: doc.is_favorite,
        }
    }
}

/// MongoDB-backed implementation of [`ProductRepository`]
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        let document = ProductDocument::from_product(&product)?;
        self.collection.insert_one(&document).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let oid = parse_id(id)?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let documents: Vec<ProductDocument> =
            self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let oid = parse_id(id)?;

        // Read-modify-write: the image carry-over rule needs the stored
        // state, so a lost update between concurrent writers is accepted.
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        let mut product = Product::from(document);
        product.apply_update(input);

        let replacement = ProductDocument::from_product(&product)?;
        self.collection
            .replace_one(doc! { "_id": oid }, &replacement)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn set_favorite(&self, id: &str, is_favorite: bool) -> ProductResult<Product> {
        let oid = parse_id(id)?;
        let document = self
            .collection
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$set": { "isFavorite": is_favorite } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        Ok(Product::from(document))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<()> {
        let oid = parse_id(id)?;
        // Deleting an absent document is not an error; the outcome is the
        // same either way. Stored image files are never cleaned up here.
        self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(())
    }
}
