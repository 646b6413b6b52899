//! API routes module

pub mod health;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use domain_products::{MongoProductRepository, ProductService, handlers};
use mongodb::Database;
use storage::BlobStore;

/// Routes served under the `/api` prefix
pub fn routes(db: &Database, blobs: Arc<dyn BlobStore>) -> Router {
    let repository = MongoProductRepository::new(db);
    let service = ProductService::new(repository);

    Router::new().nest("/products", handlers::router(service, blobs))
}
