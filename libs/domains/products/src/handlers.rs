//! HTTP handlers for the Products API
//!
//! Create and update take `multipart/form-data`: text fields carry the
//! scalar attributes and each `images` part is an uploaded file, written
//! to the blob store before the product is persisted. Responses are JSON.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    AppError,
    errors::responses::{InternalServerErrorResponse, NotFoundResponse},
};
use serde::Serialize;
use storage::BlobStore;
use utoipa::{OpenApi, ToSchema};

use crate::error::ProductError;
use crate::models::{CreateProduct, MAX_IMAGES_PER_REQUEST, Product, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        toggle_favorite,
        delete_product,
    ),
    components(
        schemas(Product, ProductForm, ProductResponse),
        responses(NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Shared handler state: the service plus the blob store uploads go to.
pub struct ProductsState<R: ProductRepository> {
    service: ProductService<R>,
    blobs: Arc<dyn BlobStore>,
}

impl<R: ProductRepository> Clone for ProductsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            blobs: Arc::clone(&self.blobs),
        }
    }
}

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(
    service: ProductService<R>,
    blobs: Arc<dyn BlobStore>,
) -> Router {
    let state = ProductsState { service, blobs };

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/favorite", put(toggle_favorite))
        .with_state(state)
}

/// Multipart form shape for creating and updating products.
///
/// Only used for the OpenAPI schema; parsing happens field by field.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
struct ProductForm {
    sku: String,
    name: String,
    quantity: i64,
    description: String,
    /// Optional explicit featured image reference
    featured_image: Option<String>,
    /// Up to five image files
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<String>,
}

/// Response wrapper for product creation
#[derive(Serialize, ToSchema)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Default)]
struct ParsedForm {
    sku: Option<String>,
    name: Option<String>,
    quantity: Option<i64>,
    description: Option<String>,
    featured_image: Option<String>,
    images: Vec<String>,
}

/// Drain a multipart stream, writing every `images` file to the blob
/// store as it arrives. Files already stored when a later error occurs
/// are left behind; nothing deletes them.
async fn read_product_form(
    blobs: &dyn BlobStore,
    mut multipart: Multipart,
) -> Result<ParsedForm, AppError> {
    let mut form = ParsedForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                if form.images.len() >= MAX_IMAGES_PER_REQUEST {
                    return Err(ProductError::Validation(format!(
                        "At most {} images are allowed per request",
                        MAX_IMAGES_PER_REQUEST
                    ))
                    .into());
                }
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("Image field without a file name".to_string()))?;
                let bytes = field.bytes().await?;
                let stored = blobs
                    .store(&bytes, &file_name)
                    .await
                    .map_err(ProductError::Storage)?;
                form.images.push(stored.reference);
            }
            "sku" => form.sku = Some(field.text().await?),
            "name" => form.name = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "featuredImage" => {
                let value = field.text().await?;
                if !value.is_empty() {
                    form.featured_image = Some(value);
                }
            }
            "quantity" => {
                let raw = field.text().await?;
                let quantity = raw.parse::<i64>().map_err(|_| {
                    AppError::BadRequest(format!("Invalid quantity: '{}'", raw))
                })?;
                form.quantity = Some(quantity);
            }
            // Unknown fields are ignored, matching lenient form handling
            _ => {}
        }
    }

    Ok(form)
}

fn require(value: Option<String>, name: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", name)))
}

fn require_quantity(value: Option<i64>) -> Result<i64, AppError> {
    value.ok_or_else(|| AppError::BadRequest("Missing required field: quantity".to_string()))
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product from a multipart form
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 400, description = "Malformed form data"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_product_form(state.blobs.as_ref(), multipart).await?;

    let input = CreateProduct {
        sku: require(form.sku, "sku")?,
        name: require(form.name, "name")?,
        quantity: require_quantity(form.quantity)?,
        description: require(form.description, "description")?,
        images: form.images,
        featured_image: form.featured_image,
    };

    let product = state.service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = state.service.get_product(&id).await?;
    Ok(Json(product))
}

/// Update a product from a multipart form
///
/// Uploading new image files replaces the stored image set; a form
/// without files keeps the existing images.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, description = "Malformed form data"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>, AppError> {
    let form = read_product_form(state.blobs.as_ref(), multipart).await?;

    let images = if form.images.is_empty() {
        None
    } else {
        Some(form.images)
    };

    let input = UpdateProduct {
        sku: require(form.sku, "sku")?,
        name: require(form.name, "name")?,
        quantity: require_quantity(form.quantity)?,
        description: require(form.description, "description")?,
        images,
        featured_image: form.featured_image,
    };

    let product = state.service.update_product(&id, input).await?;
    Ok(Json(product))
}

/// Toggle the favorite flag on a product
#[utoipa::path(
    put,
    path = "/{id}/favorite",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Favorite flag toggled", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn toggle_favorite<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = state.service.toggle_favorite(&id).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted (or was already absent)"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(state): State<ProductsState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
