//! Integration tests for the products HTTP API
//!
//! Runs the router against the in-memory repository and a disk blob
//! store rooted in a temp directory, exercising the multipart endpoints
//! end to end.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use domain_products::{InMemoryProductRepository, ProductService, handlers};
use http_body_util::BodyExt;
use serde_json::Value;
use storage::{DiskBlobStore, StorageConfig};
use tower::ServiceExt;

const BOUNDARY: &str = "x-test-boundary";

fn app(upload_dir: &Path) -> Router {
    let service = ProductService::new(InMemoryProductRepository::new());
    let blobs = Arc::new(DiskBlobStore::new(&StorageConfig::new(
        upload_dir, "/uploads",
    )));
    handlers::router(service, blobs)
}

struct FormBuilder {
    body: Vec<u8>,
}

impl FormBuilder {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

fn base_form() -> FormBuilder {
    FormBuilder::new()
        .text("sku", "SKU-1")
        .text("name", "Widget")
        .text("quantity", "7")
        .text("description", "A widget")
}

fn form_request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_widget(app: &Router, files: &[(&str, &[u8])]) -> Value {
    let mut form = base_form();
    for (name, bytes) in files {
        form = form.file(name, bytes);
    }
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/", form.build()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_create_stores_files_and_returns_references() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let body = create_widget(&app, &[("img1.png", b"one"), ("img2.png", b"two")]).await;

    assert_eq!(body["message"], "Product created successfully");
    let product = &body["product"];
    assert_eq!(product["sku"], "SKU-1");
    assert_eq!(product["quantity"], 7);
    assert_eq!(product["isFavorite"], false);

    let images = product["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    for image in images {
        let reference = image.as_str().unwrap();
        assert!(reference.starts_with("uploads/"));
        let on_disk = dir.path().join(reference.strip_prefix("uploads/").unwrap());
        assert!(on_disk.exists());
    }

    // Featured image defaults to the first uploaded file
    assert_eq!(product["featuredImage"], images[0]);
}

#[tokio::test]
async fn test_create_with_explicit_featured_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let body = base_form()
        .text("featuredImage", "uploads/pinned.png")
        .file("img1.png", b"one")
        .build();
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["product"]["featuredImage"], "uploads/pinned.png");
}

#[tokio::test]
async fn test_create_without_images_omits_featured_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let body = create_widget(&app, &[]).await;
    let product = &body["product"];
    assert_eq!(product["images"].as_array().unwrap().len(), 0);
    assert!(product.get("featuredImage").is_none());
}

#[tokio::test]
async fn test_create_with_too_many_images_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let mut form = base_form();
    for i in 0..6 {
        form = form.file(&format!("img{i}.png"), b"x");
    }
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/", form.build()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_missing_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let body = FormBuilder::new().text("name", "Widget").build();
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_product_returns_404_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let id = mongodb::bson::oid::ObjectId::new().to_hex();
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, &format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_get_malformed_id_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/not-an-object-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_list_returns_created_products() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    create_widget(&app, &[]).await;
    create_widget(&app, &[]).await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_without_files_keeps_images() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let created = create_widget(&app, &[("img1.png", b"one")]).await;
    let id = created["product"]["_id"].as_str().unwrap();
    let original_images = created["product"]["images"].clone();

    let body = FormBuilder::new()
        .text("sku", "SKU-2")
        .text("name", "Gadget")
        .text("quantity", "3")
        .text("description", "Now a gadget")
        .build();
    let response = app
        .clone()
        .oneshot(form_request(Method::PUT, &format!("/{id}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let product = json_body(response).await;
    assert_eq!(product["name"], "Gadget");
    assert_eq!(product["quantity"], 3);
    assert_eq!(product["images"], original_images);
    assert_eq!(product["featuredImage"], original_images[0]);
}

#[tokio::test]
async fn test_update_with_files_replaces_image_set() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let created = create_widget(&app, &[("img1.png", b"one"), ("img2.png", b"two")]).await;
    let id = created["product"]["_id"].as_str().unwrap();

    let body = base_form().file("img3.png", b"three").build();
    let response = app
        .clone()
        .oneshot(form_request(Method::PUT, &format!("/{id}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let product = json_body(response).await;
    let images = product["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0].as_str().unwrap().ends_with("img3.png"));
    assert_eq!(product["featuredImage"], images[0]);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let id = mongodb::bson::oid::ObjectId::new().to_hex();
    let response = app
        .clone()
        .oneshot(form_request(Method::PUT, &format!("/{id}"), base_form().build()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_favorite_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let created = create_widget(&app, &[]).await;
    let id = created["product"]["_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(Method::PUT, &format!("/{id}/favorite")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["isFavorite"], true);

    let response = app
        .clone()
        .oneshot(empty_request(Method::PUT, &format!("/{id}/favorite")))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["isFavorite"], false);
}

#[tokio::test]
async fn test_delete_returns_204_and_removes_product() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let created = create_widget(&app, &[("img1.png", b"one")]).await;
    let id = created["product"]["_id"].as_str().unwrap().to_string();
    let reference = created["product"]["images"][0].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, &format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, &format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Stored files are not garbage collected with the product
    let on_disk = dir.path().join(reference.strip_prefix("uploads/").unwrap());
    assert!(on_disk.exists());
}

#[tokio::test]
async fn test_delete_missing_product_still_returns_204() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let id = mongodb::bson::oid::ObjectId::new().to_hex();
    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, &format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
