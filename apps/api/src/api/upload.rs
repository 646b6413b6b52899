//! Standalone file upload endpoint
//!
//! Accepts a single `file` part and writes it to the blob store. The
//! returned reference is what clients later retrieve under the public
//! uploads prefix.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use axum_helpers::AppError;
use serde_json::{Value, json};
use storage::BlobStore;

async fn upload(
    State(blobs): State<Arc<dyn BlobStore>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("File field without a file name".to_string()))?;
        let bytes = field.bytes().await?;

        let stored = blobs
            .store(&bytes, &file_name)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        return Ok(Json(json!({
            "message": "File uploaded successfully",
            "file": stored,
        })));
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

pub fn router(blobs: Arc<dyn BlobStore>) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .with_state(blobs)
}
