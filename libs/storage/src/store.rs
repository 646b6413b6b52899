use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::StorageResult;

/// Metadata for a stored file, returned to callers and echoed by the
/// upload endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Reference under the public prefix, e.g. `uploads/1724966400000img1.png`.
    /// Used to retrieve the file's bytes later and stored on products.
    pub reference: String,
    /// File name as supplied by the client
    pub original_name: String,
    /// Size in bytes
    pub size: u64,
}

/// Storage boundary for uploaded file bytes.
///
/// Implementations own the bytes independently of any entity referencing
/// them; nothing here tracks which products point at a stored file.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` and return the stored reference.
    ///
    /// No dedup, no content hashing, no size or type validation. A write
    /// failure surfaces as a storage error to the caller; there is no retry.
    async fn store(&self, bytes: &[u8], original_name: &str) -> StorageResult<StoredFile>;
}
