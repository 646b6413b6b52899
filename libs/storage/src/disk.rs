use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::{BlobStore, StorageConfig, StorageError, StorageResult, StoredFile};

/// Disk-backed blob store.
///
/// Files land under a fixed root directory with a name of the form
/// `<millis-timestamp><original-name>`, keeping the original extension.
/// Two stores of the same name within one millisecond collide; that risk
/// is accepted and not mitigated.
#[derive(Clone, Debug)]
pub struct DiskBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl DiskBlobStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
        }
    }

    /// The directory files are written to, for serving it statically.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn timestamp_millis() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }

    /// Strip any path components a client may have smuggled into the
    /// file name; only the final component is kept.
    fn sanitize(original_name: &str) -> StorageResult<String> {
        Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty() && n != "." && n != "..")
            .ok_or_else(|| StorageError::InvalidName(original_name.to_string()))
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn store(&self, bytes: &[u8], original_name: &str) -> StorageResult<StoredFile> {
        let name = Self::sanitize(original_name)?;
        let file_name = format!("{}{}", Self::timestamp_millis(), name);

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored uploaded file");

        Ok(StoredFile {
            reference: format!("{}/{}", self.public_prefix, file_name),
            original_name: original_name.to_string(),
            size: bytes.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> DiskBlobStore {
        DiskBlobStore::new(&StorageConfig::new(dir, "/uploads"))
    }

    #[tokio::test]
    async fn test_store_writes_bytes_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store.store(b"png bytes", "img1.png").await.unwrap();

        assert!(stored.reference.starts_with("uploads/"));
        assert!(stored.reference.ends_with("img1.png"));
        assert_eq!(stored.original_name, "img1.png");
        assert_eq!(stored.size, 9);

        let file_name = stored.reference.strip_prefix("uploads/").unwrap();
        let on_disk = tokio::fs::read(dir.path().join(file_name)).await.unwrap();
        assert_eq!(on_disk, b"png bytes");
    }

    #[tokio::test]
    async fn test_store_keeps_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store.store(b"x", "photo.jpeg").await.unwrap();
        assert!(stored.reference.ends_with(".jpeg"));
    }

    #[tokio::test]
    async fn test_store_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store.store(b"x", "../../etc/passwd").await.unwrap();
        assert!(stored.reference.ends_with("passwd"));
        assert!(!stored.reference.contains(".."));
        // Nothing escaped the root
        assert!(dir.path().join("..").join("passwd").metadata().is_err());
    }

    #[tokio::test]
    async fn test_store_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let result = store.store(b"x", "").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_references_are_distinct_for_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let a = store.store(b"a", "a.png").await.unwrap();
        let b = store.store(b"b", "b.png").await.unwrap();
        assert_ne!(a.reference, b.reference);
    }
}
