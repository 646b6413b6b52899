use thiserror::Error;

/// Error type for blob storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
