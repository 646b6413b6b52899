//! Blob storage for uploaded files.
//!
//! Provides a storage-agnostic [`BlobStore`] trait and a disk-backed
//! implementation. Stored files are addressed by a reference combining an
//! upload timestamp with the original file name; the storage root is meant
//! to be served read-only under a public path prefix so references are
//! directly retrievable URLs.

mod config;
mod disk;
mod error;
mod store;

pub use config::StorageConfig;
pub use disk::DiskBlobStore;
pub use error::{StorageError, StorageResult};
pub use store::{BlobStore, StoredFile};
