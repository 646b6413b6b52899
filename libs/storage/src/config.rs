#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default};
use std::path::PathBuf;

/// Blob storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub root: PathBuf,
    /// Public URL prefix the root directory is served under
    pub public_prefix: String,
}

impl StorageConfig {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("uploads", "/uploads")
    }
}

/// Load StorageConfig from environment variables
///
/// Environment variables:
/// - `UPLOAD_DIR` (optional, default: "uploads") - storage root directory
/// - `UPLOAD_PUBLIC_PREFIX` (optional, default: "/uploads") - public URL prefix
#[cfg(feature = "config")]
impl FromEnv for StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let root = env_or_default("UPLOAD_DIR", "uploads");
        let public_prefix = env_or_default("UPLOAD_PUBLIC_PREFIX", "/uploads");

        Ok(Self::new(root, public_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.root, PathBuf::from("uploads"));
        assert_eq!(config.public_prefix, "/uploads");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_storage_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("UPLOAD_DIR", None::<&str>),
                ("UPLOAD_PUBLIC_PREFIX", None::<&str>),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.root, PathBuf::from("uploads"));
                assert_eq!(config.public_prefix, "/uploads");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_storage_config_from_env_custom() {
        temp_env::with_vars(
            [
                ("UPLOAD_DIR", Some("/var/data/files")),
                ("UPLOAD_PUBLIC_PREFIX", Some("/files")),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.root, PathBuf::from("/var/data/files"));
                assert_eq!(config.public_prefix, "/files");
            },
        );
    }
}
