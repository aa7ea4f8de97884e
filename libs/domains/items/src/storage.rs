//! Photo storage.
//!
//! Photos are written once under a random key and never modified. The store
//! hands back the public URL the item record embeds; `/images/{key}` by
//! default, served by the API binary.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default upload cap: 5 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Binary store for item photos
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` unmodified under `key` and return its public URL
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError>;

    /// Remove a stored object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Recover the key from a URL this store produced
    fn key_from_url(&self, url: &str) -> Option<String>;
}

/// Builds a collision-resistant key: a random UUID plus the original extension.
///
/// The extension is whatever follows the last `.` of `filename`. Files
/// without one, or with an extension that is not short ASCII alphanumeric
/// text, get a bare key.
pub fn generate_key(filename: &str) -> String {
    let random = Uuid::new_v4();

    match filename.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!("{}.{}", random, ext)
        }
        _ => random.to_string(),
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

fn key_in(base: &str, url: &str) -> Option<String> {
    let key = url
        .strip_prefix(base.trim_end_matches('/'))?
        .strip_prefix('/')?;
    validate_key(key).ok().map(|_| key.to_string())
}

/// Image storage configuration
///
/// - `IMAGE_STORAGE_DIR` (default `./data/item-images`)
/// - `IMAGE_PUBLIC_BASE_URL` (default `/images`)
/// - `IMAGE_MAX_BYTES` (default 5 MiB)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageStoreConfig {
    pub dir: PathBuf,
    pub public_base_url: String,
    pub max_bytes: usize,
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data/item-images"),
            public_base_url: "/images".to_string(),
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl FromEnv for ImageStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_bytes = env_parse_or("IMAGE_MAX_BYTES", DEFAULT_MAX_IMAGE_BYTES)?;
        if max_bytes == 0 {
            return Err(ConfigError::ParseError {
                key: "IMAGE_MAX_BYTES".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            dir: PathBuf::from(env_or_default("IMAGE_STORAGE_DIR", "./data/item-images")),
            public_base_url: env_or_default("IMAGE_PUBLIC_BASE_URL", "/images"),
            max_bytes,
        })
    }
}

/// Stores photos as files in a local directory
#[derive(Clone, Debug)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_config(config: &ImageStoreConfig) -> Self {
        Self::new(config.dir.clone(), config.public_base_url.clone())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        validate_key(key)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(key), &bytes).await?;

        tracing::debug!(key, size = bytes.len(), "Stored image");
        Ok(public_url(&self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_in(&self.public_base_url, url)
    }
}

/// Keeps photos in memory; for tests and throwaway environments
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    public_base_url: String,
}

impl InMemoryImageStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::default(),
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        validate_key(key)?;
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(public_url(&self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_in(&self.public_base_url, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_keeps_extension_after_last_dot() {
        let key = generate_key("holiday.photo.JPG");
        assert!(key.ends_with(".JPG"));
        let (random, _) = key.rsplit_once('.').unwrap();
        assert!(Uuid::parse_str(random).is_ok());
    }

    #[test]
    fn test_key_without_extension() {
        for name in ["README", "trailing.", "", "weird.ex/t", "long.abcdefghijk"] {
            let key = generate_key(name);
            assert!(Uuid::parse_str(&key).is_ok(), "{name:?} produced {key}");
        }
    }

    #[test]
    fn test_keys_do_not_collide() {
        assert_ne!(generate_key("a.png"), generate_key("a.png"));
    }

    #[test]
    fn test_key_from_url_only_accepts_own_prefix() {
        let store = InMemoryImageStore::new("/images/");
        assert_eq!(store.key_from_url("/images/abc.png").as_deref(), Some("abc.png"));
        assert_eq!(store.key_from_url("/other/abc.png"), None);
        assert_eq!(store.key_from_url("/images/../etc/passwd"), None);
        assert_eq!(store.key_from_url(""), None);
    }

    #[tokio::test]
    async fn test_local_store_round_trips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("nested"), "/images");
        let bytes = vec![0u8, 255, 10, 13, 0, 42];

        let url = store.put("photo.png", bytes.clone()).await.unwrap();
        assert_eq!(url, "/images/photo.png");

        let written = tokio::fs::read(dir.path().join("nested/photo.png")).await.unwrap();
        assert_eq!(written, bytes);

        store.delete("photo.png").await.unwrap();
        // deleting again is fine
        store.delete("photo.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_store_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "/images");
        let err = store.put("../escape.png", vec![1]).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_local_store_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, b"x").await.unwrap();

        // root is a regular file, so the directory cannot be created
        let store = LocalImageStore::new(&blocker, "/images");
        let err = store.put("a.png", vec![1]).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars_unset(
            ["IMAGE_STORAGE_DIR", "IMAGE_PUBLIC_BASE_URL", "IMAGE_MAX_BYTES"],
            || {
                let config = ImageStoreConfig::from_env().unwrap();
                assert_eq!(config, ImageStoreConfig::default());
            },
        );
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("IMAGE_STORAGE_DIR", Some("/var/lib/lostfound")),
                ("IMAGE_PUBLIC_BASE_URL", Some("https://cdn.campus.edu/items")),
                ("IMAGE_MAX_BYTES", Some("1024")),
            ],
            || {
                let config = ImageStoreConfig::from_env().unwrap();
                assert_eq!(config.dir, PathBuf::from("/var/lib/lostfound"));
                assert_eq!(config.public_base_url, "https://cdn.campus.edu/items");
                assert_eq!(config.max_bytes, 1024);
            },
        );
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        temp_env::with_var("IMAGE_MAX_BYTES", Some("0"), || {
            assert!(ImageStoreConfig::from_env().is_err());
        });
    }
}
