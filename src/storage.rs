//! Persistent scoped storage for the saved renderer preference.
//!
//! The gate only ever deletes one key; nothing is read back. Stores are
//! object-safe so the embedder can plug in whatever its scoped storage
//! actually is.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::GateError;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Delete `key` if present. An absent key is a successful no-op.
    async fn remove(&self, key: &str) -> Result<(), GateError>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemorySettingsStore {
    data: tokio::sync::RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, e.g. a previously saved preference.
    pub async fn insert(&self, key: &str, value: &str) {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.data.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn remove(&self, key: &str) -> Result<(), GateError> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key under a directory.
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GateError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| GateError::StorageDenied(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.settings.json", key))
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn remove(&self, key: &str) -> Result<(), GateError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GateError::StorageDenied(e.to_string())),
        }
    }
}

/// Store that refuses every access, for exercising the blocked-storage
/// path (storage can be disabled wholesale in the hosting environment).
#[derive(Default)]
pub struct DeniedSettingsStore;

impl DeniedSettingsStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SettingsStore for DeniedSettingsStore {
    async fn remove(&self, _key: &str) -> Result<(), GateError> {
        Err(GateError::StorageDenied("storage access disabled".to_string()))
    }
}
