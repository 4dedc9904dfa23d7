//! JSON File Key-Value Store
//!
//! Keeps the whole map in one pretty-printed JSON object. Every write
//! replaces the file through a sibling temp file and a rename, so a crash
//! leaves either the old or the new contents on disk.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ports::{KeyValueStorePort, StoreError};

/// File-backed [`KeyValueStorePort`].
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileKeyValueStore {
    /// Open a store, creating it lazily on first write if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read, or
    /// `Serialization` if it is not a JSON object of strings.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = entries.len(), "Opened key-value store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), keys = entries.len(), "Key-value store written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if entries.get(key) == Some(&value) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.write_file(&updated).await?;
        *entries = updated;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(key);
        self.write_file(&updated).await?;
        *entries = updated;
        Ok(())
    }
}
