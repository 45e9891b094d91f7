//! File-backed storage backend.
//!
//! The file holds a single JSON object mapping keys to string values:
//!
//! ```json
//! { "@RocketShoes:cart": "[{\"id\":1,...,\"amount\":2}]" }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{KeyValueStore, StorageError};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to one JSON file.
///
/// Writes go to a sibling temporary file, flushed to disk and then renamed
/// over the original, so a reader sees either the previous or the new
/// contents.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Use `path` as the backing file. It is created on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

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

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp).await?;
        file.write_all(&bytes).await?;
        // Contents must be durable before the rename publishes them
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp, self.path.as_path()).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        // Read-modify-write of the whole file must not interleave
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await?;

        tracing::debug!(path = %self.path.display(), key, "Storage slot written");
        Ok(())
    }
}
