//! Key-value persistence for the cart slot.
//!
//! The cart is stored as one serialized string under one key. The seam has
//! the shape of browser local storage: `get` and a whole-value `set`.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process map, lost on exit
//! - [`FileStore`] - JSON object file, replaced atomically on every write

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing the slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string-to-string store where every `set` replaces the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
