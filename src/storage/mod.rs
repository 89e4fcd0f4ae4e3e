//! Key-value persistence backends.
//!
//! The history store keeps its whole collection in a single slot addressed
//! by a fixed key. Backends only move opaque strings around; encoding is
//! the caller's business.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// The backend refused the write.
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A string-valued key-value slot store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Clear the slot. Clearing an empty slot is not an error.
    #[cfg(test)]
    fn remove(&self, key: &str) -> Result<()>;
}

/// Keys end up as file names, so only a conservative alphabet is allowed.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("analysis_history").is_ok());
        assert!(validate_key("history-v1.json").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("with space").is_err());
    }
}
