//! File-backed key-value store.
//!
//! Each key maps to `<root>/<key>.json`. Writes go through a temporary file
//! in the same directory that is then renamed over the target, so a crash
//! mid-write never leaves a truncated slot behind.

use super::{validate_key, KeyValueStore, Result, StorageError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores each slot as a file under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.root).map_err(|e| Self::io_error(&self.root, e))?;

        let mut tmp =
            NamedTempFile::new_in(&self.root).map_err(|e| Self::io_error(&self.root, e))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(value.as_bytes())
            .map_err(|e| Self::io_error(&tmp_path, e))?;
        tmp.flush().map_err(|e| Self::io_error(&tmp_path, e))?;
        tmp.persist(&path)
            .map_err(|e| Self::io_error(&path, e.error))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    #[cfg(test)]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_slot_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("analysis_history").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("analysis_history", "[1,2,3]").unwrap();
        assert_eq!(
            store.get("analysis_history").unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert!(dir.path().join("nested/analysis_history.json").exists());

        store.set("analysis_history", "[]").unwrap();
        assert_eq!(store.get("analysis_history").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
