//! In-memory key-value store for tests and throwaway sessions.

use super::{KeyValueStore, Result, StorageError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Process-local store. Clones share the same slots, which lets a test hand
/// one clone to a store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    slots: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `value` already sitting in `key`.
    #[cfg(test)]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.slots().insert(key.to_string(), value.to_string());
        store
    }

    /// Make every subsequent `set` fail until switched off again.
    #[cfg(test)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                reason: "writes disabled".to_string(),
            });
        }
        self.slots().insert(key.to_string(), value.to_string());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    #[cfg(test)]
    fn remove(&self, key: &str) -> Result<()> {
        self.slots().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slots() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.write_count(), 1);
    }

    #[test]
    fn test_failing_writes() {
        let store = MemoryStore::with_value("k", "old");
        store.set_fail_writes(true);
        assert!(store.set("k", "new").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));

        store.set_fail_writes(false);
        store.set("k", "new").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_clears_slot() {
        let store = MemoryStore::with_value("k", "v");
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
