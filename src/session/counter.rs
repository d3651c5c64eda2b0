//! Lifetime kill counter with pluggable persistence.
//!
//! The counter is the only cross-invocation mutable state in the engine.
//! It is read once at load, re-read before every write, and flushed after
//! every increment. A persistence failure degrades to the in-memory value
//! and a warning; it never fails the crush that triggered the increment.

use crate::base::error::CrushError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Well-known key the counter is persisted under.
pub const KILL_COUNT_KEY: &str = "kill_count";

/// Minimal persistent key-value store consumed by the kill counter.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, CrushError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), CrushError>;
}

/// Blanket implementation for Arc-wrapped stores.
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, CrushError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CrushError> {
        (**self).set(key, value)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CrushError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CrushError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file-backed store: one flat string-to-string object per file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, CrushError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| CrushError::persistence(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| CrushError::persistence(e.to_string()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CrushError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CrushError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&map)
            .map_err(|e| CrushError::persistence(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| CrushError::persistence(e.to_string()))
    }
}

/// Monotonically non-decreasing count of successfully crushed cookies,
/// surviving restarts.
pub struct KillCounter {
    store: Arc<dyn KeyValueStore>,
    current: Mutex<u64>,
}

impl KillCounter {
    /// Load the persisted value, starting at 0 on first use or when the
    /// store is unreadable.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = match read_persisted(&store) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "kill counter read failed, starting at 0");
                0
            }
        };
        Self {
            store,
            current: Mutex::new(initial),
        }
    }

    /// Current value as seen by this session.
    pub fn get(&self) -> u64 {
        *self.lock_current()
    }

    /// Add `by` kills and flush. The persisted value is re-read before the
    /// write so a retried or external read never double-counts; the result
    /// never regresses below the session-visible value. Returns the new
    /// value.
    pub fn increment(&self, by: u64) -> u64 {
        let mut current = self.lock_current();

        let base = match read_persisted(&self.store) {
            Ok(persisted) => persisted.max(*current),
            Err(e) => {
                tracing::warn!(error = %e, "kill counter re-read failed, using in-memory value");
                *current
            }
        };

        let next = base.saturating_add(by);
        if let Err(e) = self.store.set(KILL_COUNT_KEY, &next.to_string()) {
            tracing::warn!(error = %e, value = next, "kill counter write failed, keeping in-memory value");
        }
        *current = next;
        next
    }

    fn lock_current(&self) -> MutexGuard<'_, u64> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_persisted(store: &Arc<dyn KeyValueStore>) -> Result<u64, CrushError> {
    Ok(store
        .get(KILL_COUNT_KEY)?
        .and_then(|value| value.parse().ok())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = KillCounter::load(Arc::new(MemoryKeyValueStore::new()));
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_increment_flushes_to_store() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let counter = KillCounter::load(store.clone());

        assert_eq!(counter.increment(2), 2);
        assert_eq!(counter.increment(1), 3);
        assert_eq!(store.get(KILL_COUNT_KEY).unwrap(), Some("3".to_string()));
    }

    #[test]
    fn test_counter_survives_restart() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());

        let counter = KillCounter::load(store.clone());
        counter.increment(3);
        let before = counter.get();
        drop(counter);

        // Simulated restart: fresh read of the persisted store.
        let reloaded = KillCounter::load(store);
        assert_eq!(reloaded.get(), before);
        assert_eq!(reloaded.get(), 3);
    }

    #[test]
    fn test_increment_rereads_external_writes() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let counter = KillCounter::load(store.clone());

        // Another surface reported kills since we loaded.
        store.set(KILL_COUNT_KEY, "10").unwrap();

        assert_eq!(counter.increment(1), 11);
    }

    #[test]
    fn test_unparseable_persisted_value_resets_to_zero() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(KILL_COUNT_KEY, "not-a-number").unwrap();

        let counter = KillCounter::load(store);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counters.json");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(KILL_COUNT_KEY).unwrap(), None);

        store.set(KILL_COUNT_KEY, "42").unwrap();
        store.set("other", "x").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(KILL_COUNT_KEY).unwrap(), Some("42".to_string()));
        assert_eq!(reopened.get("other").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_counter_on_json_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counters.json");

        let counter = KillCounter::load(Arc::new(JsonFileStore::new(&path)));
        counter.increment(5);
        drop(counter);

        let reloaded = KillCounter::load(Arc::new(JsonFileStore::new(&path)));
        assert_eq!(reloaded.get(), 5);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CrushError> {
            Err(CrushError::persistence("backend offline"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CrushError> {
            Err(CrushError::persistence("backend offline"))
        }
    }

    #[test]
    fn test_persistence_failure_keeps_in_memory_value() {
        let counter = KillCounter::load(Arc::new(FailingStore));

        assert_eq!(counter.increment(2), 2);
        assert_eq!(counter.increment(3), 5);
        assert_eq!(counter.get(), 5);
    }
}
