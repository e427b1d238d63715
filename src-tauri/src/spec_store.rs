//! Durable storage for the most recently uploaded specification.
//!
//! The uploaded spec is the only state that survives a restart. It is read
//! and written through [`SpecStore`] instead of ad-hoc key access so that
//! every page goes through the same read / write / clear operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tauri::Runtime;
use tracing::{info, warn};

use crate::api::UploadResult;
use crate::error::RtlForgeError;

/// Store file holding session data.
pub const SESSION_STORE: &str = "session.json";
/// Key under which the serialized [`UploadResult`] is kept.
pub const SPEC_DATA_KEY: &str = "specData";

/// Minimal key/value surface shared by the Tauri plugin store and the
/// in-memory store used in tests.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn set(&self, key: &str, value: serde_json::Value);
    /// Returns whether the key existed.
    fn delete(&self, key: &str) -> bool;
    /// Flush pending changes to disk.
    fn save(&self) -> Result<(), RtlForgeError>;
}

impl<R: Runtime> KeyValueStore for Arc<tauri_plugin_store::Store<R>> {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        tauri_plugin_store::Store::get(self, key)
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        tauri_plugin_store::Store::set(self, key, value)
    }

    fn delete(&self, key: &str) -> bool {
        tauri_plugin_store::Store::delete(self, key)
    }

    fn save(&self) -> Result<(), RtlForgeError> {
        tauri_plugin_store::Store::save(self).map_err(|e| RtlForgeError::Store(e.to_string()))
    }
}

/// Process-local store. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    fn save(&self) -> Result<(), RtlForgeError> {
        Ok(())
    }
}

/// Read / write / clear access to the stored specification.
pub struct SpecStore<K> {
    kv: K,
}

impl<K: KeyValueStore> SpecStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// The stored spec, or `None` if nothing was uploaded.
    ///
    /// A value that no longer decodes is treated as absent.
    pub fn read(&self) -> Option<UploadResult> {
        let value = self.kv.get(SPEC_DATA_KEY)?;
        match serde_json::from_value(value) {
            Ok(spec) => Some(spec),
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", SPEC_DATA_KEY, e);
                None
            }
        }
    }

    /// Replace the stored spec wholesale and persist it.
    pub fn write(&self, spec: &UploadResult) -> Result<(), RtlForgeError> {
        let value = serde_json::to_value(spec)
            .map_err(|e| RtlForgeError::Store(format!("Failed to serialize spec: {}", e)))?;
        self.kv.set(SPEC_DATA_KEY, value);
        self.kv.save()?;
        info!("Stored specification '{}'", spec.filename);
        Ok(())
    }

    /// Remove the stored spec. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, RtlForgeError> {
        let existed = self.kv.delete(SPEC_DATA_KEY);
        self.kv.save()?;
        info!("Cleared stored specification (existed: {})", existed);
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ParsedSpec;

    fn sample(filename: &str) -> UploadResult {
        UploadResult {
            filename: filename.to_string(),
            parsed_data: ParsedSpec {
                interfaces: vec!["APB".to_string()],
                raw_text: "An APB timer".to_string(),
                ..ParsedSpec::default()
            },
        }
    }

    #[test]
    fn test_empty_store_reads_none() {
        let store = SpecStore::new(MemoryStore::new());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let store = SpecStore::new(MemoryStore::new());
        store.write(&sample("timer.md")).unwrap();
        assert_eq!(store.read(), Some(sample("timer.md")));
    }

    #[test]
    fn test_later_write_supersedes() {
        let store = SpecStore::new(MemoryStore::new());
        store.write(&sample("first.txt")).unwrap();
        store.write(&sample("second.txt")).unwrap();
        assert_eq!(store.read().unwrap().filename, "second.txt");
    }

    #[test]
    fn test_clear() {
        let store = SpecStore::new(MemoryStore::new());
        assert!(!store.clear().unwrap());
        store.write(&sample("spec.txt")).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let kv = MemoryStore::new();
        kv.set(SPEC_DATA_KEY, serde_json::json!({"filename": 42}));
        let store = SpecStore::new(kv);
        assert!(store.read().is_none());
    }
}
