// consent-widget/src/storage.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// クライアント側ストレージ（localStorage相当）の差し替え点
pub trait PreferenceStorage: Send + Sync {
    fn write(&self, key: &str, value: &str);
    fn read(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

/// テスト・非ブラウザホスト用のインメモリ実装
#[derive(Clone, Default)]
pub struct MemoryPreferenceStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPreferenceStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryPreferenceStorage {
    fn write(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// ストレージを持たないホスト用のno-op実装
#[derive(Clone, Copy, Default)]
pub struct NoopPreferenceStorage;

impl PreferenceStorage for NoopPreferenceStorage {
    fn write(&self, _key: &str, _value: &str) {}

    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn remove(&self, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryPreferenceStorage::new();

        storage.write("prefs", "{}");
        assert_eq!(storage.read("prefs").as_deref(), Some("{}"));

        storage.remove("prefs");
        assert!(storage.read("prefs").is_none());
    }

    #[test]
    fn test_noop_storage_reads_nothing() {
        let storage = NoopPreferenceStorage;
        storage.write("prefs", "{}");
        assert!(storage.read("prefs").is_none());
    }
}
