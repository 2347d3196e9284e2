use crate::error::StorageError;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

pub const RESCUE_MODE_KEY: &str = "cyberdeck.rescueMode";
pub const RESCUE_STARTED_KEY: &str = "cyberdeck.rescueModeStartTime";
pub const HISTORY_KEY: &str = "cyberdeck.commandHistory";
pub const TERMINAL_OPEN_KEY: &str = "cyberdeck.terminalOpen";

/// Synchronous string key/value store. In the browser this is `localStorage`.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes a JSON value. Any failure is logged and reads as absent.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let decoded = storage.get(key).and_then(|raw| {
        raw.map(|json| serde_json::from_str(&json).map_err(StorageError::from))
            .transpose()
    });
    match decoded {
        Ok(value) => value,
        Err(e) => {
            warn!("storage: reading {} failed: {}", key, e);
            None
        }
    }
}

/// Encodes and writes a JSON value. Failures are logged and dropped.
pub fn save<T: Serialize + ?Sized>(storage: &mut dyn Storage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        warn!("storage: writing {} failed: {}", key, e);
    }
}

pub fn remove(storage: &mut dyn Storage, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!("storage: removing {} failed: {}", key, e);
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every access fails, like `localStorage` in a locked-down browser.
    pub fn unavailable() -> Self {
        MemoryStorage {
            items: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|s| s.as_str())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.items.get(key).cloned())
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.items.insert(key.into(), value.into());
        Ok(())
    }
    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.items.remove(key);
        Ok(())
    }
}

pub struct BrowserStorage {
    inner: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            warn!("storage: localStorage not available, state will not persist");
        }
        BrowserStorage { inner }
    }

    fn store(&self) -> Result<&web_sys::Storage, StorageError> {
        self.inner.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store()?
            .get_item(key)
            .map_err(|e| StorageError::Access(format!("{:?}", e)))
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store()?
            .set_item(key, value)
            .map_err(|e| StorageError::Access(format!("{:?}", e)))
    }
    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.store()?
            .remove_item(key)
            .map_err(|e| StorageError::Access(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        save(&mut storage, "k", &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(storage.raw("k"), Some(r#"["a","b"]"#));
        let back: Option<Vec<String>> = load(&storage, "k");
        assert_eq!(back, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_malformed_value_reads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "{not json").unwrap();
        let back: Option<bool> = load(&storage, "k");
        assert_eq!(back, None);
    }

    #[test]
    fn test_unavailable_storage_is_swallowed() {
        let mut storage = MemoryStorage::unavailable();
        save(&mut storage, "k", &true);
        remove(&mut storage, "k");
        let back: Option<bool> = load(&storage, "k");
        assert_eq!(back, None);
    }
}
