//! Browser `localStorage` key-value store.

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Key-value store backed by `window.localStorage`.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Open the window's localStorage.
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::storage("No window object available"))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::storage(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| StorageError::storage("localStorage not available"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::storage(format!("Failed to read from localStorage: {:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::storage(format!("Failed to save to localStorage: {:?}", e)))
    }
}
