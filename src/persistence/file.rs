//! Directory-backed key-value store for native builds.

use std::path::{Path, PathBuf};

use crate::constants::APP_NAME;
use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the user's data directory, e.g. `~/.local/share/photo-annotate`.
    pub fn default_dir() -> Option<PathBuf> {
        if let Some(data_dir) = dirs::data_dir() {
            Some(data_dir.join(APP_NAME))
        } else {
            dirs::home_dir().map(|home| home.join(".local").join("share").join(APP_NAME))
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for a key. Bytes outside `[A-Za-z0-9_-]` are written as `%XX`,
    /// so distinct keys never share a file and keys cannot escape `dir`.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("%{byte:02X}"));
            }
        }
        file_name.push_str(".json");
        self.dir.join(file_name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        log::trace!("Wrote {:?}", path);
        Ok(())
    }
}
