//! Persistence backend traits.

use std::future::Future;

use crate::error::StorageError;
use crate::model::{Annotation, ImageKey};

/// Async load/save of one image's annotation collection.
///
/// Both calls may suspend. A missing entry is an empty collection, not an
/// error.
pub trait AnnotationBackend {
    /// Load the collection stored under `key`.
    fn load(&self, key: &ImageKey) -> impl Future<Output = Result<Vec<Annotation>, StorageError>>;

    /// Replace the collection stored under `key`.
    fn save(
        &mut self,
        key: &ImageKey,
        annotations: &[Annotation],
    ) -> impl Future<Output = Result<(), StorageError>>;
}

/// A string key-value store (localStorage, a directory of files, a map).
pub trait KeyValueStore {
    /// Read the value for a key. `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the value for a key.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// [`AnnotationBackend`] storing each collection as a JSON array.
#[derive(Debug, Clone, Default)]
pub struct KeyValueBackend<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> AnnotationBackend for KeyValueBackend<S> {
    async fn load(&self, key: &ImageKey) -> Result<Vec<Annotation>, StorageError> {
        match self.store.get(key.as_str())? {
            Some(json) => {
                let annotations: Vec<Annotation> = serde_json::from_str(&json)?;
                log::debug!("Loaded {} annotations from '{}'", annotations.len(), key);
                Ok(annotations)
            }
            None => {
                log::debug!("No annotations stored under '{}'", key);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&mut self, key: &ImageKey, annotations: &[Annotation]) -> Result<(), StorageError> {
        let json = serde_json::to_string(annotations)?;
        self.store.set(key.as_str(), &json)?;
        log::debug!("Saved {} annotations to '{}'", annotations.len(), key);
        Ok(())
    }
}
