//! Loading and saving annotation collections.
//!
//! The unit of persistence is the whole collection of one image, keyed by
//! [`ImageKey`](crate::model::ImageKey). [`AnnotationBackend`] is the async
//! contract the editor session talks to; [`KeyValueBackend`] implements it on
//! top of any string key-value store:
//!
//! - [`MemoryStore`]: in-process map, for tests and ephemeral sessions
//! - `FileStore`: one JSON file per image (native only)
//! - `LocalStorageStore`: browser `localStorage` (WASM only)
//!
//! [`AutoSaveTimer`] implements the debounce used for silent auto-saves.

mod auto_save;
mod backend;
#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;
mod memory;

pub use auto_save::AutoSaveTimer;
pub use backend::{AnnotationBackend, KeyValueBackend, KeyValueStore};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;
