//! Error types for annotation editing and persistence.

use thiserror::Error;

use crate::model::AnnotationId;

/// Errors raised by a persistence backend or key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be parsed or serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage medium rejected the operation
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StorageError {
    /// Create a storage error with a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Errors produced by the annotation editor.
///
/// None of these are fatal: the session turns every one of them into a
/// notification and leaves the editor usable.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Label was empty after trimming
    #[error("Please provide a label for the annotation")]
    EmptyLabel,

    /// Rectangle does not exceed the minimum size on both axes
    #[error("Annotation {width}x{height} must be larger than {min_size} on both axes")]
    TooSmall {
        /// Width of the rejected rectangle
        width: f64,
        /// Height of the rejected rectangle
        height: f64,
        /// Configured minimum size
        min_size: f64,
    },

    /// Referenced annotation is not in the store
    #[error("Annotation not found: {0}")]
    NotFound(AnnotationId),

    /// Editor is in view mode
    #[error("Editor is read-only")]
    ReadOnly,

    /// Reading an image's annotations failed
    #[error("Failed to load annotations for '{key}': {source}")]
    Load {
        /// Storage key of the image
        key: String,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },

    /// Writing an image's annotations failed
    #[error("Failed to save annotations for '{key}': {source}")]
    Save {
        /// Storage key of the image
        key: String,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },
}

impl AnnotationError {
    /// Whether this error rejected user input (empty label or undersized shape).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyLabel | Self::TooSmall { .. })
    }
}
