//! Image identity as seen by the annotation editor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An image the editor can annotate.
///
/// The editor never owns pixel data; it only needs a stable identity for
/// storage and the URL for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Identifier within the gallery.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Displayable URL.
    pub url: String,
    /// Secondary identity of the pixel source (e.g. the seed a mock dataset
    /// used to pick the photo). Keeps keys distinct when datasets are
    /// regenerated with the same ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_seed: Option<String>,
}

impl ImageRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            source_seed: None,
        }
    }

    pub fn with_source_seed(mut self, seed: impl Into<String>) -> Self {
        self.source_seed = Some(seed.into());
        self
    }

    /// Storage key for this image's annotations.
    pub fn key(&self, prefix: &str) -> ImageKey {
        match &self.source_seed {
            Some(seed) => ImageKey(format!("{prefix}_{}_pic_{seed}", self.id)),
            None => ImageKey(format!("{prefix}_{}", self.id)),
        }
    }
}

/// Stable per-image storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
