//! Global constants for the annotation editor

/// Default minimum width/height (natural pixels) a drawn rectangle must exceed.
pub const DEFAULT_MIN_ANNOTATION_SIZE: f64 = 10.0;

/// Default quiet period before a pending change set is auto-saved (milliseconds).
pub const DEFAULT_AUTO_SAVE_DELAY_MS: u64 = 3000;

/// Default prefix for per-image storage keys.
pub const DEFAULT_STORAGE_PREFIX: &str = "annotations";

/// Application name used for config directories and storage keys.
pub const APP_NAME: &str = "photo-annotate";
