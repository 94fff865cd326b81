//! photo-annotate - rectangular annotation editor core
//!
//! A headless editor for drawing labelled rectangles on gallery photos.
//! Pointer positions are mapped through the letterboxed display box into
//! natural image pixels, annotations are kept per image and saved through a
//! pluggable backend with a debounced auto-save, and the overlay layer is
//! computed from the same geometry the pointer path uses.
//!
//! The entry point is [`EditorSession`]. Browser glue lives in the
//! `wasm32`-only `wasm` module.

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod host;
pub mod image_source;
pub mod interaction;
pub mod keybindings;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod persistence;
pub mod session;
pub mod store;

pub use config::{EditorConfig, LogLevel};
pub use error::{AnnotationError, StorageError};
pub use export::ExportDocument;
pub use geometry::{ScreenRect, ViewportGeometry};
pub use host::{ConfirmPrompt, Notification, NotificationLevel, NotificationSink};
pub use model::{Annotation, AnnotationId, BoundingBox, ImageKey, ImageRef, Point, Size};
pub use session::EditorSession;
pub use store::AnnotationStore;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
