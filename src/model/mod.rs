//! Data models for the annotation editor.

mod annotation;
mod image;

pub use annotation::{Annotation, AnnotationId, BoundingBox, Point, Size};
pub use image::{ImageKey, ImageRef};
