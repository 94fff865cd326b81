//! In-memory annotation collection for the currently open image.

use chrono::{DateTime, Utc};

use crate::error::AnnotationError;
use crate::model::{Annotation, AnnotationId, BoundingBox, Point};

/// Ordered annotations of one image.
///
/// Insertion order is preserved and is the order used for persistence and
/// export. Every successful mutation sets the dirty flag and bumps the
/// revision; [`AnnotationStore::load`] resets the dirty flag.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    /// Rectangles must exceed this on both axes.
    min_size: f64,
    /// Last numeric id handed out or loaded.
    last_id: u64,
    /// Unsaved changes since the last load or save.
    dirty: bool,
    /// Incremented on every mutation, never reset.
    revision: u64,
}

impl AnnotationStore {
    pub fn new(min_size: f64) -> Self {
        Self {
            annotations: Vec::new(),
            min_size,
            last_id: 0,
            dirty: false,
            revision: 0,
        }
    }

    /// Minimum size threshold for new rectangles.
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the collection reached the backend.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mutation counter, used to detect edits made while a load was in flight.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Replace the collection with a loaded snapshot.
    pub fn load(&mut self, annotations: Vec<Annotation>) {
        let max_loaded = annotations
            .iter()
            .filter_map(|a| a.id.as_numeric())
            .max()
            .unwrap_or(0);
        self.last_id = self.last_id.max(max_loaded);
        self.annotations = annotations;
        self.dirty = false;
        log::debug!("Store: loaded {} annotations", self.annotations.len());
    }

    /// Drop all annotations and reset the dirty flag (editor switched images).
    pub fn reset(&mut self) {
        self.load(Vec::new());
    }

    /// Next monotonic id. Millisecond timestamps, bumped past any id already used.
    ///
    /// If loaded data already holds `u64::MAX`, numeric ids are exhausted and a
    /// text id unique within the store is used instead.
    fn next_id(&mut self, now: DateTime<Utc>) -> AnnotationId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let Some(next) = self.last_id.checked_add(1) else {
            log::warn!("Store: numeric ids exhausted, using a text id");
            let mut seq = self.annotations.len();
            loop {
                let candidate = AnnotationId::Text(format!("annotation-{millis}-{seq}"));
                if self.get(&candidate).is_none() {
                    return candidate;
                }
                seq += 1;
            }
        };
        let id = millis.max(next);
        self.last_id = id;
        AnnotationId::Numeric(id)
    }

    /// Create an annotation from a drawn rectangle.
    pub fn create(&mut self, rect: BoundingBox, label: &str) -> Result<Annotation, AnnotationError> {
        self.create_at(rect, label, Utc::now())
    }

    fn create_at(
        &mut self,
        rect: BoundingBox,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<Annotation, AnnotationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        if !rect.exceeds(self.min_size) {
            return Err(AnnotationError::TooSmall {
                width: rect.width,
                height: rect.height,
                min_size: self.min_size,
            });
        }

        let id = self.next_id(now);
        let annotation = Annotation::new(id, rect, label, now);
        log::debug!("Store: created annotation {} '{}'", annotation.id, annotation.label);
        self.annotations.push(annotation.clone());
        self.mark_dirty();
        Ok(annotation)
    }

    /// Replace an annotation's label. Geometry is fixed after creation.
    pub fn update(&mut self, id: &AnnotationId, label: &str) -> Result<Annotation, AnnotationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }

        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AnnotationError::NotFound(id.clone()))?;

        annotation.label = label.to_string();
        annotation.updated_at = Some(Utc::now());
        let updated = annotation.clone();

        log::debug!("Store: relabeled annotation {} to '{}'", id, updated.label);
        self.mark_dirty();
        Ok(updated)
    }

    /// Remove an annotation.
    pub fn delete(&mut self, id: &AnnotationId) -> Result<Annotation, AnnotationError> {
        let index = self
            .annotations
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| AnnotationError::NotFound(id.clone()))?;

        let removed = self.annotations.remove(index);
        log::debug!("Store: deleted annotation {}", id);
        self.mark_dirty();
        Ok(removed)
    }

    /// All annotations in insertion order.
    pub fn list(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    /// Topmost (most recently created) annotation containing an image-space point.
    pub fn hit_test(&self, point: Point) -> Option<&Annotation> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.bounds().contains(point))
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
