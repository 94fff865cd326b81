//! Pointer-driven drawing and label editing state machine.
//!
//! ```text
//! Idle --down--> Drawing --up (big enough)--> PendingLabel --submit--> Idle
//!                   |   --up (too small)----> Idle
//!                   +---leave---------------> Idle
//! Idle --down on shape / edit--> EditingLabel --submit/cancel--> Idle
//! ```
//!
//! Transitions are synchronous and only ever driven by the owning session.
//! Committing is left to the caller: [`Interaction::submit`] returns a
//! [`Commit`] describing what the store should do.

use crate::error::AnnotationError;
use crate::geometry::ViewportGeometry;
use crate::model::{AnnotationId, BoundingBox, Point};
use crate::store::AnnotationStore;

/// Current interaction state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Pointer button held, rectangle follows the pointer.
    Drawing { start: Point, current: Point },
    /// Rectangle finished, waiting for a label.
    PendingLabel { rect: BoundingBox, label: String },
    /// Label editor open for an existing annotation.
    EditingLabel { id: AnnotationId, label: String },
}

/// Store mutation requested by a submitted label editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Create { rect: BoundingBox, label: String },
    Update { id: AnnotationId, label: String },
}

/// Drawing and editing state for one canvas.
#[derive(Debug, Clone)]
pub struct Interaction {
    state: InteractionState,
    editable: bool,
    min_size: f64,
}

impl Interaction {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            editable: true,
            min_size,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Switch between annotate and view mode. Leaving annotate mode discards
    /// anything in progress.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.cancel();
        }
    }

    /// Whether the label editor (create or edit) is open.
    pub fn is_label_editor_open(&self) -> bool {
        matches!(
            self.state,
            InteractionState::PendingLabel { .. } | InteractionState::EditingLabel { .. }
        )
    }

    /// Rectangle being drawn or waiting for its label.
    pub fn preview(&self) -> Option<BoundingBox> {
        match &self.state {
            InteractionState::Drawing { start, current } => {
                Some(BoundingBox::from_corners(*start, *current))
            }
            InteractionState::PendingLabel { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// Pointer pressed. Starts a drawing on empty canvas, or opens the label
    /// editor when the pointer is on an existing annotation.
    pub fn pointer_down(
        &mut self,
        geometry: &ViewportGeometry,
        pointer: Point,
        store: &AnnotationStore,
    ) -> bool {
        if !self.editable || !self.is_idle() {
            return false;
        }

        let point = geometry.to_image_space(pointer);
        if let Some(hit) = store.hit_test(point) {
            self.state = InteractionState::EditingLabel {
                id: hit.id.clone(),
                label: hit.label.clone(),
            };
            return true;
        }

        self.state = InteractionState::Drawing {
            start: point,
            current: point,
        };
        true
    }

    /// Pointer moved. Updates the in-progress rectangle while drawing.
    pub fn pointer_move(&mut self, geometry: &ViewportGeometry, pointer: Point) -> bool {
        if let InteractionState::Drawing { current, .. } = &mut self.state {
            *current = geometry.to_image_space(pointer);
            true
        } else {
            false
        }
    }

    /// Pointer released. Keeps the rectangle only if it exceeds the minimum size.
    pub fn pointer_up(&mut self, geometry: &ViewportGeometry, pointer: Point) -> bool {
        let InteractionState::Drawing { start, .. } = self.state else {
            return false;
        };

        let rect = BoundingBox::from_corners(start, geometry.to_image_space(pointer));
        self.state = if rect.exceeds(self.min_size) {
            InteractionState::PendingLabel {
                rect,
                label: String::new(),
            }
        } else {
            log::trace!(
                "Interaction: discarded {:.1}x{:.1} rectangle",
                rect.width,
                rect.height
            );
            InteractionState::Idle
        };
        true
    }

    /// Pointer left the canvas. Abandons a drawing in progress.
    pub fn pointer_leave(&mut self) -> bool {
        if matches!(self.state, InteractionState::Drawing { .. }) {
            self.state = InteractionState::Idle;
            true
        } else {
            false
        }
    }

    /// Open the label editor for an existing annotation.
    pub fn begin_edit(&mut self, id: AnnotationId, label: &str) -> Result<(), AnnotationError> {
        if !self.editable {
            return Err(AnnotationError::ReadOnly);
        }
        if !self.is_idle() {
            log::debug!("Interaction: edit of {} ignored, editor busy", id);
            return Ok(());
        }
        self.state = InteractionState::EditingLabel {
            id,
            label: label.to_string(),
        };
        Ok(())
    }

    /// Current text of the open label editor.
    pub fn label(&self) -> Option<&str> {
        match &self.state {
            InteractionState::PendingLabel { label, .. }
            | InteractionState::EditingLabel { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Replace the text of the open label editor.
    pub fn set_label(&mut self, text: &str) {
        match &mut self.state {
            InteractionState::PendingLabel { label, .. }
            | InteractionState::EditingLabel { label, .. } => {
                *label = text.to_string();
            }
            _ => {}
        }
    }

    /// Submit the open label editor.
    ///
    /// An empty label keeps the editor open and returns `EmptyLabel`.
    /// Returns `Ok(None)` when no editor is open.
    pub fn submit(&mut self) -> Result<Option<Commit>, AnnotationError> {
        let Some(label) = self.label() else {
            return Ok(None);
        };
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }

        let commit = match std::mem::take(&mut self.state) {
            InteractionState::PendingLabel { rect, .. } => Commit::Create { rect, label },
            InteractionState::EditingLabel { id, .. } => Commit::Update { id, label },
            other => {
                self.state = other;
                return Ok(None);
            }
        };
        Ok(Some(commit))
    }

    /// Discard whatever is in progress. Returns true if anything was discarded.
    pub fn cancel(&mut self) -> bool {
        let was_busy = !self.is_idle();
        self.state = InteractionState::Idle;
        was_busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenRect;
    use crate::model::Size;

    /// 800x600 image shown 1:1 at the viewport origin.
    fn identity() -> ViewportGeometry {
        ViewportGeometry::new(
            ScreenRect::new(0.0, 0.0, 800.0, 600.0),
            Size::new(800.0, 600.0),
            Size::new(800.0, 600.0),
        )
        .unwrap()
    }

    fn draw(interaction: &mut Interaction, store: &AnnotationStore, from: (f64, f64), to: (f64, f64)) {
        let g = identity();
        interaction.pointer_down(&g, Point::new(from.0, from.1), store);
        interaction.pointer_move(&g, Point::new(to.0, to.1));
        interaction.pointer_up(&g, Point::new(to.0, to.1));
    }

    #[test]
    fn test_drag_produces_pending_label() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (300.0, 220.0), (50.0, 50.0));

        assert_eq!(
            interaction.state(),
            &InteractionState::PendingLabel {
                rect: BoundingBox::new(50.0, 50.0, 250.0, 170.0),
                label: String::new(),
            }
        );
        assert!(interaction.is_label_editor_open());
    }

    #[test]
    fn test_move_updates_preview() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        let g = identity();

        interaction.pointer_down(&g, Point::new(100.0, 100.0), &store);
        interaction.pointer_move(&g, Point::new(40.0, 160.0));
        assert_eq!(interaction.preview(), Some(BoundingBox::new(40.0, 100.0, 60.0, 60.0)));
    }

    #[test]
    fn test_small_drag_is_discarded() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (100.0, 100.0), (110.0, 300.0));

        assert!(interaction.is_idle());
        assert!(interaction.preview().is_none());
    }

    #[test]
    fn test_leave_abandons_drawing() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        let g = identity();

        interaction.pointer_down(&g, Point::new(100.0, 100.0), &store);
        interaction.pointer_move(&g, Point::new(300.0, 300.0));
        assert!(interaction.pointer_leave());
        assert!(interaction.is_idle());

        // A release after leaving does nothing
        assert!(!interaction.pointer_up(&g, Point::new(300.0, 300.0)));
    }

    #[test]
    fn test_submit_requires_label() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (0.0, 0.0), (100.0, 100.0));

        interaction.set_label("   ");
        assert!(matches!(interaction.submit(), Err(AnnotationError::EmptyLabel)));
        assert!(interaction.is_label_editor_open());

        interaction.set_label(" Car ");
        let commit = interaction.submit().unwrap();
        assert_eq!(
            commit,
            Some(Commit::Create {
                rect: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
                label: "Car".to_string(),
            })
        );
        assert!(interaction.is_idle());
    }

    #[test]
    fn test_cancel_discards_pending_rectangle() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (0.0, 0.0), (100.0, 100.0));

        assert!(interaction.cancel());
        assert!(interaction.is_idle());
        assert_eq!(interaction.submit().unwrap(), None);
    }

    #[test]
    fn test_click_on_existing_annotation_opens_editor() {
        let mut store = AnnotationStore::new(10.0);
        let ann = store.create(BoundingBox::new(10.0, 10.0, 100.0, 100.0), "Dog").unwrap();
        let mut interaction = Interaction::new(10.0);

        interaction.pointer_down(&identity(), Point::new(50.0, 50.0), &store);
        assert_eq!(
            interaction.state(),
            &InteractionState::EditingLabel {
                id: ann.id.clone(),
                label: "Dog".to_string(),
            }
        );

        interaction.set_label("Cat");
        assert_eq!(
            interaction.submit().unwrap(),
            Some(Commit::Update {
                id: ann.id,
                label: "Cat".to_string(),
            })
        );
    }

    #[test]
    fn test_read_only_blocks_everything() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        interaction.set_editable(false);

        assert!(!interaction.pointer_down(&identity(), Point::new(0.0, 0.0), &store));
        assert!(interaction.is_idle());
        assert!(matches!(
            interaction.begin_edit(AnnotationId::Numeric(1), "x"),
            Err(AnnotationError::ReadOnly)
        ));
    }

    #[test]
    fn test_view_mode_discards_open_editor() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (0.0, 0.0), (100.0, 100.0));

        interaction.set_editable(false);
        assert!(interaction.is_idle());
    }

    #[test]
    fn test_no_second_drawing_while_label_pending() {
        let store = AnnotationStore::new(10.0);
        let mut interaction = Interaction::new(10.0);
        draw(&mut interaction, &store, (0.0, 0.0), (100.0, 100.0));

        assert!(!interaction.pointer_down(&identity(), Point::new(200.0, 200.0), &store));
        assert!(interaction.is_label_editor_open());
    }
}
