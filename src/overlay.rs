//! Overlay model for rendering annotations on top of the image.
//!
//! The overlay is a pure function of store, interaction state and viewport
//! geometry. Positions come from [`ViewportGeometry::to_screen_space`], the
//! same mapper used for pointer input. Visual details are delegated to an
//! [`OverlaySkin`], so layout variants share all of the logic.

use serde::{Deserialize, Serialize};

use crate::geometry::{ScreenRect, ViewportGeometry};
use crate::interaction::{Interaction, InteractionState};
use crate::model::{AnnotationId, Point};
use crate::store::AnnotationStore;

/// Kind of overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// A committed annotation.
    Annotation,
    /// The annotation whose label is being edited.
    Selected,
    /// The rectangle being drawn or awaiting its label.
    InProgress,
}

/// One element to draw. All positions are container-relative screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub kind: OverlayKind,
    pub id: Option<AnnotationId>,
    pub label: Option<String>,
    pub rect: ScreenRect,
    /// Where the label tag goes.
    pub label_anchor: Option<Point>,
    /// Where edit/delete controls go. Absent in view mode.
    pub controls_anchor: Option<Point>,
}

/// Presentational placement rules for overlay decorations.
pub trait OverlaySkin {
    /// Skin name, for settings.
    fn name(&self) -> &'static str;

    /// Anchor of the label tag for an annotation drawn at `rect`.
    fn label_anchor(&self, rect: &ScreenRect) -> Point;

    /// Anchor of the edit/delete controls for an annotation drawn at `rect`.
    fn controls_anchor(&self, rect: &ScreenRect) -> Point;
}

/// Label tag above the box, controls above its right edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSkin;

impl DefaultSkin {
    /// Height reserved above a box for its label tag.
    pub const LABEL_OFFSET: f64 = 25.0;
    /// Width of the edit/delete button group.
    pub const CONTROLS_WIDTH: f64 = 60.0;
}

impl OverlaySkin for DefaultSkin {
    fn name(&self) -> &'static str {
        "default"
    }

    fn label_anchor(&self, rect: &ScreenRect) -> Point {
        Point::new(rect.left, rect.top - Self::LABEL_OFFSET)
    }

    fn controls_anchor(&self, rect: &ScreenRect) -> Point {
        Point::new(
            rect.left + rect.width - Self::CONTROLS_WIDTH,
            rect.top - Self::LABEL_OFFSET,
        )
    }
}

/// Label and controls inside the box, for tight layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactSkin;

impl CompactSkin {
    pub const INSET: f64 = 4.0;
    pub const CONTROLS_WIDTH: f64 = 52.0;
}

impl OverlaySkin for CompactSkin {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn label_anchor(&self, rect: &ScreenRect) -> Point {
        Point::new(rect.left + Self::INSET, rect.top + Self::INSET)
    }

    fn controls_anchor(&self, rect: &ScreenRect) -> Point {
        Point::new(
            rect.left + rect.width - Self::CONTROLS_WIDTH - Self::INSET,
            rect.top + Self::INSET,
        )
    }
}

/// Selectable skins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinKind {
    #[default]
    Default,
    Compact,
}

impl SkinKind {
    pub fn skin(&self) -> &'static dyn OverlaySkin {
        match self {
            SkinKind::Default => &DefaultSkin,
            SkinKind::Compact => &CompactSkin,
        }
    }
}

/// Build the overlay for the current state.
///
/// Without geometry (image not loaded or failed) there is nothing to place
/// and the overlay is empty.
pub fn build_overlay(
    store: &AnnotationStore,
    interaction: &Interaction,
    geometry: Option<&ViewportGeometry>,
    skin: &dyn OverlaySkin,
) -> Vec<OverlayItem> {
    let Some(geometry) = geometry else {
        return Vec::new();
    };

    let editing = match interaction.state() {
        InteractionState::EditingLabel { id, .. } => Some(id),
        _ => None,
    };
    let editable = interaction.is_editable();

    let mut items: Vec<OverlayItem> = store
        .list()
        .iter()
        .map(|annotation| {
            let rect = geometry.to_screen_space(&annotation.bounds());
            let kind = if editing == Some(&annotation.id) {
                OverlayKind::Selected
            } else {
                OverlayKind::Annotation
            };
            OverlayItem {
                kind,
                id: Some(annotation.id.clone()),
                label: Some(annotation.label.clone()),
                rect,
                label_anchor: Some(skin.label_anchor(&rect)),
                controls_anchor: editable.then(|| skin.controls_anchor(&rect)),
            }
        })
        .collect();

    if let Some(preview) = interaction.preview() {
        items.push(OverlayItem {
            kind: OverlayKind::InProgress,
            id: None,
            label: None,
            rect: geometry.to_screen_space(&preview),
            label_anchor: None,
            controls_anchor: None,
        });
    }

    items
}
