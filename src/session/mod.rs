//! Editor session: one open image and everything needed to annotate it.
//!
//! The session owns the annotation store, the interaction state machine, the
//! current viewport geometry and the auto-save timer, and talks to the outside
//! world through three collaborators:
//!
//! - an [`AnnotationBackend`] for loading and saving
//! - a [`NotificationSink`] for user-facing feedback
//! - a [`ConfirmPrompt`] asked before deletes
//!
//! Time is passed in explicitly (`now`) wherever a mutation can schedule an
//! auto-save; the host calls [`EditorSession::tick`] from its frame or timer
//! loop to run due saves.
//!
//! ## Late loads
//!
//! Loading is split into [`EditorSession::begin_load`] and
//! [`EditorSession::finish_load`] so a host can keep feeding input while the
//! backend call is in flight. A load result is applied only if it belongs to
//! the image that is still open and the store has not been mutated since the
//! load began; otherwise it is dropped and the local edits win.
//!
//! Saving is split the same way with [`EditorSession::begin_save`] and
//! [`EditorSession::finish_save`]. Edits made while a save is in flight keep
//! the store dirty and reschedule the auto-save.


use chrono::Utc;
use web_time::Instant;

use crate::config::{EditorConfig, EditorPreferences};
use crate::error::{AnnotationError, StorageError};
use crate::export::ExportDocument;
use crate::geometry::{ScreenRect, ViewportGeometry};
use crate::host::{ConfirmPrompt, Notification, NotificationSink};
use crate::image_source::ImageStatus;
use crate::interaction::{Commit, Interaction, InteractionState};
use crate::keybindings::{EditorAction, KeyBindings, KeyEvent};
use crate::model::{Annotation, AnnotationId, ImageKey, ImageRef, Point, Size};
use crate::overlay::{OverlayItem, SkinKind, build_overlay};
use crate::persistence::{AnnotationBackend, AutoSaveTimer};
use crate::store::AnnotationStore;

/// Message shown by the confirmation prompt before a delete.
pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this annotation?";

pub(crate) mod messages {
    pub const CREATED: &str = "Annotation created successfully";
    pub const UPDATED: &str = "Annotation updated successfully";
    pub const DELETED: &str = "Annotation deleted successfully";
    pub const SAVED: &str = "Annotations saved successfully";
    pub const SAVE_FAILED: &str = "Failed to save annotations";
    pub const LOAD_FAILED: &str = "Failed to load annotations";
    pub const EXPORTED: &str = "Annotations exported successfully";
}

/// Handle for a load started with [`EditorSession::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    key: ImageKey,
    generation: u64,
    revision: u64,
}

impl LoadTicket {
    /// Storage key the host should load.
    pub fn key(&self) -> &ImageKey {
        &self.key
    }
}

/// Snapshot handed out by [`EditorSession::begin_save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    key: ImageKey,
    annotations: Vec<Annotation>,
    generation: u64,
    revision: u64,
    mode: SaveMode,
}

impl SaveTicket {
    /// Storage key the host should write.
    pub fn key(&self) -> &ImageKey {
        &self.key
    }

    /// Collection to write.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// How a persisted save was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    /// Explicit save, navigation or close. Always reports the outcome.
    Manual,
    /// Debounced save. Only failures are reported.
    Auto,
}

/// Annotation editor for one image at a time.
pub struct EditorSession<B, N, C> {
    backend: B,
    notifier: N,
    confirm: C,

    preferences: EditorPreferences,
    keybindings: KeyBindings,

    store: AnnotationStore,
    interaction: Interaction,
    auto_save: AutoSaveTimer,

    image: Option<ImageRef>,
    key: Option<ImageKey>,
    image_status: ImageStatus,
    container: Option<ScreenRect>,
    geometry: Option<ViewportGeometry>,

    /// Bumped whenever the open image changes; stale load results carry an
    /// older value.
    generation: u64,
}

impl<B, N, C> EditorSession<B, N, C>
where
    B: AnnotationBackend,
    N: NotificationSink,
    C: ConfirmPrompt,
{
    pub fn new(config: &EditorConfig, backend: B, notifier: N, confirm: C) -> Self {
        let preferences = config.preferences.clone();
        let mut auto_save = AutoSaveTimer::new().with_delay(preferences.auto_save_delay());
        auto_save.set_enabled(preferences.auto_save_enabled);

        Self {
            backend,
            notifier,
            confirm,
            store: AnnotationStore::new(preferences.min_annotation_size),
            interaction: Interaction::new(preferences.min_annotation_size),
            auto_save,
            keybindings: config.keybindings.clone(),
            preferences,
            image: None,
            key: None,
            image_status: ImageStatus::None,
            container: None,
            geometry: None,
            generation: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.store.list()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn image_key(&self) -> Option<&ImageKey> {
        self.key.as_ref()
    }

    pub fn image_status(&self) -> &ImageStatus {
        &self.image_status
    }

    /// Current viewport mapping. `None` until the image reports its natural
    /// size and a container is known.
    pub fn geometry(&self) -> Option<&ViewportGeometry> {
        self.geometry.as_ref()
    }

    pub fn auto_save(&self) -> &AutoSaveTimer {
        &self.auto_save
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn skin(&self) -> SkinKind {
        self.preferences.skin
    }

    pub fn set_skin(&mut self, skin: SkinKind) {
        self.preferences.skin = skin;
    }

    /// Whether there are edits the backend has not seen yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_editable(&self) -> bool {
        self.interaction.is_editable()
    }

    /// Switch between annotate mode and view mode.
    pub fn set_editable(&mut self, editable: bool) {
        log::debug!("Session: editable = {}", editable);
        self.interaction.set_editable(editable);
    }

    // ---------------------------------------------------------------------
    // Opening images
    // ---------------------------------------------------------------------

    /// Open an image and load its annotations.
    ///
    /// Pending changes of the previous image are not flushed; use
    /// [`EditorSession::navigate_to`] to switch images.
    pub async fn open(&mut self, image: ImageRef) {
        let ticket = self.begin_load(image);
        let result = self.backend.load(&ticket.key).await;
        self.finish_load(ticket, result);
    }

    /// Make `image` the open image with an empty store and return a ticket
    /// for loading its annotations.
    pub fn begin_load(&mut self, image: ImageRef) -> LoadTicket {
        let key = image.key(&self.preferences.storage_prefix);
        log::info!("Session: opening '{}' ({})", image.title, key);

        self.auto_save.cancel();
        self.interaction.cancel();
        self.store.reset();
        self.generation += 1;

        self.image = Some(image);
        self.key = Some(key.clone());
        self.image_status = ImageStatus::Loading;
        self.geometry = None;

        LoadTicket {
            key,
            generation: self.generation,
            revision: self.store.revision(),
        }
    }

    /// Apply the result of a load started with [`EditorSession::begin_load`].
    ///
    /// Returns true if the loaded annotations replaced the store.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Annotation>, StorageError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Session: dropping load of '{}', image changed", ticket.key);
            return false;
        }

        match result {
            Ok(annotations) => {
                if self.store.revision() != ticket.revision {
                    log::debug!(
                        "Session: dropping load of '{}' ({} annotations), local edits present",
                        ticket.key,
                        annotations.len()
                    );
                    return false;
                }
                self.store.load(annotations);
                log::info!(
                    "Session: loaded {} annotations for '{}'",
                    self.store.len(),
                    ticket.key
                );
                true
            }
            Err(source) => {
                self.report(AnnotationError::Load {
                    key: ticket.key.to_string(),
                    source,
                });
                false
            }
        }
    }

    /// The host finished loading the image and knows its natural size.
    pub fn on_image_loaded(&mut self, natural: Size, container: ScreenRect) {
        if !natural.is_positive() {
            self.on_image_failed(format!(
                "invalid natural size {}x{}",
                natural.width, natural.height
            ));
            return;
        }
        log::debug!(
            "Session: image ready, natural size {}x{}",
            natural.width,
            natural.height
        );
        self.image_status = ImageStatus::Ready(natural);
        self.resize(container);
    }

    /// The host could not display the image. The editor falls back to a
    /// placeholder: pointer input is ignored and the overlay is empty.
    pub fn on_image_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Session: image failed to load: {}", reason);
        self.image_status = ImageStatus::Failed(reason);
        self.geometry = None;
        self.interaction.cancel();
    }

    /// Probe an image file's dimensions and report it loaded or failed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_image_file(&mut self, path: &std::path::Path, container: ScreenRect) {
        match crate::image_source::probe_dimensions(path) {
            Ok(natural) => self.on_image_loaded(natural, container),
            Err(e) => self.on_image_failed(format!("{}: {}", path.display(), e)),
        }
    }

    /// Container was resized. Recomputes the display box.
    pub fn resize(&mut self, container: ScreenRect) {
        self.container = Some(container);
        self.geometry = self
            .image_status
            .natural_size()
            .and_then(|natural| ViewportGeometry::contain(container, natural));

        if let Some(geometry) = &self.geometry {
            let display = geometry.display();
            log::trace!(
                "Session: display box {:.1}x{:.1} in {:.1}x{:.1}",
                display.width,
                display.height,
                container.width,
                container.height
            );
        }
    }

    // ---------------------------------------------------------------------
    // Pointer input
    // ---------------------------------------------------------------------

    /// Pointer pressed at a viewport position.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        self.interaction.pointer_down(&geometry, pointer, &self.store)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        self.interaction.pointer_move(&geometry, pointer)
    }

    pub fn pointer_up(&mut self, pointer: Point) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        self.interaction.pointer_up(&geometry, pointer)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.interaction.pointer_leave()
    }

    // ---------------------------------------------------------------------
    // Label editor
    // ---------------------------------------------------------------------

    /// Text of the open label editor.
    pub fn label(&self) -> Option<&str> {
        self.interaction.label()
    }

    pub fn set_label(&mut self, text: &str) {
        self.interaction.set_label(text);
    }

    /// Open the label editor for an existing annotation. Returns false if
    /// another editor is already open.
    pub fn edit_annotation(&mut self, id: &AnnotationId) -> bool {
        let Some(annotation) = self.store.get(id) else {
            self.report(AnnotationError::NotFound(id.clone()));
            return false;
        };
        let label = annotation.label.clone();
        match self.interaction.begin_edit(id.clone(), &label) {
            Ok(()) => matches!(
                self.interaction.state(),
                InteractionState::EditingLabel { id: editing, .. } if editing == id
            ),
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    /// Commit the open label editor into the store.
    pub fn submit_label(&mut self, now: Instant) -> Option<Annotation> {
        let commit = match self.interaction.submit() {
            Ok(Some(commit)) => commit,
            Ok(None) => return None,
            Err(e) => {
                self.report(e);
                return None;
            }
        };

        let (result, message) = match commit {
            Commit::Create { rect, label } => (self.store.create(rect, &label), messages::CREATED),
            Commit::Update { id, label } => (self.store.update(&id, &label), messages::UPDATED),
        };

        match result {
            Ok(annotation) => {
                self.notifier.notify(Notification::success(message));
                self.after_mutation(now);
                Some(annotation)
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Close the label editor without committing.
    pub fn cancel_label(&mut self) -> bool {
        self.interaction.cancel()
    }

    /// Delete an annotation after the user confirms.
    pub fn request_delete(&mut self, id: &AnnotationId, now: Instant) -> Option<Annotation> {
        if !self.interaction.is_editable() {
            self.report(AnnotationError::ReadOnly);
            return None;
        }
        if self.store.get(id).is_none() {
            self.report(AnnotationError::NotFound(id.clone()));
            return None;
        }
        if !self.confirm.confirm(DELETE_CONFIRM_MESSAGE) {
            log::debug!("Session: delete of {} declined", id);
            return None;
        }

        match self.store.delete(id) {
            Ok(annotation) => {
                if matches!(
                    self.interaction.state(),
                    InteractionState::EditingLabel { id: editing, .. } if editing == id
                ) {
                    self.interaction.cancel();
                }
                self.notifier.notify(Notification::success(messages::DELETED));
                self.after_mutation(now);
                Some(annotation)
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Keyboard
    // ---------------------------------------------------------------------

    /// Handle a key press. Actions the session performs itself (label
    /// editor keys, save) are consumed; navigation and close are returned
    /// for the host to carry out.
    pub async fn handle_key(&mut self, event: KeyEvent, now: Instant) -> Option<EditorAction> {
        let action = self
            .keybindings
            .action_for(&event, self.interaction.is_label_editor_open())?;

        match action {
            EditorAction::SubmitLabel => {
                // Enter with an empty label does nothing; the button reports it.
                if self.label().is_some_and(|label| !label.trim().is_empty()) {
                    self.submit_label(now);
                }
                None
            }
            EditorAction::CancelLabel => {
                self.cancel_label();
                None
            }
            EditorAction::Save => {
                self.save().await;
                None
            }
            EditorAction::PreviousImage | EditorAction::NextImage | EditorAction::Close => {
                Some(action)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Saving
    // ---------------------------------------------------------------------

    /// Manual save: cancels the pending auto-save and always reports the outcome.
    pub async fn save(&mut self) -> bool {
        let Some(ticket) = self.begin_save() else {
            return false;
        };
        let result = self.backend.save(&ticket.key, &ticket.annotations).await;
        self.finish_save(ticket, result, Instant::now())
    }

    /// Run the auto-save if its quiet period has elapsed. Returns true if a
    /// save was attempted.
    pub async fn tick(&mut self, now: Instant) -> bool {
        let Some(ticket) = self.begin_auto_save(now) else {
            return false;
        };
        let result = self.backend.save(&ticket.key, &ticket.annotations).await;
        self.finish_save(ticket, result, now);
        true
    }

    /// Snapshot the open image's annotations for a manual save and cancel the
    /// pending auto-save. `None` when no image is open.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        self.auto_save.cancel();
        self.snapshot(SaveMode::Manual)
    }

    /// Snapshot for an auto-save, if one is due at `now` and there are
    /// unsaved changes.
    pub fn begin_auto_save(&mut self, now: Instant) -> Option<SaveTicket> {
        if !self.auto_save.take_due(now) || !self.store.is_dirty() {
            return None;
        }
        self.snapshot(SaveMode::Auto)
    }

    fn snapshot(&self, mode: SaveMode) -> Option<SaveTicket> {
        let Some(key) = self.key.clone() else {
            log::debug!("Session: nothing to save, no image open");
            return None;
        };
        Some(SaveTicket {
            key,
            annotations: self.store.list().to_vec(),
            generation: self.generation,
            revision: self.store.revision(),
            mode,
        })
    }

    /// Apply the result of a save started with [`EditorSession::begin_save`]
    /// or [`EditorSession::begin_auto_save`].
    ///
    /// The store is marked clean only if it was not mutated while the save
    /// was in flight; otherwise it stays dirty and the auto-save is
    /// rescheduled from `now`. Returns true if the backend accepted the save.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), StorageError>,
        now: Instant,
    ) -> bool {
        let current = ticket.generation == self.generation;

        match result {
            Ok(()) => {
                if current {
                    if self.store.revision() == ticket.revision {
                        self.store.mark_clean();
                    } else {
                        log::debug!("Session: edits made during save of '{}', still dirty", ticket.key);
                        self.after_mutation(now);
                    }
                }
                match ticket.mode {
                    SaveMode::Manual => {
                        log::info!(
                            "Session: saved {} annotations to '{}'",
                            ticket.annotations.len(),
                            ticket.key
                        );
                        self.notifier.notify(Notification::success(messages::SAVED));
                    }
                    SaveMode::Auto => {
                        log::debug!("Session: auto-saved {} annotations", ticket.annotations.len());
                    }
                }
                true
            }
            Err(source) => {
                self.report(AnnotationError::Save {
                    key: ticket.key.to_string(),
                    source,
                });
                false
            }
        }
    }

    fn after_mutation(&mut self, now: Instant) {
        self.auto_save.schedule(now);
    }

    // ---------------------------------------------------------------------
    // Navigation and teardown
    // ---------------------------------------------------------------------

    /// Save pending changes of the current image, then open `image`.
    pub async fn navigate_to(&mut self, image: ImageRef) {
        self.flush().await;
        self.open(image).await;
    }

    /// Save pending changes and close the image.
    pub async fn close(&mut self) {
        self.flush().await;

        self.generation += 1;
        self.store.reset();
        self.image = None;
        self.key = None;
        self.image_status = ImageStatus::None;
        self.geometry = None;
        log::debug!("Session: closed");
    }

    async fn flush(&mut self) {
        self.interaction.cancel();
        self.auto_save.cancel();
        if self.store.is_dirty() {
            self.save().await;
        }
    }

    // ---------------------------------------------------------------------
    // Rendering and export
    // ---------------------------------------------------------------------

    /// Overlay items for the current state, placed with the current geometry.
    pub fn overlay(&self) -> Vec<OverlayItem> {
        build_overlay(
            &self.store,
            &self.interaction,
            self.geometry.as_ref(),
            self.preferences.skin.skin(),
        )
    }

    /// Snapshot the open image's annotations for download.
    pub fn export(&mut self) -> Option<ExportDocument> {
        let image = self.image.as_ref()?;
        let document = ExportDocument::new(image, self.store.list().to_vec(), Utc::now());
        log::info!(
            "Session: exported {} annotations of '{}'",
            document.annotations.len(),
            image.title
        );
        self.notifier.notify(Notification::success(messages::EXPORTED));
        Some(document)
    }

    // ---------------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------------

    /// Route an error to the log and, where the user can act on it, to the
    /// notification sink.
    fn report(&mut self, error: AnnotationError) {
        match &error {
            AnnotationError::EmptyLabel | AnnotationError::TooSmall { .. } => {
                log::debug!("Session: rejected input: {}", error);
                self.notifier.notify(Notification::error(error.to_string()));
            }
            AnnotationError::NotFound(_) | AnnotationError::ReadOnly => {
                log::warn!("Session: ignored operation: {}", error);
            }
            AnnotationError::Load { .. } => {
                log::error!("{}", error);
                self.notifier.notify(Notification::error(messages::LOAD_FAILED));
            }
            AnnotationError::Save { .. } => {
                log::error!("{}", error);
                self.notifier.notify(Notification::error(messages::SAVE_FAILED));
            }
        }
    }
}
