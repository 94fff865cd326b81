//! Keyboard handling for the annotation editor.
//!
//! While a label editor is open only Enter and Escape are interpreted (plus
//! the save chord); everything else belongs to the text field. Otherwise the
//! arrow keys step through the gallery and Escape closes the editor.

use serde::{Deserialize, Serialize};

/// A key, reduced to what the editor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Other,
}

impl Key {
    /// Convert a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl or Cmd.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_command(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }
}

/// Editor action triggered by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Commit the open label editor
    SubmitLabel,
    /// Discard the open label editor
    CancelLabel,
    /// Manual save
    Save,
    /// Show the previous gallery image
    PreviousImage,
    /// Show the next gallery image
    NextImage,
    /// Close the editor
    Close,
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Commits the label editor
    pub submit: Key,
    /// Cancels the label editor, or closes the editor when idle
    pub cancel: Key,
    /// Pressed together with Ctrl/Cmd to save
    pub save: Key,
    pub previous: Key,
    pub next: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            submit: Key::Enter,
            cancel: Key::Escape,
            save: Key::Char('s'),
            previous: Key::ArrowLeft,
            next: Key::ArrowRight,
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action for a key press, if any.
    pub fn action_for(&self, event: &KeyEvent, label_editor_open: bool) -> Option<EditorAction> {
        let key = match event.key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };

        if event.modifiers.command() && key == self.save {
            return Some(EditorAction::Save);
        }

        if label_editor_open {
            return if key == self.submit {
                Some(EditorAction::SubmitLabel)
            } else if key == self.cancel {
                Some(EditorAction::CancelLabel)
            } else {
                None
            };
        }

        if key == self.previous {
            Some(EditorAction::PreviousImage)
        } else if key == self.next {
            Some(EditorAction::NextImage)
        } else if key == self.cancel {
            Some(EditorAction::Close)
        } else {
            None
        }
    }
}
