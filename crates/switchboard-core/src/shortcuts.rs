//! Editor commands, keyboard shortcut registry and key dispatch.

use crate::input::KeyInput;
use crate::shapes::ObjectProperty;
use crate::tools::DrawingMode;
use serde::{Deserialize, Serialize};

/// A discrete engine operation. Every command is safe to issue with no
/// selection, no gesture and an empty clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    SetMode { mode: DrawingMode },
    Undo,
    Redo,
    SelectAll,
    Copy,
    Paste,
    Cut,
    Duplicate,
    AddText,
    DeleteSelected,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Nudge the selection by a pixel delta.
    MoveSelected { dx: f64, dy: f64 },
    BringToFront,
    BringForward,
    SendBackward,
    SendToBack,
    ClearScene,
    UpdateProperty { property: ObjectProperty },
}

/// Which nudge step a shortcut uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Small,
    Large,
}

/// Action bound to a key, before config-dependent values are filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Mode(DrawingMode),
    Undo,
    Redo,
    SelectAll,
    Copy,
    Paste,
    Cut,
    Duplicate,
    AddText,
    Delete,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Direction in unit steps.
    Nudge(f64, f64, Nudge),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: KeyAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: KeyAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &KeyInput) -> bool {
        // Shift on a non-shift shortcut is tolerated for symbols like '+'.
        self.key.eq_ignore_ascii_case(&key.key)
            && self.ctrl == key.modifiers.command()
            && (self.shift == key.modifiers.shift || (!self.shift && is_symbol(self.key)))
    }
}

fn is_symbol(key: &str) -> bool {
    key.chars().count() == 1 && key.chars().all(|c| !c.is_alphanumeric())
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts. Earlier entries win on conflicts.
    pub fn all() -> Vec<Shortcut> {
        use KeyAction as A;
        vec![
            Shortcut::new("Z", true, false, A::Undo, "Undo"),
            Shortcut::new("Z", true, true, A::Redo, "Redo"),
            Shortcut::new("Y", true, false, A::Redo, "Redo"),
            Shortcut::new("A", true, false, A::SelectAll, "Select all objects"),
            Shortcut::new("C", true, false, A::Copy, "Copy selection"),
            Shortcut::new("V", true, false, A::Paste, "Paste"),
            Shortcut::new("X", true, false, A::Cut, "Cut selection"),
            Shortcut::new("D", true, false, A::Duplicate, "Duplicate selection"),
            Shortcut::new("0", true, false, A::ResetZoom, "Reset zoom"),
            Shortcut::new("V", false, false, A::Mode(DrawingMode::Select), "Select tool"),
            Shortcut::new("L", false, false, A::Mode(DrawingMode::Line), "Line tool"),
            Shortcut::new("R", false, false, A::Mode(DrawingMode::Rect), "Rectangle tool"),
            Shortcut::new("C", false, false, A::Mode(DrawingMode::Circle), "Circle tool"),
            Shortcut::new("T", false, false, A::AddText, "Add text label"),
            Shortcut::new("Delete", false, false, A::Delete, "Delete selection"),
            Shortcut::new("Backspace", false, false, A::Delete, "Delete selection"),
            Shortcut::new("Escape", false, false, A::Mode(DrawingMode::Select), "Back to select tool"),
            Shortcut::new("=", false, false, A::ZoomIn, "Zoom in"),
            Shortcut::new("+", false, false, A::ZoomIn, "Zoom in"),
            Shortcut::new("-", false, false, A::ZoomOut, "Zoom out"),
            Shortcut::new("ArrowLeft", false, false, A::Nudge(-1.0, 0.0, Nudge::Small), "Nudge left"),
            Shortcut::new("ArrowRight", false, false, A::Nudge(1.0, 0.0, Nudge::Small), "Nudge right"),
            Shortcut::new("ArrowUp", false, false, A::Nudge(0.0, -1.0, Nudge::Small), "Nudge up"),
            Shortcut::new("ArrowDown", false, false, A::Nudge(0.0, 1.0, Nudge::Small), "Nudge down"),
            Shortcut::new("ArrowLeft", false, true, A::Nudge(-1.0, 0.0, Nudge::Large), "Nudge left (large)"),
            Shortcut::new("ArrowRight", false, true, A::Nudge(1.0, 0.0, Nudge::Large), "Nudge right (large)"),
            Shortcut::new("ArrowUp", false, true, A::Nudge(0.0, -1.0, Nudge::Large), "Nudge up (large)"),
            Shortcut::new("ArrowDown", false, true, A::Nudge(0.0, 1.0, Nudge::Large), "Nudge down (large)"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn lookup(key: &KeyInput) -> Option<KeyAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key))
            .map(|shortcut| shortcut.action)
    }

    /// Resolve a key press into a command, using the given nudge steps.
    pub fn resolve(key: &KeyInput, nudge_step: f64, nudge_step_large: f64) -> Option<EditorCommand> {
        let command = match Self::lookup(key)? {
            KeyAction::Mode(mode) => EditorCommand::SetMode { mode },
            KeyAction::Undo => EditorCommand::Undo,
            KeyAction::Redo => EditorCommand::Redo,
            KeyAction::SelectAll => EditorCommand::SelectAll,
            KeyAction::Copy => EditorCommand::Copy,
            KeyAction::Paste => EditorCommand::Paste,
            KeyAction::Cut => EditorCommand::Cut,
            KeyAction::Duplicate => EditorCommand::Duplicate,
            KeyAction::AddText => EditorCommand::AddText,
            KeyAction::Delete => EditorCommand::DeleteSelected,
            KeyAction::ZoomIn => EditorCommand::ZoomIn,
            KeyAction::ZoomOut => EditorCommand::ZoomOut,
            KeyAction::ResetZoom => EditorCommand::ResetZoom,
            KeyAction::Nudge(x, y, size) => {
                let step = match size {
                    Nudge::Small => nudge_step,
                    Nudge::Large => nudge_step_large,
                };
                EditorCommand::MoveSelected {
                    dx: x * step,
                    dy: y * step,
                }
            }
        };
        Some(command)
    }

    /// Render the shortcut table as text.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("  {:20} {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
