//! # Keyboard mapping
//!
//! Keystrokes arriving while the canvas has focus are parsed into a
//! [`Keystroke`] and resolved against the canvas bindings into an
//! [`EditorAction`]. The binding table doubles as the shortcut help listing.

use serde::{Deserialize, Serialize};

/// Modifier keys held during a keystroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, Super/Win elsewhere.
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    /// Ctrl or Cmd, whichever the platform treats as the shortcut modifier.
    pub fn secondary(&self) -> bool {
        self.control || self.platform
    }
}

/// A single key press.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystroke {
    /// Lowercase key name: "a", "delete", "backspace", "escape", ...
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into().to_lowercase(),
            modifiers,
        }
    }

    /// Parse dash-separated shortcut notation such as `ctrl-a`, `cmd-s` or
    /// `escape`. Modifiers come first, the key last; case is ignored.
    pub fn parse(notation: &str) -> Self {
        let parts: Vec<&str> = notation.split('-').collect();
        let (key, modifier_parts) = match parts.split_last() {
            Some((key, rest)) => (*key, rest),
            None => ("", &[][..]),
        };

        let mut modifiers = Modifiers::none();
        for part in modifier_parts {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cmd" | "meta" | "command" | "platform" => modifiers.platform = true,
                _ => (),
            }
        }

        Self::new(key, modifiers)
    }
}

/// Canvas-level actions reachable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    /// Show the node palette.
    OpenPalette,
    /// Delete the selected node.
    DeleteSelected,
    /// Clear selection and connecting-mode, hide the palette.
    Cancel,
    /// Re-notify listeners with the current project.
    Save,
}

/// How a binding treats the Ctrl/Cmd modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierRule {
    /// Ctrl or Cmd must be held.
    Secondary,
    /// Modifiers are ignored.
    Any,
}

/// A keyboard shortcut configuration.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: &'static str,
    pub rule: ModifierRule,
    pub action: EditorAction,
    pub description: &'static str,
}

impl KeyBinding {
    const fn new(
        key: &'static str,
        rule: ModifierRule,
        action: EditorAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            rule,
            action,
            description,
        }
    }

    pub fn matches(&self, keystroke: &Keystroke) -> bool {
        if !keystroke.key.eq_ignore_ascii_case(self.key) {
            return false;
        }
        match self.rule {
            ModifierRule::Secondary => keystroke.modifiers.secondary(),
            ModifierRule::Any => true,
        }
    }

    /// Human-readable shortcut, e.g. "Ctrl+A".
    pub fn label(&self) -> String {
        let key = match self.key {
            "delete" => "Del".to_string(),
            "backspace" => "Backspace".to_string(),
            "escape" => "Esc".to_string(),
            other => other.to_uppercase(),
        };
        match self.rule {
            ModifierRule::Secondary => format!("Ctrl+{key}"),
            ModifierRule::Any => key,
        }
    }
}

const CANVAS_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("a", ModifierRule::Secondary, EditorAction::OpenPalette, "Add node"),
    KeyBinding::new("s", ModifierRule::Secondary, EditorAction::Save, "Save"),
    KeyBinding::new("delete", ModifierRule::Any, EditorAction::DeleteSelected, "Delete selected"),
    KeyBinding::new("backspace", ModifierRule::Any, EditorAction::DeleteSelected, "Delete selected"),
    KeyBinding::new("escape", ModifierRule::Any, EditorAction::Cancel, "Cancel/Deselect"),
];

/// Bindings active while the canvas has focus.
pub fn canvas_bindings() -> &'static [KeyBinding] {
    CANVAS_BINDINGS
}

/// Resolve a keystroke to the action it triggers, if any.
pub fn resolve(keystroke: &Keystroke) -> Option<EditorAction> {
    CANVAS_BINDINGS
        .iter()
        .find(|binding| binding.matches(keystroke))
        .map(|binding| binding.action)
}
