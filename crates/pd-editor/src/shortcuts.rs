//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,
    ToggleLock,
    /// Arrow keys. `dx`/`dy` are -1, 0 or 1; `large` when Shift is held.
    Nudge { dx: i8, dy: i8, large: bool },

    // ── Z-order ──
    MoveDown,
    MoveUp,
    SendToBack,
    BringToFront,

    /// Abort the active gesture, or clear the selection.
    Escape,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                // Copy duplicates in place; there is no clipboard.
                "d" | "D" | "c" | "C" => Some(ShortcutAction::Duplicate),
                "l" | "L" => Some(ShortcutAction::ToggleLock),
                "[" => Some(ShortcutAction::MoveDown),
                "]" => Some(ShortcutAction::MoveUp),
                _ => None,
            };
        }

        let nudge = |dx, dy| Some(ShortcutAction::Nudge { dx, dy, large: shift });
        match key {
            "ArrowLeft" => nudge(-1, 0),
            "ArrowRight" => nudge(1, 0),
            "ArrowUp" => nudge(0, -1),
            "ArrowDown" => nudge(0, 1),
            "Delete" | "Backspace" if !shift => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Escape),
            _ => None,
        }
    }
}
