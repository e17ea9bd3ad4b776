//! Input abstraction layer.
//!
//! Normalizes pointer and keyboard events into a unified `InputEvent`
//! consumed by the interaction controller. Coordinates are canvas units;
//! the host converts from screen space before dispatching.

use pd_core::geometry::{HandleSide, ResizeHandle};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A transform handle drawn around the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTarget {
    Resize(ResizeHandle),
    Rotate(HandleSide),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed. `target` is set when the press landed on a
    /// transform handle rather than on the canvas.
    PointerDown {
        x: f64,
        y: f64,
        modifiers: Modifiers,
        target: Option<HandleTarget>,
    },

    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f64,
        y: f64,
    },

    DoubleClick {
        x: f64,
        y: f64,
    },

    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowLeft"`).
    Key {
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers,
            target: None,
        }
    }

    pub fn handle_down(x: f64, y: f64, modifiers: Modifiers, target: HandleTarget) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers,
            target: Some(target),
        }
    }

    pub fn pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::DoubleClick { x, y } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}
