//! Interaction state machine.
//!
//! Turns pointer and keyboard events into store operations:
//!
//! ```text
//! idle ──press──▶ selecting ──move past threshold──▶ dragging
//!                     │                               transforming (resize handle)
//!                     │                               rotating     (rotate handle)
//!                     └──release──▶ idle ◀──release── (commit) / Escape (revert)
//! ```
//!
//! A drag, resize or rotate is one store gesture: the pre-drag state is
//! captured once, live moves record nothing, and release pushes a single
//! undo entry. Escape during a gesture reverts it.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Press | Drag | Resize | Rotate |
//! |----------|-------|------|--------|--------|
//! | **Shift** | Toggle selection | Axis-constrain | Keep aspect (corners) | Snap to 45° |

use crate::input::{HandleTarget, InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::store::SceneStore;
use kurbo::{Point, Vec2};
use pd_core::config::EditorConfig;
use pd_core::geometry::{
    Bounds, Frame, compute_rotation, group_bounds, hit_test, resize, rotate_about_center,
    rotated_bounding_box,
};
use pd_core::id::ElementId;
use pd_core::snap::{Axis, Guides, SnapEngine, SnapSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// Pointer is down, not yet past the drag threshold.
    Selecting,
    Dragging,
    Transforming,
    Rotating,
}

impl Mode {
    pub fn in_gesture(self) -> bool {
        matches!(self, Self::Dragging | Self::Transforming | Self::Rotating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressOn {
    Selection,
    Handle(ElementId, HandleTarget),
}

/// State of the current press.
#[derive(Debug, Clone)]
struct Press {
    start: Point,
    on: PressOn,
    /// Frames of the moving elements when the gesture began.
    origins: Vec<(ElementId, Frame)>,
    /// Envelope of the moving elements when the gesture began.
    group: Option<Bounds>,
    /// Envelopes of every other element (snap targets).
    siblings: Vec<Bounds>,
}

impl Press {
    fn new(start: Point, on: PressOn) -> Self {
        Self {
            start,
            on,
            origins: Vec::new(),
            group: None,
            siblings: Vec::new(),
        }
    }

    fn ids(&self) -> Vec<ElementId> {
        self.origins.iter().map(|(id, _)| *id).collect()
    }
}

pub struct InteractionController {
    mode: Mode,
    press: Option<Press>,
    snap: SnapEngine,
    /// Text element whose content is being edited in place.
    editing: Option<ElementId>,
    drag_threshold: f64,
    nudge_step: f64,
    nudge_step_large: f64,
    min_extent: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            mode: Mode::Idle,
            press: None,
            snap: SnapEngine::new(SnapSettings::from(config)),
            editing: None,
            drag_threshold: config.drag_threshold,
            nudge_step: config.nudge_step,
            nudge_step_large: config.nudge_step_large,
            min_extent: config.min_extent,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Active smart guides (empty outside drag/resize).
    pub fn guides(&self) -> Guides {
        self.snap.guides()
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.snap.toggle_grid()
    }

    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    /// Dispatch one event. Returns `true` if anything visible changed.
    pub fn handle(&mut self, store: &mut SceneStore, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                modifiers,
                target,
            } => self.pointer_down(store, Point::new(*x, *y), *modifiers, *target),
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(store, Point::new(*x, *y), *modifiers)
            }
            InputEvent::PointerUp { .. } => self.pointer_up(store),
            InputEvent::DoubleClick { x, y } => self.double_click(store, Point::new(*x, *y)),
            InputEvent::Key { key, modifiers } => self.key(store, key, *modifiers),
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        store: &mut SceneStore,
        point: Point,
        modifiers: Modifiers,
        target: Option<HandleTarget>,
    ) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }
        let was_editing = self.editing.take().is_some();

        // Handles belong to the primary selection.
        if let Some(target) = target
            && let Some(id) = store.first_selected()
        {
            self.press = Some(Press::new(point, PressOn::Handle(id, target)));
            self.mode = Mode::Selecting;
            return was_editing;
        }

        match hit_test(store.element_arcs(), point) {
            Some(id) => {
                let changed = if modifiers.shift {
                    store.toggle_selection(id)
                } else if !store.selection().contains(id) {
                    store.select(Some(id))
                } else {
                    // Keep a multi-selection intact so it can be dragged.
                    false
                };
                self.press = Some(Press::new(point, PressOn::Selection));
                self.mode = Mode::Selecting;
                changed || was_editing
            }
            None => {
                let cleared = !modifiers.shift && store.clear_selection();
                cleared || was_editing
            }
        }
    }

    fn pointer_move(&mut self, store: &mut SceneStore, point: Point, modifiers: Modifiers) -> bool {
        match self.mode {
            Mode::Idle => false,
            Mode::Selecting => {
                let Some(press) = &self.press else {
                    return false;
                };
                if (point - press.start).hypot() < self.drag_threshold {
                    return false;
                }
                if !self.begin_gesture(store) {
                    return false;
                }
                self.apply_move(store, point, modifiers)
            }
            Mode::Dragging | Mode::Transforming | Mode::Rotating => {
                self.apply_move(store, point, modifiers)
            }
        }
    }

    /// Capture origins and snap targets, open a store gesture and switch
    /// mode. Returns `false` if there is nothing to move.
    fn begin_gesture(&mut self, store: &mut SceneStore) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        let moving: Vec<ElementId> = match press.on {
            PressOn::Selection => store.selected_elements().map(|el| el.id).collect(),
            PressOn::Handle(id, _) => store
                .element(id)
                .filter(|el| !el.locked)
                .map(|el| el.id)
                .into_iter()
                .collect(),
        };
        if moving.is_empty() {
            self.press = None;
            self.mode = Mode::Idle;
            return false;
        }

        press.origins = store
            .elements()
            .filter(|el| moving.contains(&el.id))
            .map(|el| (el.id, el.frame()))
            .collect();
        press.group = group_bounds(store.elements().filter(|el| moving.contains(&el.id)));
        press.siblings = store
            .elements()
            .filter(|el| !moving.contains(&el.id))
            .map(rotated_bounding_box)
            .collect();

        self.mode = match press.on {
            PressOn::Selection => Mode::Dragging,
            PressOn::Handle(_, HandleTarget::Resize(_)) => Mode::Transforming,
            PressOn::Handle(_, HandleTarget::Rotate(_)) => Mode::Rotating,
        };
        store.begin_gesture();
        log::trace!("{:?} {} element(s)", self.mode, press.origins.len());
        true
    }

    fn apply_move(&mut self, store: &mut SceneStore, point: Point, modifiers: Modifiers) -> bool {
        let Some(press) = &self.press else {
            return false;
        };
        let canvas = store.canvas();
        let mut delta = point - press.start;

        match (self.mode, press.on) {
            (Mode::Dragging, _) => {
                // Shift: constrain to dominant axis (`Some(true)` = horizontal)
                let axis_lock = modifiers.shift.then(|| delta.x.abs() > delta.y.abs());
                match axis_lock {
                    Some(true) => delta.y = 0.0,
                    Some(false) => delta.x = 0.0,
                    None => {}
                }
                if let Some(group) = press.group {
                    let proposal = group.translate(delta);
                    let correction = self.snap.snap_move(&proposal, canvas, &press.siblings);
                    // The locked axis keeps no guide: nothing moved onto it.
                    match axis_lock {
                        Some(true) => {
                            delta.x += correction.x;
                            self.snap.clear_axis(Axis::Y);
                        }
                        Some(false) => {
                            delta.y += correction.y;
                            self.snap.clear_axis(Axis::X);
                        }
                        None => delta += correction,
                    }
                }
                let origins = &press.origins;
                store.preview_update(&press.ids(), |el| {
                    if let Some((_, frame)) = origins.iter().find(|(id, _)| *id == el.id) {
                        el.x = frame.x + delta.x;
                        el.y = frame.y + delta.y;
                    }
                })
            }
            (Mode::Transforming, PressOn::Handle(id, HandleTarget::Resize(handle))) => {
                let Some(&(_, origin)) = press.origins.first() else {
                    return false;
                };
                let sized = resize(&origin, handle, delta, modifiers.shift, self.min_extent);
                let snapped = self.snap.snap_resize(&sized, handle, canvas, &press.siblings);
                let frame = if snapped.width >= self.min_extent && snapped.height >= self.min_extent
                {
                    snapped
                } else {
                    self.snap.clear();
                    sized
                };
                store.preview_update(&[id], |el| el.set_frame(frame))
            }
            (Mode::Rotating, PressOn::Handle(id, HandleTarget::Rotate(side))) => {
                let Some(&(_, origin)) = press.origins.first() else {
                    return false;
                };
                let degrees = compute_rotation(origin.center(), point, side, modifiers.shift);
                let frame = rotate_about_center(&origin, degrees);
                store.preview_update(&[id], |el| el.set_frame(frame))
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self, store: &mut SceneStore) -> bool {
        let was_gesture = self.mode.in_gesture();
        if was_gesture {
            store.commit_gesture();
        }
        let had_guides = !self.snap.guides().is_empty();
        self.snap.clear();
        self.press = None;
        self.mode = Mode::Idle;
        was_gesture || had_guides
    }

    /// Double-click on an unlocked text element starts in-place editing.
    fn double_click(&mut self, store: &mut SceneStore, point: Point) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }
        let Some(id) = hit_test(store.element_arcs(), point) else {
            return false;
        };
        if store.element(id).and_then(|el| el.as_text()).is_none() {
            return false;
        }
        store.select(Some(id));
        self.editing = Some(id);
        true
    }

    /// Finish in-place editing, writing `content` as one undo step.
    pub fn commit_text_edit(&mut self, store: &mut SceneStore, content: &str) -> bool {
        let Some(id) = self.editing.take() else {
            return false;
        };
        store.update(id, |el| {
            if let Some(text) = el.as_text_mut() {
                text.content = content.to_string();
            }
        })
    }

    pub fn cancel_text_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    fn key(&mut self, store: &mut SceneStore, key: &str, m: Modifiers) -> bool {
        let Some(action) = ShortcutMap::resolve(key, m.ctrl, m.shift, m.alt, m.meta) else {
            return false;
        };
        if action == ShortcutAction::Escape {
            return self.escape(store);
        }
        // Shortcuts only run while idle and not typing.
        if self.mode != Mode::Idle || self.editing.is_some() {
            return false;
        }
        self.run(store, action)
    }

    fn escape(&mut self, store: &mut SceneStore) -> bool {
        match self.mode {
            Mode::Dragging | Mode::Transforming | Mode::Rotating => {
                store.abort_gesture();
                self.snap.clear();
                self.press = None;
                self.mode = Mode::Idle;
                true
            }
            Mode::Selecting => {
                self.press = None;
                self.mode = Mode::Idle;
                false
            }
            Mode::Idle => self.editing.take().is_some() || store.clear_selection(),
        }
    }

    /// Run a shortcut action against the store.
    pub fn run(&mut self, store: &mut SceneStore, action: ShortcutAction) -> bool {
        let first = store.first_selected();
        match action {
            ShortcutAction::Undo => store.undo(),
            ShortcutAction::Redo => store.redo(),
            ShortcutAction::Delete => store.delete_selected() > 0,
            ShortcutAction::SelectAll => store.select_all(),
            ShortcutAction::Duplicate => !store.duplicate_selected().is_empty(),
            ShortcutAction::ToggleLock => {
                let ids = store.selection().to_vec();
                store.update_many(&ids, |el| el.locked = !el.locked)
            }
            ShortcutAction::Nudge { dx, dy, large } => {
                let step = if large {
                    self.nudge_step_large
                } else {
                    self.nudge_step
                };
                let d = Vec2::new(f64::from(dx), f64::from(dy)) * step;
                store.nudge_selected(d.x, d.y)
            }
            ShortcutAction::MoveDown => first.is_some_and(|id| store.move_down(id)),
            ShortcutAction::MoveUp => first.is_some_and(|id| store.move_up(id)),
            ShortcutAction::SendToBack => first.is_some_and(|id| store.send_to_back(id)),
            ShortcutAction::BringToFront => first.is_some_and(|id| store.bring_to_front(id)),
            ShortcutAction::Escape => self.escape(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::model::ElementType;

    #[test]
    fn click_on_empty_canvas_clears_selection() {
        let mut store = SceneStore::default();
        let el = store.add(ElementType::Shape, None);
        assert_eq!(store.first_selected(), Some(el.id));

        let mut ctl = InteractionController::default();
        assert!(ctl.handle(&mut store, &InputEvent::pointer_down(5.0, 5.0, Modifiers::NONE)));
        assert!(store.selection().is_empty());
        assert_eq!(ctl.mode(), Mode::Idle);
    }

    #[test]
    fn small_moves_stay_selecting() {
        let mut store = SceneStore::default();
        store.add(ElementType::Shape, None);
        let mut ctl = InteractionController::default();
        ctl.handle(&mut store, &InputEvent::pointer_down(500.0, 750.0, Modifiers::NONE));
        ctl.handle(&mut store, &InputEvent::pointer_move(501.0, 751.0, Modifiers::NONE));
        assert_eq!(ctl.mode(), Mode::Selecting);
        ctl.handle(&mut store, &InputEvent::pointer_up(501.0, 751.0));
        assert_eq!(ctl.mode(), Mode::Idle);
        assert_eq!(store.history().past_len(), 1);
    }

    #[test]
    fn keys_are_ignored_mid_gesture() {
        let mut store = SceneStore::default();
        store.add(ElementType::Shape, None);
        let mut ctl = InteractionController::default();
        ctl.handle(&mut store, &InputEvent::pointer_down(500.0, 750.0, Modifiers::NONE));
        ctl.handle(&mut store, &InputEvent::pointer_move(560.0, 700.0, Modifiers::NONE));
        assert_eq!(ctl.mode(), Mode::Dragging);
        assert!(!ctl.handle(&mut store, &InputEvent::key("Delete", Modifiers::NONE)));
        assert_eq!(store.len(), 1);
    }
}
