//! Bounded undo/redo history.
//!
//! Every entry is an immutable snapshot of the element list (plus the
//! canvas size, so a canvas rescale undoes as one step). Elements are held
//! behind `Arc`, so a snapshot shares every element the next mutation
//! does not touch.
//!
//! Drag gestures use **snapshot batching**: the state is captured once when
//! the gesture begins, live updates push nothing, and the end of the
//! gesture pushes that single snapshot if anything changed.

use pd_core::model::{CanvasSize, Element};
use std::collections::VecDeque;
use std::sync::Arc;

/// One history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<Arc<Element>>,
    pub canvas: CanvasSize,
}

impl Snapshot {
    pub fn new(elements: Vec<Arc<Element>>, canvas: CanvasSize) -> Self {
        Self { elements, canvas }
    }

    /// Structural equality with a pointer fast path per element.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        self.canvas == other.canvas
            && self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

/// Undo/redo stacks with gesture grouping.
#[derive(Debug)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum undo depth.
    limit: usize,
    /// Gesture nesting depth (0 = no gesture).
    gesture_depth: usize,
    /// State captured at the start of the outermost gesture.
    gesture_start: Option<Snapshot>,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(64)),
            future: Vec::new(),
            limit,
            gesture_depth: 0,
            gesture_start: None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_depth > 0
    }

    /// Push the pre-mutation state. Clears the redo stack and drops the
    /// oldest entry beyond the limit.
    pub fn record(&mut self, before: Snapshot) {
        if self.in_gesture() {
            return;
        }
        self.push_past(before);
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Step back. `current` becomes the redo target; the returned snapshot
    /// is the state to restore.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    /// Start a gesture group. Only the outermost call captures `current`.
    pub fn begin_gesture(&mut self, current: Snapshot) {
        if self.gesture_depth == 0 {
            self.gesture_start = Some(current);
        }
        self.gesture_depth += 1;
    }

    /// Close a gesture group. When the outermost group closes and `current`
    /// differs from the captured start, the start is pushed as one entry.
    /// Returns whether an entry was pushed.
    pub fn commit_gesture(&mut self, current: &Snapshot) -> bool {
        if self.gesture_depth == 0 {
            return false;
        }
        self.gesture_depth -= 1;
        if self.gesture_depth > 0 {
            return false;
        }
        match self.gesture_start.take() {
            Some(start) if !start.same_as(current) => {
                self.push_past(start);
                self.future.clear();
                true
            }
            _ => false,
        }
    }

    /// Cancel every open gesture group and hand back the state to restore.
    pub fn abort_gesture(&mut self) -> Option<Snapshot> {
        self.gesture_depth = 0;
        self.gesture_start.take()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.gesture_depth = 0;
        self.gesture_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::id::ElementId;
    use pd_core::model::ElementType;

    fn snap(n: usize) -> Snapshot {
        let elements = (0..n)
            .map(|i| {
                Arc::new(Element::with_defaults(
                    ElementType::Shape,
                    ElementId::intern(&format!("h{i}")),
                    CanvasSize::default(),
                ))
            })
            .collect();
        Snapshot::new(elements, CanvasSize::default())
    }

    #[test]
    fn undo_then_redo() {
        let mut h = History::new(10);
        h.record(snap(0));
        let restored = h.undo(snap(1)).unwrap();
        assert_eq!(restored, snap(0));
        assert!(h.can_redo());
        let again = h.redo(snap(0)).unwrap();
        assert_eq!(again, snap(1));
        assert!(!h.can_redo());
        assert!(h.can_undo());
    }

    #[test]
    fn record_clears_future() {
        let mut h = History::new(10);
        h.record(snap(0));
        h.undo(snap(1));
        assert!(h.can_redo());
        h.record(snap(0));
        assert!(!h.can_redo());
    }

    #[test]
    fn limit_trims_oldest() {
        let mut h = History::new(3);
        for n in 0..5 {
            h.record(snap(n));
        }
        assert_eq!(h.past_len(), 3);
        assert_eq!(h.undo(snap(9)).unwrap(), snap(4));
        assert_eq!(h.undo(snap(4)).unwrap(), snap(3));
        assert_eq!(h.undo(snap(3)).unwrap(), snap(2));
        assert!(h.undo(snap(2)).is_none());
    }

    #[test]
    fn gesture_is_single_step() {
        let mut h = History::new(10);
        h.begin_gesture(snap(0));
        h.record(snap(1));
        h.begin_gesture(snap(1));
        assert!(!h.commit_gesture(&snap(2)));
        assert!(h.commit_gesture(&snap(2)));
        assert_eq!(h.past_len(), 1);
        assert_eq!(h.undo(snap(2)).unwrap(), snap(0));
    }

    #[test]
    fn unchanged_gesture_pushes_nothing() {
        let mut h = History::new(10);
        h.begin_gesture(snap(1));
        assert!(!h.commit_gesture(&snap(1)));
        assert!(!h.can_undo());
    }

    #[test]
    fn abort_returns_start() {
        let mut h = History::new(10);
        h.begin_gesture(snap(2));
        h.begin_gesture(snap(3));
        assert_eq!(h.abort_gesture(), Some(snap(2)));
        assert!(!h.in_gesture());
        assert!(!h.can_undo());
    }
}
