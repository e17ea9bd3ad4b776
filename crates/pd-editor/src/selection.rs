//! Selection as a value.
//!
//! A `Selection` is never mutated in place by the store; every change
//! builds a new one and replaces the old wholesale, so two selections can
//! be compared directly and a stale copy never aliases the live one.

use pd_core::id::ElementId;
use serde::Serialize;
use smallvec::SmallVec;

/// Ordered set of selected element ids (insertion order, no duplicates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(SmallVec<[ElementId; 4]>);

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(id: ElementId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        Self(ids)
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ElementId>) -> Self {
        Self::empty().with_added(ids)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    /// The earliest-selected id.
    pub fn first(&self) -> Option<ElementId> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ElementId> {
        self.0.to_vec()
    }

    /// Add `id` if absent, remove it if present.
    pub fn with_toggled(&self, id: ElementId) -> Self {
        if self.contains(id) {
            Self(self.0.iter().copied().filter(|s| *s != id).collect())
        } else {
            let mut ids = self.0.clone();
            ids.push(id);
            Self(ids)
        }
    }

    pub fn with_added(&self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut out = self.0.clone();
        for id in ids {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Self(out)
    }

    /// Keep only ids for which `keep` holds.
    pub fn retained(&self, keep: impl Fn(ElementId) -> bool) -> Self {
        Self(self.0.iter().copied().filter(|id| keep(*id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::intern(s)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let s = Selection::single(id("a"));
        let s2 = s.with_toggled(id("b"));
        assert_eq!(s2.to_vec(), vec![id("a"), id("b")]);
        let s3 = s2.with_toggled(id("a"));
        assert_eq!(s3.to_vec(), vec![id("b")]);
        // The original value is untouched.
        assert_eq!(s.to_vec(), vec![id("a")]);
    }

    #[test]
    fn add_skips_duplicates() {
        let s = Selection::from_ids([id("a"), id("b"), id("a")]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.first(), Some(id("a")));
    }

    #[test]
    fn retained_filters() {
        let s = Selection::from_ids([id("a"), id("b"), id("c")]);
        let kept = s.retained(|x| x != id("b"));
        assert_eq!(kept.to_vec(), vec![id("a"), id("c")]);
    }
}
