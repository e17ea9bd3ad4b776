//! Scene store: the single owner of template state.
//!
//! Holds the template metadata, the ordered element list (index 0 is the
//! back), the selection and the undo/redo history. Every element mutation
//! goes through this type and records the pre-mutation snapshot first, so
//! each user-visible change is one undo step.
//!
//! Operations on ids that do not exist are silent no-ops. Locked elements
//! never appear in the selection.

use crate::history::{History, Snapshot};
use crate::selection::Selection;
use pd_core::config::EditorConfig;
use pd_core::geometry::{PageEdge, align_to_page};
use pd_core::id::ElementId;
use pd_core::model::{CanvasSize, Element, ElementType, Template, normalize_rotation};
use pd_core::persist::{self, ElementsJson, SerializedTemplate};
use serde_json::Value;
use std::sync::Arc;

/// Emitted to subscribers after each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ElementsChanged,
    SelectionChanged,
    TemplateChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(StoreEvent)>;

pub struct SceneStore {
    template: Template,
    elements: Vec<Arc<Element>>,
    selection: Selection,
    history: History,
    config: EditorConfig,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl SceneStore {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            template: Template::blank(),
            elements: Vec::new(),
            selection: Selection::empty(),
            history: History::new(config.history_limit),
            config,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn canvas(&self) -> CanvasSize {
        self.template.canvas()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Elements back to front.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> + '_ {
        self.elements.iter().map(|el| &**el)
    }

    /// The shared element list, for hit testing and snapshots.
    pub fn element_arcs(&self) -> &[Arc<Element>] {
        &self.elements
    }

    /// Owned copy of the element list.
    pub fn element_list(&self) -> Vec<Element> {
        self.elements().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id).map(|el| &**el)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn first_selected(&self) -> Option<ElementId> {
        self.selection.first()
    }

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements().filter(|el| self.selection.contains(el.id))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn is_selectable(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|el| !el.locked)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.elements.clone(), self.canvas())
    }

    fn fresh_id(&self, ty: ElementType) -> ElementId {
        ElementId::fresh(ty.id_prefix(), |id| self.index_of(id).is_some())
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(StoreEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    fn set_selection(&mut self, selection: Selection) -> bool {
        if selection == self.selection {
            return false;
        }
        self.selection = selection;
        self.emit(StoreEvent::SelectionChanged);
        true
    }

    /// Record `before`, then notify. Drops ids that vanished or became
    /// locked from the selection.
    fn commit_change(&mut self, before: Snapshot) {
        self.history.record(before);
        self.elements_changed();
    }

    fn elements_changed(&mut self) {
        self.emit(StoreEvent::ElementsChanged);
        let kept = self.selection.retained(|id| self.is_selectable(id));
        self.set_selection(kept);
    }

    // ─── Element mutations ───────────────────────────────────────────────

    /// Add a new element of `ty`. `defaults` is merged over the type's base
    /// defaults; an invalid `defaults` object is ignored with a warning.
    /// The new element becomes the selection.
    pub fn add(&mut self, ty: ElementType, defaults: Option<&Value>) -> Element {
        let mut el = Element::with_defaults(ty, self.fresh_id(ty), self.canvas());
        if let Some(defaults) = defaults
            && let Err(e) = el.merge_json(defaults)
        {
            log::warn!("ignoring invalid defaults for new {ty:?}: {e}");
        }
        self.insert(el)
    }

    /// Add a new element of `ty`, customised in Rust. The id is fixed.
    pub fn add_with(&mut self, ty: ElementType, f: impl FnOnce(&mut Element)) -> Element {
        let id = self.fresh_id(ty);
        let mut el = Element::with_defaults(ty, id, self.canvas());
        f(&mut el);
        el.id = id;
        el.rotation = normalize_rotation(el.rotation);
        self.insert(el)
    }

    fn insert(&mut self, el: Element) -> Element {
        let before = self.snapshot();
        log::debug!("add {} ({:?})", el.id, el.element_type());
        let id = el.id;
        self.elements.push(Arc::new(el.clone()));
        self.commit_change(before);
        if !el.locked {
            self.set_selection(Selection::single(id));
        }
        el
    }

    /// Apply `f` to the element with `id`. Returns `false` (and records
    /// nothing) if the id is unknown or nothing changed.
    pub fn update(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        let Some(index) = self.index_of(id) else {
            log::trace!("update: no element {id}");
            return false;
        };
        let mut el = (*self.elements[index]).clone();
        f(&mut el);
        self.replace_at(index, el)
    }

    /// Shallow JSON patch (`id`/`type` keys ignored). An invalid patch is
    /// rejected without a history entry.
    pub fn patch(&mut self, id: ElementId, patch: &Value) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut el = (*self.elements[index]).clone();
        if let Err(e) = el.merge_json(patch) {
            log::warn!("rejecting patch for {id}: {e}");
            return false;
        }
        self.replace_at(index, el)
    }

    fn replace_at(&mut self, index: usize, mut el: Element) -> bool {
        let current = &self.elements[index];
        el.id = current.id;
        el.rotation = normalize_rotation(el.rotation);
        if el == **current {
            return false;
        }
        let before = self.snapshot();
        self.elements[index] = Arc::new(el);
        self.commit_change(before);
        true
    }

    /// Apply `f` to every element in `ids` as one undo step.
    pub fn update_many(&mut self, ids: &[ElementId], mut f: impl FnMut(&mut Element)) -> bool {
        let before = self.snapshot();
        let mut changed = false;
        for slot in &mut self.elements {
            if !ids.contains(&slot.id) {
                continue;
            }
            let mut el = (**slot).clone();
            f(&mut el);
            el.id = slot.id;
            el.rotation = normalize_rotation(el.rotation);
            if el != **slot {
                *slot = Arc::new(el);
                changed = true;
            }
        }
        if changed {
            self.commit_change(before);
        }
        changed
    }

    /// Remove every element in `ids`. Returns how many were removed.
    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let before = self.snapshot();
        self.elements.retain(|el| !ids.contains(&el.id));
        let removed = before.elements.len() - self.elements.len();
        if removed > 0 {
            log::debug!("deleted {removed} element(s)");
            self.commit_change(before);
        }
        removed
    }

    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let ids = self.selection.to_vec();
        self.delete(&ids)
    }

    /// Clone every selected element on top of the stack, offset by
    /// `duplicate_offset` on both axes, and select the clones.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let originals: Vec<Element> = self.selected_elements().cloned().collect();
        let offset = self.config.duplicate_offset;
        let before = self.snapshot();
        let mut clones = Vec::with_capacity(originals.len());
        for mut el in originals {
            el.id = self.fresh_id(el.element_type());
            el.x += offset;
            el.y += offset;
            clones.push(el.id);
            self.elements.push(Arc::new(el));
        }
        log::debug!("duplicated {} element(s)", clones.len());
        self.commit_change(before);
        self.set_selection(Selection::from_ids(clones.iter().copied()));
        clones
    }

    /// Replace the z-order. `order` must be a permutation of the current
    /// ids; anything else is rejected.
    pub fn reorder(&mut self, order: &[ElementId]) -> bool {
        if order.len() != self.elements.len() {
            log::warn!("reorder: expected {} ids, got {}", self.elements.len(), order.len());
            return false;
        }
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            match self.elements.iter().find(|el| el.id == *id) {
                Some(el) if !reordered.iter().any(|r: &Arc<Element>| r.id == *id) => {
                    reordered.push(Arc::clone(el));
                }
                _ => {
                    log::warn!("reorder: {id} is unknown or repeated");
                    return false;
                }
            }
        }
        self.restack(|elements| {
            let changed = elements.iter().zip(&reordered).any(|(a, b)| a.id != b.id);
            *elements = reordered;
            changed
        })
    }

    /// Swap with the neighbour above.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.restack(|elements| {
            if i + 1 >= elements.len() {
                return false;
            }
            elements.swap(i, i + 1);
            true
        })
    }

    /// Swap with the neighbour below.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.restack(|elements| {
            if i == 0 {
                return false;
            }
            elements.swap(i - 1, i);
            true
        })
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.restack(|elements| {
            if i + 1 == elements.len() {
                return false;
            }
            let el = elements.remove(i);
            elements.push(el);
            true
        })
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.restack(|elements| {
            if i == 0 {
                return false;
            }
            let el = elements.remove(i);
            elements.insert(0, el);
            true
        })
    }

    fn restack(&mut self, f: impl FnOnce(&mut Vec<Arc<Element>>) -> bool) -> bool {
        let before = self.snapshot();
        if !f(&mut self.elements) {
            self.elements = before.elements;
            return false;
        }
        log::trace!("restacked");
        self.commit_change(before);
        true
    }

    /// Flip the lock flag. Locking drops the element from the selection.
    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        self.update(id, |el| el.locked = !el.locked)
    }

    /// Align each selected element to a canvas edge or center line, as one
    /// undo step.
    pub fn align_selected(&mut self, edge: PageEdge) -> bool {
        let canvas = self.canvas();
        let ids = self.selection.to_vec();
        self.update_many(&ids, |el| align_to_page(el, canvas, edge))
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let ids = self.selection.to_vec();
        self.update_many(&ids, |el| {
            el.x += dx;
            el.y += dy;
        })
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection with `id`, or clear it. A locked or unknown id
    /// clears the selection.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        let next = match id {
            Some(id) if self.is_selectable(id) => Selection::single(id),
            _ => Selection::empty(),
        };
        self.set_selection(next)
    }

    pub fn toggle_selection(&mut self, id: ElementId) -> bool {
        if !self.selection.contains(id) && !self.is_selectable(id) {
            return false;
        }
        let next = self.selection.with_toggled(id);
        self.set_selection(next)
    }

    pub fn add_to_selection(&mut self, ids: &[ElementId]) -> bool {
        let next = self
            .selection
            .with_added(ids.iter().copied().filter(|id| self.is_selectable(*id)));
        self.set_selection(next)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.set_selection(Selection::empty())
    }

    /// Select every unlocked element.
    pub fn select_all(&mut self) -> bool {
        let next = Selection::from_ids(self.elements().filter(|el| !el.locked).map(|el| el.id));
        self.set_selection(next)
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if self.history.in_gesture() {
            return false;
        }
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history.in_gesture() {
            return false;
        }
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.elements = snapshot.elements;
        if snapshot.canvas != self.canvas() {
            self.template.width = snapshot.canvas.width;
            self.template.height = snapshot.canvas.height;
            self.emit(StoreEvent::TemplateChanged);
        }
        self.elements_changed();
    }

    /// Capture the current state as the start of a drag gesture. Updates
    /// until [`commit_gesture`](Self::commit_gesture) record nothing.
    pub fn begin_gesture(&mut self) {
        let current = self.snapshot();
        self.history.begin_gesture(current);
    }

    /// Live update during a gesture. Nothing is recorded until the gesture
    /// commits; outside a gesture this is [`update_many`](Self::update_many).
    pub fn preview_update(&mut self, ids: &[ElementId], f: impl FnMut(&mut Element)) -> bool {
        if !self.in_gesture() {
            log::trace!("preview_update outside a gesture");
        }
        self.update_many(ids, f)
    }

    /// End the gesture; pushes one undo entry if anything changed.
    pub fn commit_gesture(&mut self) -> bool {
        let current = self.snapshot();
        self.history.commit_gesture(&current)
    }

    /// Revert everything since the gesture began.
    pub fn abort_gesture(&mut self) -> bool {
        let Some(start) = self.history.abort_gesture() else {
            return false;
        };
        if !start.same_as(&self.snapshot()) {
            self.restore(start);
        }
        true
    }

    pub fn in_gesture(&self) -> bool {
        self.history.in_gesture()
    }

    // ─── Template ────────────────────────────────────────────────────────

    /// Resize the canvas and rescale every element proportionally, as one
    /// undo step. Zero dimensions are rejected.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> bool {
        let from = self.canvas();
        let to = CanvasSize::new(width, height);
        if width == 0 || height == 0 || from == to {
            return false;
        }
        let before = self.snapshot();
        for slot in &mut self.elements {
            Arc::make_mut(slot).rescale(from, to);
        }
        self.template.width = width;
        self.template.height = height;
        log::debug!("canvas {}x{} → {width}x{height}", from.width, from.height);
        self.emit(StoreEvent::TemplateChanged);
        self.commit_change(before);
        true
    }

    pub fn rename_template(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
        self.emit(StoreEvent::TemplateChanged);
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.template.background_color = color.into();
        self.emit(StoreEvent::TemplateChanged);
    }

    /// Replace template, elements, selection and history wholesale.
    pub fn load(&mut self, mut template: Template, elements: ElementsJson) {
        template.sanitize();
        self.elements = persist::load_elements(elements)
            .into_iter()
            .map(Arc::new)
            .collect();
        log::debug!("loaded template {:?} with {} element(s)", template.name, self.elements.len());
        self.template = template;
        self.history.clear();
        self.selection = Selection::empty();
        self.emit(StoreEvent::TemplateChanged);
        self.emit(StoreEvent::ElementsChanged);
        self.emit(StoreEvent::SelectionChanged);
    }

    /// Back to the empty "new template" state.
    pub fn reset(&mut self) {
        self.load(Template::blank(), ElementsJson::List(Vec::new()));
    }

    pub fn serialize(&self) -> Result<SerializedTemplate, serde_json::Error> {
        persist::serialize(&self.template, self.elements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(n: usize) -> (SceneStore, Vec<ElementId>) {
        let mut store = SceneStore::default();
        let ids = (0..n)
            .map(|_| store.add(ElementType::Shape, None).id)
            .collect();
        (store, ids)
    }

    fn order(store: &SceneStore) -> Vec<ElementId> {
        store.elements().map(|el| el.id).collect()
    }

    #[test]
    fn add_merges_defaults_and_selects() {
        let mut store = SceneStore::default();
        let el = store.add(ElementType::Text, Some(&json!({ "content": "Hello", "fontSize": 48 })));
        assert!(el.id.as_str().starts_with("text_"));
        let t = store.element(el.id).unwrap().as_text().unwrap();
        assert_eq!(t.content, "Hello");
        assert_eq!(t.font_size, 48.0);
        assert_eq!(store.first_selected(), Some(el.id));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut store, _) = store_with(1);
        let depth = store.history().past_len();
        assert!(!store.update(ElementId::intern("ghost"), |el| el.x = 5.0));
        assert_eq!(store.delete(&[ElementId::intern("ghost")]), 0);
        assert_eq!(store.history().past_len(), depth);
    }

    #[test]
    fn unchanged_update_records_nothing() {
        let (mut store, ids) = store_with(1);
        let depth = store.history().past_len();
        assert!(!store.update(ids[0], |_| {}));
        assert_eq!(store.history().past_len(), depth);
    }

    #[test]
    fn update_cannot_change_identity() {
        let (mut store, ids) = store_with(1);
        store.update(ids[0], |el| {
            el.id = ElementId::intern("hijack");
            el.rotation = -90.0;
        });
        let el = store.element(ids[0]).unwrap();
        assert_eq!(el.rotation, 270.0);
    }

    #[test]
    fn invalid_patch_is_rejected() {
        let (mut store, ids) = store_with(1);
        let depth = store.history().past_len();
        assert!(!store.patch(ids[0], &json!({ "width": "wide" })));
        assert_eq!(store.history().past_len(), depth);
        assert!(store.patch(ids[0], &json!({ "width": 10 })));
        assert_eq!(store.element(ids[0]).unwrap().width, 10.0);
    }

    #[test]
    fn z_order_moves() {
        let (mut store, ids) = store_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        assert!(store.move_up(a));
        assert_eq!(order(&store), vec![b, a, c]);
        assert!(store.bring_to_front(a));
        assert_eq!(order(&store), vec![b, c, a]);
        assert!(!store.bring_to_front(a));
        assert!(store.send_to_back(a));
        assert_eq!(order(&store), vec![a, b, c]);
        assert!(!store.move_down(a));
        assert!(store.move_down(c));
        assert_eq!(order(&store), vec![a, c, b]);
    }

    #[test]
    fn reorder_requires_permutation() {
        let (mut store, ids) = store_with(3);
        assert!(!store.reorder(&[ids[0], ids[1]]));
        assert!(!store.reorder(&[ids[0], ids[0], ids[1]]));
        assert!(!store.reorder(&ids));
        assert!(store.reorder(&[ids[2], ids[0], ids[1]]));
        assert_eq!(order(&store), vec![ids[2], ids[0], ids[1]]);
        assert!(store.undo());
        assert_eq!(order(&store), ids);
    }

    #[test]
    fn locked_elements_leave_and_stay_out_of_selection() {
        let (mut store, ids) = store_with(2);
        store.add_to_selection(&ids);
        assert_eq!(store.selection().len(), 2);
        store.toggle_lock(ids[0]);
        assert_eq!(store.selection().to_vec(), vec![ids[1]]);
        assert!(!store.toggle_selection(ids[0]));
        store.select(Some(ids[0]));
        assert!(store.selection().is_empty());
        store.select_all();
        assert_eq!(store.selection().to_vec(), vec![ids[1]]);
    }

    #[test]
    fn gesture_commits_once_and_aborts_cleanly() {
        let (mut store, ids) = store_with(1);
        let depth = store.history().past_len();
        let start = store.element_list();

        store.begin_gesture();
        for step in 1..=5 {
            store.preview_update(&ids, |el| el.x = f64::from(step) * 10.0);
        }
        assert!(store.commit_gesture());
        assert_eq!(store.history().past_len(), depth + 1);
        assert_eq!(store.element(ids[0]).unwrap().x, 50.0);

        store.begin_gesture();
        store.preview_update(&ids, |el| el.y = -99.0);
        assert!(store.abort_gesture());
        assert_eq!(store.history().past_len(), depth + 1);
        assert_eq!(store.element(ids[0]).unwrap().x, 50.0);

        store.undo();
        assert_eq!(store.element_list(), start);
    }

    #[test]
    fn metadata_is_not_history() {
        let mut store = SceneStore::default();
        store.rename_template("Weeknight Pasta");
        store.set_background_color("#FAFAFA");
        assert!(!store.can_undo());
        assert_eq!(store.template().name, "Weeknight Pasta");
    }

    #[test]
    fn listeners_see_events() {
        let (mut store, ids) = store_with(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener = store.subscribe(move |e| sink.borrow_mut().push(e));

        store.clear_selection();
        store.update(ids[0], |el| el.x += 1.0);
        store.rename_template("x");
        assert_eq!(
            *seen.borrow(),
            vec![
                StoreEvent::SelectionChanged,
                StoreEvent::ElementsChanged,
                StoreEvent::TemplateChanged
            ]
        );

        assert!(store.unsubscribe(listener));
        store.rename_template("y");
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn align_and_nudge_are_single_steps() {
        let (mut store, ids) = store_with(2);
        store.add_to_selection(&ids);
        let depth = store.history().past_len();
        assert!(store.align_selected(PageEdge::Left));
        assert!(store.nudge_selected(10.0, 0.0));
        assert_eq!(store.history().past_len(), depth + 2);
        assert!(store.elements().all(|el| el.x == 10.0));
    }

    #[test]
    fn load_resets_history_and_selection() {
        let (mut store, _) = store_with(2);
        store.select_all();
        let template = Template {
            width: 0,
            ..Template::blank()
        };
        store.load(template, "not json".into());
        assert!(store.is_empty());
        assert!(store.selection().is_empty());
        assert!(!store.can_undo());
        assert_eq!(store.canvas().width, 1000);
    }
}
