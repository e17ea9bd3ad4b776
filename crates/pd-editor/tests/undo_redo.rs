//! Integration tests: undo/redo through the scene store (pd-editor).
//!
//! Every mutating store operation must be reversible by one `undo` and
//! re-applied by one `redo`, with the element list compared structurally.

use pd_core::geometry::PageEdge;
use pd_core::id::ElementId;
use pd_core::model::*;
use pd_editor::store::SceneStore;
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store_with_shapes(n: usize) -> (SceneStore, Vec<ElementId>) {
    let mut store = SceneStore::default();
    let ids = (0..n)
        .map(|i| {
            store
                .add_with(ElementType::Shape, |el| {
                    el.x = 100.0 * i as f64;
                    el.name = format!("Shape {i}");
                })
                .id
        })
        .collect();
    (store, ids)
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn add_text_then_undo_and_redo() {
    init_logs();
    let mut store = SceneStore::default();
    store.add(
        ElementType::Text,
        Some(&json!({ "content": "Hello", "fontSize": 32 })),
    );
    assert_eq!(store.len(), 1);

    assert!(store.undo());
    assert!(store.is_empty());
    assert!(store.selection().is_empty());

    assert!(store.redo());
    assert_eq!(store.len(), 1);
    let el = store.elements().next().unwrap();
    assert_eq!(el.element_type(), ElementType::Text);
    let text = el.as_text().unwrap();
    assert_eq!(text.content, "Hello");
    assert_eq!(text.font_size, 32.0);
}

#[test]
fn canvas_resize_rescales_and_undoes_as_one_step() {
    let mut store = SceneStore::default();
    assert_eq!(store.canvas(), CanvasSize::new(1000, 1500));
    let id = store
        .add_with(ElementType::Shape, |el| {
            el.x = 500.0;
            el.y = 750.0;
            el.width = 200.0;
            el.height = 200.0;
        })
        .id;
    let before = store.element_list();

    assert!(store.set_canvas_size(1080, 1080));
    let el = store.element(id).unwrap();
    assert_eq!((el.x, el.y, el.width, el.height), (540.0, 540.0, 216.0, 144.0));
    assert_eq!(store.canvas(), CanvasSize::new(1080, 1080));

    assert!(store.undo());
    assert_eq!(store.element_list(), before);
    assert_eq!(store.canvas(), CanvasSize::new(1000, 1500));

    assert!(store.redo());
    assert_eq!(store.canvas(), CanvasSize::new(1080, 1080));
    assert_eq!(store.element(id).unwrap().x, 540.0);
}

#[test]
fn zero_canvas_size_is_rejected() {
    let mut store = SceneStore::default();
    assert!(!store.set_canvas_size(0, 500));
    assert!(!store.set_canvas_size(1000, 1500));
    assert!(!store.can_undo());
}

// ─── Properties ─────────────────────────────────────────────────────────

#[test]
fn every_operation_is_reversible() {
    let (mut store, ids) = store_with_shapes(3);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    let ops: Vec<(&str, Box<dyn Fn(&mut SceneStore)>)> = vec![
        ("update", Box::new(move |s: &mut SceneStore| {
            s.update(a, |el| el.rotation = 45.0);
        })),
        ("patch", Box::new(move |s: &mut SceneStore| {
            s.patch(b, &json!({ "fill": "#FF0000", "opacity": 0.5 }));
        })),
        ("delete", Box::new(move |s: &mut SceneStore| {
            s.delete(&[a, c]);
        })),
        ("duplicate", Box::new(move |s: &mut SceneStore| {
            s.select(Some(b));
            s.duplicate_selected();
        })),
        ("reorder", Box::new(move |s: &mut SceneStore| {
            s.reorder(&[c, a, b]);
        })),
        ("move_up", Box::new(move |s: &mut SceneStore| {
            s.move_up(a);
        })),
        ("send_to_back", Box::new(move |s: &mut SceneStore| {
            s.send_to_back(c);
        })),
        ("lock", Box::new(move |s: &mut SceneStore| {
            s.toggle_lock(b);
        })),
        ("align", Box::new(move |s: &mut SceneStore| {
            s.add_to_selection(&[a, b]);
            s.align_selected(PageEdge::Bottom);
        })),
        ("nudge", Box::new(move |s: &mut SceneStore| {
            s.select(Some(c));
            s.nudge_selected(-3.0, 7.0);
        })),
        ("add", Box::new(|s: &mut SceneStore| {
            s.add(ElementType::Overlay, None);
        })),
        ("canvas", Box::new(|s: &mut SceneStore| {
            s.set_canvas_size(1080, 1920);
        })),
    ];

    for (name, op) in &ops {
        let before = store.element_list();
        op(&mut store);
        let after = store.element_list();
        assert_ne!(before, after, "{name} changed nothing");

        assert!(store.undo(), "{name}: undo");
        assert_eq!(store.element_list(), before, "{name}: undo restores");
        assert!(store.redo(), "{name}: redo");
        assert_eq!(store.element_list(), after, "{name}: redo re-applies");
        assert!(store.undo());
    }
}

#[test]
fn new_action_clears_redo() {
    let (mut store, ids) = store_with_shapes(1);
    store.update(ids[0], |el| el.x = 1.0);
    store.undo();
    assert!(store.can_redo());
    store.update(ids[0], |el| el.x = 2.0);
    assert!(!store.can_redo());
}

#[test]
fn history_is_capped_at_fifty() {
    let (mut store, ids) = store_with_shapes(1);
    for i in 0..60 {
        store.update(ids[0], |el| el.x = f64::from(i) + 1000.0);
    }
    assert_eq!(store.history().past_len(), 50);

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The oldest ten updates were dropped: x is from update #9.
    assert_eq!(store.element(ids[0]).unwrap().x, 1009.0);
}

#[test]
fn duplicate_preserves_everything_but_identity_and_offset() {
    let (mut store, ids) = store_with_shapes(2);
    store.update(ids[1], |el| {
        el.rotation = 30.0;
        el.height = 55.0;
    });
    store.add_to_selection(&ids);
    let originals = store.element_list();
    let existing: Vec<ElementId> = originals.iter().map(|el| el.id).collect();

    let clones = store.duplicate_selected();
    assert_eq!(clones.len(), 2);
    assert!(clones.iter().all(|id| !existing.contains(id)));
    assert_ne!(clones[0], clones[1]);
    assert_eq!(store.selection().to_vec(), clones);

    for (original, clone_id) in originals.iter().zip(&clones) {
        let clone = store.element(*clone_id).unwrap();
        assert_eq!(clone.x, original.x + 20.0);
        assert_eq!(clone.y, original.y + 20.0);
        let mut shifted = clone.clone();
        shifted.id = original.id;
        shifted.x = original.x;
        shifted.y = original.y;
        assert_eq!(&shifted, original);
    }
    assert_eq!(&store.element_list()[..2], &originals[..]);
}

#[test]
fn empty_selection_bulk_ops_are_noops() {
    let (mut store, _) = store_with_shapes(2);
    store.clear_selection();
    let depth = store.history().past_len();
    assert_eq!(store.delete_selected(), 0);
    assert!(store.duplicate_selected().is_empty());
    assert!(!store.nudge_selected(5.0, 5.0));
    assert_eq!(store.history().past_len(), depth);
}

#[test]
fn delete_purges_selection() {
    let (mut store, ids) = store_with_shapes(3);
    store.add_to_selection(&ids);
    assert_eq!(store.delete(&[ids[1]]), 1);
    assert!(!store.selection().contains(ids[1]));
    assert_eq!(store.selection().len(), 2);

    assert_eq!(store.delete_selected(), 2);
    assert!(store.selection().is_empty());
    assert!(store.is_empty());

    // Undo brings the elements back but not their selection.
    store.undo();
    assert_eq!(store.len(), 2);
    assert!(store.selection().is_empty());
}

#[test]
fn serialize_and_reload() {
    let (mut store, _) = store_with_shapes(2);
    store.rename_template("Summer Salads");
    let saved = store.serialize().unwrap();

    let mut other = SceneStore::default();
    other.load(saved.template.clone(), saved.elements_json.clone().into());
    assert_eq!(other.element_list(), store.element_list());
    assert_eq!(other.template().name, "Summer Salads");
    assert!(!other.can_undo());

    other.reset();
    assert!(other.is_empty());
    assert_eq!(other.template(), &Template::blank());
}
