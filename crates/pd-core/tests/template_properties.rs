//! Integration tests: stored template → model, and the geometric
//! properties the editor relies on (pd-core).

use pd_core::cover::{FitAdjust, cover_fit};
use pd_core::effects::EffectKind;
use pd_core::geometry::{Bounds, rotated_bounding_box};
use pd_core::id::ElementId;
use pd_core::model::*;
use pd_core::persist::{ElementsJson, load_elements, serialize};
use pd_core::snap::{SnapEngine, SnapSettings};
use pd_core::text_fit::{FontSpec, GlyphWidthMeasurer, TextMeasurer, fit_font_size};
use pd_core::{Size, interpolate};
use pretty_assertions::assert_eq;
use serde_json::json;

const RECIPE_PIN: &str = include_str!("fixtures/recipe_pin.json");

// ─── Loading ─────────────────────────────────────────────────────────────

#[test]
fn loads_the_recipe_pin_fixture() {
    let elements = load_elements(ElementsJson::from(RECIPE_PIN));
    // The unknown "sparkles" entry is skipped.
    assert_eq!(elements.len(), 6);

    let ids: Vec<&str> = elements.iter().map(|el| el.id.as_str()).collect();
    assert_eq!(&ids[..4], &["bg", "hero", "title", "badge"]);
    assert_ne!(elements[4].id, ElementId::intern("title"));
    assert!(elements[4].id.as_str().starts_with("text_"));

    assert_eq!(elements[3].rotation, 10.0);

    let slot = elements[1].as_image_slot().unwrap();
    assert_eq!(slot.binding.as_deref(), Some("recipe.image"));
    assert_eq!(slot.source_type, SourceType::Binding);
    assert_eq!(slot.zoom, 1.2);

    let title = elements[2].as_text().unwrap();
    assert_eq!(title.font_weight, "700");
    assert_eq!(title.effect.as_ref().map(|e| e.kind), Some(EffectKind::Shadow));
    assert_eq!(
        interpolate(&title.content, &json!({ "recipe": { "title": "Plum Galette" } })),
        "Plum Galette"
    );
}

#[test]
fn string_and_list_forms_load_the_same() {
    let list: Vec<serde_json::Value> = serde_json::from_str(RECIPE_PIN).unwrap();
    let from_list = load_elements(ElementsJson::from(list));
    let from_text = load_elements(ElementsJson::from(RECIPE_PIN));
    // Re-assigned duplicate ids differ between loads; compare the rest.
    assert_eq!(&from_list[..4], &from_text[..4]);
    assert_eq!(from_list[5], from_text[5]);
}

#[test]
fn saved_elements_reload_unchanged() {
    let elements = load_elements(ElementsJson::from(RECIPE_PIN));
    let saved = serialize(&Template::blank(), &elements).unwrap();
    assert_eq!(load_elements(ElementsJson::from(saved.elements_json)), elements);
}

// ─── Geometry ────────────────────────────────────────────────────────────

fn rect(w: f64, h: f64, rotation: f64) -> Element {
    let mut el = Element::with_defaults(ElementType::Shape, ElementId::intern("prop_rect"), CanvasSize::default());
    el.x = 100.0;
    el.y = 50.0;
    el.width = w;
    el.height = h;
    el.rotation = rotation;
    el
}

#[test]
fn unrotated_box_is_its_own_envelope() {
    assert_eq!(
        rotated_bounding_box(&rect(300.0, 120.0, 0.0)),
        Bounds {
            min_x: 100.0,
            min_y: 50.0,
            max_x: 400.0,
            max_y: 170.0,
        }
    );
}

#[test]
fn quarter_turn_swaps_envelope_extents() {
    for (w, h) in [(300.0, 120.0), (40.0, 900.0), (1.0, 2.0)] {
        let b = rotated_bounding_box(&rect(w, h, 90.0));
        assert!((b.width() - h).abs() < 1e-9, "{w}×{h}: width {}", b.width());
        assert!((b.height() - w).abs() < 1e-9, "{w}×{h}: height {}", b.height());
    }
}

#[test]
fn cover_fit_always_covers_the_slot() {
    let images = [(4000.0, 3000.0), (600.0, 1800.0), (512.0, 512.0), (10.0, 2000.0)];
    let slots = [(400.0, 400.0), (1000.0, 300.0), (250.0, 900.0)];
    for (iw, ih) in images {
        for (sw, sh) in slots {
            let fit = cover_fit(Size::new(iw, ih), Size::new(sw, sh), FitAdjust::default());
            let eps = 1e-9;
            assert!(fit.width >= sw - eps && fit.height >= sh - eps, "{iw}×{ih} in {sw}×{sh}");
            let exact_w = (fit.width - sw).abs() < eps;
            let exact_h = (fit.height - sh).abs() < eps;
            assert!(exact_w || exact_h, "{iw}×{ih} in {sw}×{sh}: no exact axis");
            assert!(fit.x <= 0.0 && fit.x + fit.width >= sw - eps);
            assert!(fit.y <= 0.0 && fit.y + fit.height >= sh - eps);
        }
    }
}

#[test]
fn zoom_and_pan_never_expose_the_slot_edge() {
    let adjust = FitAdjust {
        zoom: 1.5,
        offset_x: 10_000.0,
        offset_y: -10_000.0,
    };
    let fit = cover_fit(Size::new(800.0, 600.0), Size::new(400.0, 400.0), adjust);
    assert_eq!(fit.x, 0.0);
    assert!((fit.y + fit.height - 400.0).abs() < 1e-9);
}

// ─── Auto-fit ────────────────────────────────────────────────────────────

#[test]
fn fitted_size_is_the_largest_that_fits() {
    let measurer = GlyphWidthMeasurer::default();
    let text = "Brown Butter Chocolate Chip Cookies with Flaky Sea Salt";
    let base = FontSpec {
        family: "Inter".into(),
        size: 96.0,
        weight: "700".into(),
        style: FontStyle::Normal,
        line_height: 1.2,
        letter_spacing: 0.0,
    };

    for (width, height) in [(840.0, 220.0), (400.0, 100.0), (600.0, 400.0)] {
        let size = fit_font_size(text, width, height, &base, 10.0, &measurer);
        let height_at = |s: f64| measurer.measure_wrapped_height(text, width, &base.with_size(s));
        assert!(size >= 10.0 && size <= 96.0);
        if size > 10.0 {
            assert!(height_at(size) <= height, "{size}px overflows {width}×{height}");
        }
        if size < 96.0 {
            assert!(height_at(size + 1.0) > height, "{}px also fits {width}×{height}", size + 1.0);
        }
    }
}

// ─── Snapping ────────────────────────────────────────────────────────────

#[test]
fn snapping_engages_only_within_threshold() {
    let canvas = CanvasSize::default();
    let mut snap = SnapEngine::new(SnapSettings::default());

    // Center at 497: 3 units from the canvas center line.
    let near = Bounds {
        min_x: 397.0,
        min_y: 200.0,
        max_x: 597.0,
        max_y: 300.0,
    };
    let correction = snap.snap_move(&near, canvas, &[]);
    assert_eq!(correction.x, 3.0);
    assert_eq!(snap.guides().vertical, Some(500.0));

    // Nothing within 8 units on either axis.
    let far = near.translate(pd_core::Vec2::new(-30.0, 7.0));
    let correction = snap.snap_move(&far, canvas, &[]);
    assert_eq!((correction.x, correction.y), (0.0, 0.0));
    assert!(snap.guides().is_empty());
}
