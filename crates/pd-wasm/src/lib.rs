//! WASM bridge exposing the template editing engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the template
//! editor page. Structured values cross the boundary as JSON strings.

mod measure;

use measure::CanvasTextMeasurer;
use pd_core::binding::bound_text;
use pd_core::config::EditorConfig;
use pd_core::cover::{FitAdjust, cover_fit};
use pd_core::effects::resolve_effect;
use pd_core::geometry::{
    HandleSide, PageEdge, ResizeHandle, group_bounds, overlay_side, place_overlay,
    rotated_bounding_box,
};
use pd_core::id::ElementId;
use pd_core::model::{Element, ElementType, Template};
use pd_core::persist::ElementsJson;
use pd_core::proxy::ProxyRule;
use pd_core::text_fit::{FontSpec, GlyphWidthMeasurer, TextMeasurer, effective_font_size};
use pd_core::{Size, interpolate, resolve_binding};
use pd_editor::input::{HandleTarget, InputEvent, Modifiers};
use pd_editor::interaction::{InteractionController, Mode};
use pd_editor::store::{SceneStore, StoreEvent};
use pd_render::images::{ImageEvent, ImageLoader, ImageState};
use pd_render::scene::{RenderContext, image_state_for, image_url_for, request_images};
use pd_render::PlatformFetcher;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Text measurement backend: the page canvas once attached, a glyph-width
/// estimate before that.
enum Measurer {
    Glyph(GlyphWidthMeasurer),
    Canvas(CanvasTextMeasurer),
}

impl TextMeasurer for Measurer {
    fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
        match self {
            Self::Glyph(m) => m.measure_wrapped_height(text, width, font),
            Self::Canvas(m) => m.measure_wrapped_height(text, width, font),
        }
    }
}

/// The main WASM-facing editor controller.
///
/// Holds the scene store, the interaction state machine, the image cache
/// and the render-time data record. All interaction from the page goes
/// through this struct.
#[wasm_bindgen]
pub struct PdCanvas {
    store: SceneStore,
    controller: InteractionController,
    measurer: Measurer,
    /// Binding record and per-element image overrides.
    render: RenderContext,
    images: ImageLoader<PlatformFetcher>,
    image_events: broadcast::Receiver<ImageEvent>,
    /// Store events since the last `take_events`.
    pending: Rc<RefCell<Vec<StoreEvent>>>,
}

#[wasm_bindgen]
impl PdCanvas {
    /// Create an editor. `config_json` is a (possibly partial) editor
    /// configuration; malformed JSON falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref().map(EditorConfig::from_json_str) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("invalid editor config, using defaults: {e}");
                EditorConfig::default()
            }
            None => EditorConfig::default(),
        };
        let proxy = ProxyRule::from_config(&config).unwrap_or_else(|e| {
            log::warn!("invalid page origin {:?}: {e}", config.origin);
            ProxyRule::default()
        });

        let controller = InteractionController::new(&config);
        let render = RenderContext {
            min_font_size: config.min_font_size,
            ..RenderContext::default()
        };
        let images = ImageLoader::new(platform_fetcher(&proxy), proxy);
        let image_events = images.subscribe();
        let mut store = SceneStore::new(config);
        let pending = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pending);
        store.subscribe(move |event| {
            let mut events = sink.borrow_mut();
            if !events.contains(&event) {
                events.push(event);
            }
        });

        Self {
            store,
            controller,
            measurer: Measurer::Glyph(GlyphWidthMeasurer::default()),
            render,
            images,
            image_events,
            pending,
        }
    }

    /// Measure text with the page's canvas from now on.
    pub fn set_measure_context(&mut self, ctx: CanvasRenderingContext2d) {
        self.measurer = Measurer::Canvas(CanvasTextMeasurer::new(ctx));
    }

    /// Store changes since the last call, as a JSON array of
    /// `"elements" | "selection" | "template"`.
    pub fn take_events(&self) -> String {
        let names: Vec<&str> = self
            .pending
            .borrow_mut()
            .drain(..)
            .map(|event| match event {
                StoreEvent::ElementsChanged => "elements",
                StoreEvent::SelectionChanged => "selection",
                StoreEvent::TemplateChanged => "template",
            })
            .collect();
        to_json(&names)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Open a saved design. The element list is parsed defensively; only a
    /// malformed template record is rejected.
    pub fn load(&mut self, template_json: &str, elements_json: &str) -> bool {
        match serde_json::from_str::<Template>(template_json) {
            Ok(template) => {
                self.store.load(template, ElementsJson::from(elements_json));
                self.controller.cancel_text_edit();
                self.images.clear();
                self.render.image_overrides.clear();
                true
            }
            Err(e) => {
                log::warn!("invalid template record: {e}");
                false
            }
        }
    }

    /// `{"template":{..},"elementsJson":"[..]"}`, or `""` on failure.
    pub fn serialize(&self) -> String {
        self.store
            .serialize()
            .and_then(|saved| serde_json::to_string(&saved))
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.controller.cancel_text_edit();
        self.images.clear();
        self.render.image_overrides.clear();
    }

    pub fn template_json(&self) -> String {
        to_json(self.store.template())
    }

    /// The element list, back to front.
    pub fn elements_json(&self) -> String {
        let elements: Vec<&Element> = self.store.elements().collect();
        to_json(&elements)
    }

    pub fn element_json(&self, id: &str) -> String {
        self.lookup(id)
            .and_then(|id| self.store.element(id))
            .map_or_else(|| "null".to_string(), to_json)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Add an element of `type_name` (`text`, `imageSlot`, ...) with
    /// optional JSON defaults. Returns the new id, or `""` for an unknown
    /// type.
    pub fn add(&mut self, type_name: &str, defaults_json: Option<String>) -> String {
        let Some(ty) = ElementType::from_name(type_name) else {
            log::warn!("unknown element type {type_name:?}");
            return String::new();
        };
        let defaults = defaults_json.as_deref().and_then(|raw| {
            serde_json::from_str::<Value>(raw)
                .inspect_err(|e| log::warn!("ignoring malformed defaults: {e}"))
                .ok()
        });
        self.store.add(ty, defaults.as_ref()).id.as_str().to_string()
    }

    /// Shallow-merge a JSON object into an element.
    pub fn update(&mut self, id: &str, patch_json: &str) -> bool {
        let Some(id) = self.lookup(id) else {
            return false;
        };
        match serde_json::from_str::<Value>(patch_json) {
            Ok(patch) => self.store.patch(id, &patch),
            Err(e) => {
                log::warn!("malformed patch for {id}: {e}");
                false
            }
        }
    }

    /// Delete the ids in a JSON array. Returns how many were removed.
    pub fn delete(&mut self, ids_json: &str) -> usize {
        let ids = self.parse_ids(ids_json);
        let removed = self.store.delete(&ids);
        self.prune_images();
        removed
    }

    pub fn delete_selected(&mut self) -> usize {
        let removed = self.store.delete_selected();
        self.prune_images();
        removed
    }

    /// Returns the clone ids as a JSON array.
    pub fn duplicate_selected(&mut self) -> String {
        ids_to_json(&self.store.duplicate_selected())
    }

    pub fn reorder(&mut self, ids_json: &str) -> bool {
        let ids = self.parse_ids(ids_json);
        self.store.reorder(&ids)
    }

    pub fn move_up(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.move_up(id))
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.move_down(id))
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.bring_to_front(id))
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.send_to_back(id))
    }

    pub fn toggle_lock(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.toggle_lock(id))
    }

    /// `edge` is one of `left`, `center`, `right`, `top`, `middle`, `bottom`.
    pub fn align_selected(&mut self, edge: &str) -> bool {
        PageEdge::from_name(edge).is_some_and(|edge| self.store.align_selected(edge))
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        self.store.nudge_selected(dx, dy)
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> bool {
        self.store.set_canvas_size(width, height)
    }

    pub fn rename_template(&mut self, name: &str) {
        self.store.rename_template(name);
    }

    pub fn set_background_color(&mut self, color: &str) {
        self.store.set_background_color(color);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select one element, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<String>) -> bool {
        let id = id.as_deref().and_then(|id| self.lookup(id));
        self.store.select(id)
    }

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.lookup(id).is_some_and(|id| self.store.toggle_selection(id))
    }

    pub fn add_to_selection(&mut self, ids_json: &str) -> bool {
        let ids = self.parse_ids(ids_json);
        self.store.add_to_selection(&ids)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.store.clear_selection()
    }

    pub fn select_all(&mut self) -> bool {
        self.store.select_all()
    }

    /// Selected ids as a JSON array, in selection order.
    pub fn selection(&self) -> String {
        ids_to_json(&self.store.selection().to_vec())
    }

    pub fn first_selected(&self) -> Option<String> {
        self.store.first_selected().map(|id| id.as_str().to_string())
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Pointer pressed on the canvas. Returns true if anything changed.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let event = InputEvent::pointer_down(x, y, modifiers(shift, ctrl, alt, meta));
        self.controller.handle(&mut self.store, &event)
    }

    /// Pointer pressed on a transform handle of the selected element.
    /// `handle` is a resize handle (`top-left`, `right`, ...) or
    /// `rotate-top` / `rotate-bottom`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_handle_down(
        &mut self,
        x: f64,
        y: f64,
        handle: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let Some(target) = parse_handle(handle) else {
            log::warn!("unknown handle {handle:?}");
            return false;
        };
        let event = InputEvent::handle_down(x, y, modifiers(shift, ctrl, alt, meta), target);
        self.controller.handle(&mut self.store, &event)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let event = InputEvent::pointer_move(x, y, modifiers(shift, ctrl, alt, meta));
        self.controller.handle(&mut self.store, &event)
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.controller.handle(&mut self.store, &InputEvent::pointer_up(x, y))
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.controller
            .handle(&mut self.store, &InputEvent::DoubleClick { x, y })
    }

    /// `key` is `KeyboardEvent.key`. Returns true when the key was consumed
    /// and the page should `preventDefault`.
    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let event = InputEvent::key(key, modifiers(shift, ctrl, alt, meta));
        self.controller.handle(&mut self.store, &event)
    }

    /// `idle`, `selecting`, `dragging`, `transforming` or `rotating`.
    pub fn mode(&self) -> String {
        match self.controller.mode() {
            Mode::Idle => "idle",
            Mode::Selecting => "selecting",
            Mode::Dragging => "dragging",
            Mode::Transforming => "transforming",
            Mode::Rotating => "rotating",
        }
        .to_string()
    }

    /// Active smart guides: `{"vertical":x|null,"horizontal":y|null}`.
    pub fn guides(&self) -> String {
        to_json(&self.controller.guides())
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.controller.toggle_grid()
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// The text element being edited in place, if any.
    pub fn editing(&self) -> Option<String> {
        self.controller.editing().map(|id| id.as_str().to_string())
    }

    pub fn commit_text_edit(&mut self, content: &str) -> bool {
        self.controller.commit_text_edit(&mut self.store, content)
    }

    pub fn cancel_text_edit(&mut self) -> bool {
        self.controller.cancel_text_edit()
    }

    // ─── Render-time resolution ──────────────────────────────────────────

    /// Set the record bindings resolve against. Malformed JSON clears it.
    pub fn set_data(&mut self, data_json: &str) -> bool {
        match serde_json::from_str(data_json) {
            Ok(data) => {
                self.render.data = data;
                true
            }
            Err(e) => {
                log::warn!("invalid binding data: {e}");
                self.render.data = Value::Null;
                false
            }
        }
    }

    /// Text an element displays after binding and placeholder substitution.
    pub fn display_text(&self, id: &str) -> Option<String> {
        let props = self.element(id)?.as_text()?;
        Some(bound_text(&props.content, props.binding.as_deref(), &self.render.data))
    }

    /// Font size a text element is drawn at, auto-fit applied. `0` for
    /// anything that is not text.
    pub fn display_font_size(&self, id: &str) -> f64 {
        let Some(el) = self.element(id) else {
            return 0.0;
        };
        let Some(content) = self.display_text(id) else {
            return 0.0;
        };
        effective_font_size(el, &content, self.render.min_font_size, &self.measurer)
    }

    /// Resolved text-effect paint as JSON, or `null` for non-text.
    pub fn effect_paint(&self, id: &str) -> String {
        self.element(id)
            .and_then(Element::as_text)
            .map_or_else(
                || "null".to_string(),
                |props| to_json(&resolve_effect(props.effect.as_ref(), &props.color)),
            )
    }

    /// Where to draw an `image_width × image_height` bitmap inside an
    /// image slot: `{"scale","x","y","width","height"}` relative to the
    /// slot, or `null`.
    pub fn cover_fit(&self, id: &str, image_width: f64, image_height: f64) -> String {
        let Some(el) = self.element(id) else {
            return "null".to_string();
        };
        let Some(slot) = el.as_image_slot() else {
            return "null".to_string();
        };
        let adjust = FitAdjust {
            zoom: slot.zoom,
            offset_x: slot.offset_x,
            offset_y: slot.offset_y,
        };
        let fit = cover_fit(
            Size::new(image_width, image_height),
            Size::new(el.width, el.height),
            adjust,
        );
        to_json(&json!({
            "scale": fit.scale,
            "x": fit.x,
            "y": fit.y,
            "width": fit.width,
            "height": fit.height,
        }))
    }

    /// Rewrite an image URL through the same-origin proxy when needed.
    pub fn proxied_url(&self, url: &str) -> String {
        self.images.proxy().proxied_url(url).into_owned()
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Show `url` in an image slot or logo instead of its binding or static
    /// URL; `None` removes the override.
    pub fn set_image_override(&mut self, id: &str, url: Option<String>) -> bool {
        let Some(id) = self.lookup(id) else {
            return false;
        };
        match url.filter(|url| !url.trim().is_empty()) {
            Some(url) => self.render.image_overrides.insert(id, url),
            None => self.render.image_overrides.remove(&id),
        };
        true
    }

    /// The URL an element displays (override, then binding, then static
    /// URL), unproxied.
    pub fn image_url(&self, id: &str) -> Option<String> {
        image_url_for(self.element(id)?, &self.render)
    }

    /// Start loading the image an element displays. Returns false when no
    /// load started: no URL, already loading or loaded from that URL, or
    /// failed (see `retry_image`).
    pub fn resolve_image(&mut self, id: &str) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        image_url_for(el, &self.render).is_some_and(|url| self.images.resolve(el.id, &url))
    }

    /// Reload a failed (or in-flight) image.
    pub fn retry_image(&mut self, id: &str) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        image_url_for(el, &self.render).is_some_and(|url| self.images.retry(el.id, &url))
    }

    /// Resolve every image in the scene and drop cache entries of deleted
    /// elements. Returns how many loads started.
    pub fn request_images(&mut self) -> usize {
        self.prune_images();
        request_images(&self.images, self.store.elements(), &self.render)
    }

    /// `unrequested`, `loading`, `loaded` or `failed` for the URL the
    /// element displays now.
    pub fn image_state(&self, id: &str) -> String {
        self.element(id)
            .map_or(ImageState::Unrequested, |el| image_state_for(el, &self.render, &self.images))
            .as_str()
            .to_string()
    }

    pub fn image_error(&self, id: &str) -> Option<String> {
        self.lookup(id).and_then(|id| self.images.error(id))
    }

    /// Where the loaded bitmap sits inside an image slot (cover-fit with
    /// zoom and pan), or `null` until it has loaded.
    pub fn image_placement(&self, id: &str) -> String {
        let Some(el) = self.element(id) else {
            return "null".to_string();
        };
        if image_state_for(el, &self.render, &self.images) != ImageState::Loaded {
            return "null".to_string();
        }
        match self.images.bitmap(el.id).map(|bitmap| bitmap.size()) {
            Some(size) => self.cover_fit(id, size.width, size.height),
            None => "null".to_string(),
        }
    }

    /// Image state changes since the last call, as a JSON array of
    /// `{"id","state"}`, oldest first.
    pub fn take_image_events(&mut self) -> String {
        let mut events = Vec::new();
        loop {
            match self.image_events.try_recv() {
                Ok(ImageEvent { id, state }) => {
                    events.push(json!({ "id": id.as_str(), "state": state.as_str() }));
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("missed {skipped} image event(s)");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        to_json(&events)
    }

    // ─── Overlays ────────────────────────────────────────────────────────

    /// Rotated envelope of one element, or of the whole selection when `id`
    /// is `None`: `{"minX","minY","maxX","maxY"}` or `null`.
    pub fn bounds(&self, id: Option<String>) -> String {
        let bounds = match id {
            Some(id) => self.element(&id).map(rotated_bounding_box),
            None => group_bounds(self.store.selected_elements()),
        };
        bounds.map_or_else(|| "null".to_string(), |b| to_json(&b))
    }

    /// Place a floating toolbar of `overlay_width × overlay_height` next to
    /// the selection, kept inside the viewport. All values share the same
    /// units. Returns `{"x","y","side"}` or `null` with no selection.
    pub fn overlay_position(
        &self,
        viewport_width: f64,
        viewport_height: f64,
        overlay_width: f64,
        overlay_height: f64,
        gap: f64,
        padding: f64,
    ) -> String {
        let Some(target) = group_bounds(self.store.selected_elements()) else {
            return "null".to_string();
        };
        let at = place_overlay(
            &target,
            Size::new(viewport_width, viewport_height),
            Size::new(overlay_width, overlay_height),
            gap,
            padding,
        );
        to_json(&json!({
            "x": at.x,
            "y": at.y,
            "side": overlay_side(&target, at.y),
        }))
    }
}

impl PdCanvas {
    fn lookup(&self, id: &str) -> Option<ElementId> {
        let id = ElementId::get(id)?;
        self.store.element(id).map(|_| id)
    }

    fn element(&self, id: &str) -> Option<&Element> {
        self.store.element(ElementId::get(id)?)
    }

    /// Drop cache entries and overrides of elements no longer in the scene.
    fn prune_images(&mut self) {
        let store = &self.store;
        self.images.retain(|id| store.element(id).is_some());
        self.render
            .image_overrides
            .retain(|id, _| store.element(*id).is_some());
    }

    /// Unknown ids are dropped.
    fn parse_ids(&self, ids_json: &str) -> Vec<ElementId> {
        match serde_json::from_str::<Vec<String>>(ids_json) {
            Ok(ids) => ids.iter().filter_map(|id| ElementId::get(id)).collect(),
            Err(e) => {
                log::warn!("expected a JSON array of ids: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_fetcher(_proxy: &ProxyRule) -> PlatformFetcher {
    pd_render::ImageElementFetcher
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_fetcher(proxy: &ProxyRule) -> PlatformFetcher {
    pd_render::HttpImageFetcher::for_rule(proxy)
}

impl Default for PdCanvas {
    fn default() -> Self {
        Self::new(None)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        ctrl,
        shift,
        alt,
        meta,
    }
}

fn parse_handle(name: &str) -> Option<HandleTarget> {
    match name {
        "rotate-top" => Some(HandleTarget::Rotate(HandleSide::Top)),
        "rotate-bottom" => Some(HandleTarget::Rotate(HandleSide::Bottom)),
        other => ResizeHandle::from_name(other).map(HandleTarget::Resize),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn ids_to_json(ids: &[ElementId]) -> String {
    to_json(ids)
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no editor needed) ───────────────────────────────

/// Resolve a dot path against a JSON record, falling back to `fallback`.
#[wasm_bindgen(js_name = resolveBinding)]
pub fn resolve_binding_js(path: &str, data_json: &str, fallback: &str) -> String {
    match serde_json::from_str::<Value>(data_json) {
        Ok(data) => resolve_binding(path, &data, fallback),
        Err(_) => fallback.to_string(),
    }
}

/// Substitute `{{path}}` placeholders in `content`.
#[wasm_bindgen(js_name = interpolate)]
pub fn interpolate_js(content: &str, data_json: &str) -> String {
    match serde_json::from_str::<Value>(data_json) {
        Ok(data) => interpolate(content, &data),
        Err(_) => content.to_string(),
    }
}

/// The CORS-safety rewrite without an editor instance.
#[wasm_bindgen(js_name = getProxiedUrl)]
pub fn get_proxied_url(url: &str, endpoint: &str, origin: Option<String>) -> String {
    match ProxyRule::new(endpoint, origin.as_deref()) {
        Ok(rule) => rule.proxied_url(url).into_owned(),
        Err(_) => url.to_string(),
    }
}
