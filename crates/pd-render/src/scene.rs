//! Resolved element list for an external rasterizer.
//!
//! Applies everything that depends on render-time inputs: data bindings,
//! `{{path}}` placeholders, auto-fit font sizes, text effects, the image
//! URL priority (override, then binding, then static URL) and cover-fit
//! placement of loaded bitmaps.

use crate::images::{ImageFetcher, ImageLoader, ImageState};
use pd_core::binding::{bound_text, resolve_path, value_to_text};
use pd_core::cover::{CoverFit, FitAdjust, cover_fit};
use pd_core::effects::{EffectPaint, resolve_effect};
use pd_core::geometry::Frame;
use pd_core::id::ElementId;
use pd_core::model::*;
use pd_core::text_fit::{FontSpec, MIN_FONT_SIZE, TextMeasurer, apply_text_transform, effective_font_size};
use pd_core::Size;
use serde_json::Value;
use std::collections::HashMap;

/// Render-time inputs that are not part of the template.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Record bindings and placeholders resolve against.
    pub data: Value,
    /// Per-element image URLs that beat both binding and static URL.
    pub image_overrides: HashMap<ElementId, String>,
    pub min_font_size: f64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            data: Value::Null,
            image_overrides: HashMap::new(),
            min_font_size: MIN_FONT_SIZE,
        }
    }
}

impl RenderContext {
    pub fn with_data(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}

/// Content of a text element after binding and placeholder substitution,
/// before `textTransform`.
pub fn text_content(props: &TextProps, ctx: &RenderContext) -> String {
    bound_text(&props.content, props.binding.as_deref(), &ctx.data)
}

/// The URL an image-bearing element should display, if any.
pub fn image_url_for(element: &Element, ctx: &RenderContext) -> Option<String> {
    if let Some(url) = ctx.image_overrides.get(&element.id)
        && !url.trim().is_empty()
    {
        return Some(url.clone());
    }
    match &element.kind {
        ElementKind::ImageSlot(slot) => slot
            .binding
            .as_deref()
            .and_then(|path| resolve_path(&ctx.data, path))
            .and_then(value_to_text)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| slot.image_url.clone()),
        ElementKind::Logo(logo) => logo.image_url.clone(),
        _ => None,
    }
    .filter(|url| !url.trim().is_empty())
}

// ─── Resolved items ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedText {
    /// Final display text, transform applied.
    pub content: String,
    /// Font at the effective (possibly auto-fit) size.
    pub font: FontSpec,
    pub color: String,
    pub align: TextAlign,
    pub decoration: TextDecoration,
    pub effect: EffectPaint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub url: Option<String>,
    pub state: ImageState,
    /// Present once the bitmap for `url` is loaded.
    pub placement: Option<CoverFit>,
    pub border_radius: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemPaint {
    Text(ResolvedText),
    Image(ResolvedImage),
    Fill {
        color: String,
        opacity: f64,
        border_radius: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: ElementId,
    pub frame: Frame,
    pub paint: ItemPaint,
}

/// Everything a rasterizer needs for one frame, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScene {
    pub canvas: CanvasSize,
    pub background: String,
    pub items: Vec<RenderItem>,
}

/// Load state of the image `element` displays now. A load of a URL the
/// element no longer points at counts as unrequested.
pub fn image_state_for<F: ImageFetcher>(element: &Element, ctx: &RenderContext, loader: &ImageLoader<F>) -> ImageState {
    current_state(loader, element.id, image_url_for(element, ctx).as_deref())
}

fn current_state<F: ImageFetcher>(loader: &ImageLoader<F>, id: ElementId, url: Option<&str>) -> ImageState {
    match url {
        Some(url) if loader.url(id).as_deref() == Some(url.trim()) => loader.state(id),
        _ => ImageState::Unrequested,
    }
}

fn resolve_image<F: ImageFetcher>(
    element: &Element,
    ctx: &RenderContext,
    loader: &ImageLoader<F>,
    adjust: FitAdjust,
    border_radius: f64,
    opacity: f64,
) -> ResolvedImage {
    let url = image_url_for(element, ctx);
    let state = current_state(loader, element.id, url.as_deref());
    let placement = (state == ImageState::Loaded)
        .then(|| loader.bitmap(element.id))
        .flatten()
        .map(|bitmap| cover_fit(bitmap.size(), Size::new(element.width, element.height), adjust));
    ResolvedImage {
        url,
        state,
        placement,
        border_radius,
        opacity,
    }
}

/// Resolve `elements` (in z-order) for painting.
pub fn resolve_scene<'a, F: ImageFetcher>(
    template: &Template,
    elements: impl IntoIterator<Item = &'a Element>,
    ctx: &RenderContext,
    loader: &ImageLoader<F>,
    measurer: &impl TextMeasurer,
) -> ResolvedScene {
    let items = elements
        .into_iter()
        .map(|element| {
            let paint = match &element.kind {
                ElementKind::Text(props) => {
                    let content = text_content(props, ctx);
                    let size = effective_font_size(element, &content, ctx.min_font_size, measurer);
                    ItemPaint::Text(ResolvedText {
                        content: apply_text_transform(&content, props.text_transform).into_owned(),
                        font: FontSpec::from_text(props).with_size(size),
                        color: props.color.clone(),
                        align: props.text_align,
                        decoration: props.text_decoration,
                        effect: resolve_effect(props.effect.as_ref(), &props.color),
                    })
                }
                ElementKind::ImageSlot(slot) => {
                    let adjust = FitAdjust {
                        zoom: slot.zoom,
                        offset_x: slot.offset_x,
                        offset_y: slot.offset_y,
                    };
                    ItemPaint::Image(resolve_image(element, ctx, loader, adjust, slot.border_radius, 1.0))
                }
                ElementKind::Logo(logo) => {
                    ItemPaint::Image(resolve_image(element, ctx, loader, FitAdjust::default(), 0.0, logo.opacity))
                }
                ElementKind::Shape(shape) => ItemPaint::Fill {
                    color: shape.fill.clone(),
                    opacity: shape.opacity,
                    border_radius: shape.border_radius,
                },
                ElementKind::Overlay(overlay) => ItemPaint::Fill {
                    color: overlay.fill.clone(),
                    opacity: overlay.opacity,
                    border_radius: 0.0,
                },
            };
            RenderItem {
                id: element.id,
                frame: element.frame(),
                paint,
            }
        })
        .collect();

    ResolvedScene {
        canvas: template.canvas(),
        background: template.background_color.clone(),
        items,
    }
}

/// Ask the loader for every image the elements reference. Returns how
/// many loads were started.
pub fn request_images<'a, F: ImageFetcher>(
    loader: &ImageLoader<F>,
    elements: impl IntoIterator<Item = &'a Element>,
    ctx: &RenderContext,
) -> usize {
    elements
        .into_iter()
        .filter_map(|el| image_url_for(el, ctx).map(|url| (el.id, url)))
        .filter(|(id, url)| loader.resolve(*id, url))
        .count()
}
