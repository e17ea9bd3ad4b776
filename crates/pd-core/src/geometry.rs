//! Rotation-aware geometry: bounding envelopes, overlay placement,
//! page alignment, hit testing, rotation and resize math.
//!
//! Elements rotate about their origin `(x, y)` (the unrotated top-left
//! corner), matching how the rasterizer applies the transform. All
//! functions here are pure.

use crate::model::{CanvasSize, Element, normalize_rotation};
use crate::id::ElementId;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// An element's positional state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees.
    pub rotation: f64,
}

impl Frame {
    /// Local → canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Canvas-space center of the (rotated) box.
    pub fn center(&self) -> Point {
        self.transform() * Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned envelope in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn translate(&self, d: Vec2) -> Self {
        Self {
            min_x: self.min_x + d.x,
            min_y: self.min_y + d.y,
            max_x: self.max_x + d.x,
            max_y: self.max_y + d.y,
        }
    }

    /// Smallest envelope containing both.
    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

// ─── Bounding boxes ──────────────────────────────────────────────────────

/// Envelope of a frame's four rotated corners.
pub fn frame_bounds(frame: &Frame) -> Bounds {
    let t = frame.transform();
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(frame.width, 0.0),
        Point::new(frame.width, frame.height),
        Point::new(0.0, frame.height),
    ]
    .map(|p| t * p);

    corners.iter().skip(1).fold(
        Bounds {
            min_x: corners[0].x,
            min_y: corners[0].y,
            max_x: corners[0].x,
            max_y: corners[0].y,
        },
        |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        },
    )
}

/// Axis-aligned envelope of an element after rotation.
pub fn rotated_bounding_box(element: &Element) -> Bounds {
    frame_bounds(&element.frame())
}

/// Envelope of several elements, or `None` for an empty iterator.
pub fn group_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Bounds> {
    elements
        .into_iter()
        .map(rotated_bounding_box)
        .reduce(|a, b| a.union(&b))
}

// ─── Overlay placement ───────────────────────────────────────────────────

/// Position a floating overlay (toolbar, rotate handle) relative to `target`.
///
/// Prefers centered above the target; flips below when the top would fall
/// inside `padding`; then clamps both axes so the overlay is fully visible.
/// A viewport smaller than the overlay pins it to `padding`.
pub fn place_overlay(
    target: &Bounds,
    viewport: Size,
    overlay: Size,
    gap: f64,
    padding: f64,
) -> Point {
    let mut left = target.center().x - overlay.width / 2.0;
    let mut top = target.min_y - gap - overlay.height;
    if top < padding {
        top = target.max_y + gap;
    }

    let max_left = viewport.width - overlay.width - padding;
    let max_top = viewport.height - overlay.height - padding;
    left = left.min(max_left).max(padding);
    top = top.min(max_top).max(padding);
    Point::new(left, top)
}

/// Which side of the element an overlay ended up on.
pub fn overlay_side(target: &Bounds, overlay_top: f64) -> HandleSide {
    if overlay_top < target.min_y {
        HandleSide::Top
    } else {
        HandleSide::Bottom
    }
}

// ─── Page alignment ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageEdge {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl PageEdge {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "middle" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Align an element's stored box to a canvas edge or center line.
/// Rotation is left untouched.
pub fn align_to_page(element: &mut Element, canvas: CanvasSize, edge: PageEdge) {
    match edge {
        PageEdge::Left => element.x = 0.0,
        PageEdge::Center => element.x = (canvas.w() - element.width) / 2.0,
        PageEdge::Right => element.x = canvas.w() - element.width,
        PageEdge::Top => element.y = 0.0,
        PageEdge::Middle => element.y = (canvas.h() - element.height) / 2.0,
        PageEdge::Bottom => element.y = canvas.h() - element.height,
    }
}

// ─── Hit testing ─────────────────────────────────────────────────────────

/// Whether `point` lies inside the element's rotated box.
pub fn contains_point(element: &Element, point: Point) -> bool {
    let local = element.frame().transform().inverse() * point;
    local.x >= 0.0 && local.y >= 0.0 && local.x <= element.width && local.y <= element.height
}

/// Topmost unlocked element under `point`. Locked elements are
/// click-through.
pub fn hit_test(elements: &[impl AsRef<Element>], point: Point) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .map(|el| AsRef::<Element>::as_ref(el))
        .find(|el| !el.locked && contains_point(el, point))
        .map(|el| el.id)
}

impl AsRef<Element> for Element {
    fn as_ref(&self) -> &Element {
        self
    }
}

// ─── Rotation ────────────────────────────────────────────────────────────

/// Which side of the element the rotate handle is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
}

/// Rotation (degrees, `[0, 360)`) implied by dragging the rotate handle to
/// `pointer` around `center`.
///
/// A handle above the element reads 0° when the pointer is straight above
/// the center; a handle below reads 0° when straight below.
pub fn compute_rotation(center: Point, pointer: Point, side: HandleSide, snap_to_45: bool) -> f64 {
    let angle = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees();
    let raw = match side {
        HandleSide::Top => angle + 90.0,
        HandleSide::Bottom => angle - 90.0,
    };
    let deg = if snap_to_45 {
        (raw / 45.0).round() * 45.0
    } else {
        raw
    };
    normalize_rotation(deg)
}

/// New origin that keeps the frame's center fixed when it is rotated to
/// `degrees`.
pub fn rotate_about_center(frame: &Frame, degrees: f64) -> Frame {
    let center = frame.center();
    let half = Vec2::new(frame.width / 2.0, frame.height / 2.0);
    let offset = Affine::rotate(degrees.to_radians()) * half.to_point();
    Frame {
        x: center.x - offset.x,
        y: center.y - offset.y,
        rotation: normalize_rotation(degrees),
        ..*frame
    }
}

// ─── Resize ──────────────────────────────────────────────────────────────

/// One of the eight transform handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    pub fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top-left" => Some(Self::TopLeft),
            "top" => Some(Self::Top),
            "top-right" => Some(Self::TopRight),
            "right" => Some(Self::Right),
            "bottom-right" => Some(Self::BottomRight),
            "bottom" => Some(Self::Bottom),
            "bottom-left" => Some(Self::BottomLeft),
            "left" => Some(Self::Left),
            _ => None,
        }
    }
}

/// Resize `origin` by dragging `handle` a canvas-space distance `delta`.
///
/// The delta is taken into the element's rotated local frame, the handle's
/// edges move, and the opposite edges stay put on the canvas. With
/// `keep_ratio` a corner handle preserves the original aspect ratio.
/// A result narrower or shorter than `min_extent` is rejected: the
/// original frame is returned unchanged.
pub fn resize(
    origin: &Frame,
    handle: ResizeHandle,
    delta: Vec2,
    keep_ratio: bool,
    min_extent: f64,
) -> Frame {
    let local = Affine::rotate(-origin.rotation.to_radians()) * delta.to_point();
    let (mut left, mut top) = (0.0, 0.0);
    let (mut right, mut bottom) = (origin.width, origin.height);

    if handle.moves_left() {
        left += local.x;
    }
    if handle.moves_right() {
        right += local.x;
    }
    if handle.moves_top() {
        top += local.y;
    }
    if handle.moves_bottom() {
        bottom += local.y;
    }

    if keep_ratio && handle.is_corner() && origin.height > 0.0 {
        let ratio = origin.width / origin.height;
        let height = (right - left) / ratio;
        if handle.moves_top() {
            top = bottom - height;
        } else {
            bottom = top + height;
        }
    }

    let (width, height) = (right - left, bottom - top);
    if width < min_extent || height < min_extent {
        return *origin;
    }

    let shift = Affine::rotate(origin.rotation.to_radians()) * Point::new(left, top);
    Frame {
        x: origin.x + shift.x,
        y: origin.y + shift.y,
        width,
        height,
        rotation: origin.rotation,
    }
}
