//! Template data model.
//!
//! A template is a fixed-size design canvas plus an ordered list of
//! elements. List order is paint order: index 0 is painted first (furthest
//! back), the last element is topmost. Every element shares a positional
//! frame (`x`, `y`, `width`, `height`, `rotation`) and carries a
//! kind-specific payload in [`ElementKind`].

use crate::effects::TextEffect;
use crate::geometry::Frame;
use crate::id::ElementId;
use serde::{Deserialize, Deserializer, Serialize};

// ─── Canvas & Template ───────────────────────────────────────────────────

/// Fixed design canvas dimensions, in canvas units (export pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn w(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(&self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for CanvasSize {
    /// Standard 2:3 pin.
    fn default() -> Self {
        Self::new(1000, 1500)
    }
}

/// Template metadata. Independent of element history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_background() -> String {
    "#FFFFFF".into()
}

fn default_width() -> u32 {
    CanvasSize::default().width
}

fn default_height() -> u32 {
    CanvasSize::default().height
}

impl Template {
    /// The empty "new template" state.
    pub fn blank() -> Self {
        let canvas = CanvasSize::default();
        Self {
            id: None,
            slug: String::new(),
            name: "Untitled Template".into(),
            background_color: default_background(),
            width: canvas.width,
            height: canvas.height,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    /// Replace zero dimensions with the defaults. Canvas extents are always
    /// positive.
    pub fn sanitize(&mut self) {
        if self.width == 0 {
            self.width = default_width();
        }
        if self.height == 0 {
            self.height = default_height();
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::blank()
    }
}

// ─── Element kinds ───────────────────────────────────────────────────────

/// Discriminant of [`ElementKind`], used when creating elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Text,
    ImageSlot,
    Shape,
    Logo,
    Overlay,
}

impl ElementType {
    /// Prefix used for generated IDs.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ImageSlot => "imageSlot",
            Self::Shape => "shape",
            Self::Logo => "logo",
            Self::Overlay => "overlay",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "imageSlot" => Some(Self::ImageSlot),
            "shape" => Some(Self::Shape),
            "logo" => Some(Self::Logo),
            "overlay" => Some(Self::Overlay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

/// Where an image slot gets its picture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// The slot's own `imageUrl`.
    #[default]
    Static,
    /// A data-binding path resolved against the render data record.
    Binding,
    /// A per-render override supplied by the caller.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    pub font_family: String,
    pub font_size: f64,
    #[serde(deserialize_with = "string_or_number")]
    pub font_weight: String,
    pub font_style: FontStyle,
    pub color: String,
    pub text_align: TextAlign,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    /// `None` means "decide from content" (see `text_fit::needs_auto_fit`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<TextEffect>,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: "Your text here".into(),
            binding: None,
            font_family: "Inter".into(),
            font_size: 32.0,
            font_weight: "400".into(),
            font_style: FontStyle::Normal,
            color: "#000000".into(),
            text_align: TextAlign::Center,
            letter_spacing: 0.0,
            line_height: 1.2,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            auto_fit: None,
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSlotProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    pub border_radius: f64,
    pub source_type: SourceType,
    /// Uniform zoom on top of cover-fit (1.0 = plain cover).
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ImageSlotProps {
    fn default() -> Self {
        Self {
            image_url: None,
            binding: None,
            border_radius: 0.0,
            source_type: SourceType::Static,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeProps {
    pub fill: String,
    pub opacity: f64,
    pub border_radius: f64,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            fill: "#E5E7EB".into(),
            opacity: 1.0,
            border_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub opacity: f64,
}

impl Default for LogoProps {
    fn default() -> Self {
        Self {
            image_url: None,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayProps {
    pub fill: String,
    pub opacity: f64,
}

impl Default for OverlayProps {
    fn default() -> Self {
        Self {
            fill: "#000000".into(),
            opacity: 0.4,
        }
    }
}

/// Kind-specific element payload, tagged by `"type"` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Text(TextProps),
    ImageSlot(ImageSlotProps),
    Shape(ShapeProps),
    Logo(LogoProps),
    Overlay(OverlayProps),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::ImageSlot(_) => ElementType::ImageSlot,
            Self::Shape(_) => ElementType::Shape,
            Self::Logo(_) => ElementType::Logo,
            Self::Overlay(_) => ElementType::Overlay,
        }
    }

    /// The type's base defaults.
    pub fn base(ty: ElementType) -> Self {
        match ty {
            ElementType::Text => Self::Text(TextProps::default()),
            ElementType::ImageSlot => Self::ImageSlot(ImageSlotProps::default()),
            ElementType::Shape => Self::Shape(ShapeProps::default()),
            ElementType::Logo => Self::Logo(LogoProps::default()),
            ElementType::Overlay => Self::Overlay(OverlayProps::default()),
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// A single element on the template canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Degrees, clockwise, about the element origin `(x, y)`. Kept in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            name: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            locked: false,
            kind,
        }
    }

    /// A new element of `ty` with its base defaults, centered on `canvas`.
    /// Overlays cover the whole canvas.
    pub fn with_defaults(ty: ElementType, id: ElementId, canvas: CanvasSize) -> Self {
        let mut el = Self::new(id, ElementKind::base(ty));
        let (name, w, h) = match ty {
            ElementType::Text => ("Text", 400.0, 100.0),
            ElementType::ImageSlot => ("Image", 400.0, 400.0),
            ElementType::Shape => ("Shape", 200.0, 200.0),
            ElementType::Logo => ("Logo", 150.0, 150.0),
            ElementType::Overlay => ("Overlay", canvas.w(), canvas.h()),
        };
        el.name = name.into();
        el.width = w;
        el.height = h;
        el.x = (canvas.w() - w) / 2.0;
        el.y = (canvas.h() - h) / 2.0;
        el
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn frame(&self) -> Frame {
        Frame {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        }
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.x = frame.x;
        self.y = frame.y;
        self.width = frame.width;
        self.height = frame.height;
        self.rotation = normalize_rotation(frame.rotation);
    }

    pub fn as_text(&self) -> Option<&TextProps> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image_slot(&self) -> Option<&ImageSlotProps> {
        match &self.kind {
            ElementKind::ImageSlot(s) => Some(s),
            _ => None,
        }
    }

    /// Proportionally rescale from one canvas size to another.
    ///
    /// Position and size scale per axis; font size scales by the smaller
    /// of the two factors so text never outgrows its box.
    pub fn rescale(&mut self, from: CanvasSize, to: CanvasSize) {
        let (fw, fh) = (from.w(), from.h());
        let (tw, th) = (to.w(), to.h());
        self.x = self.x * tw / fw;
        self.y = self.y * th / fh;
        self.width = self.width * tw / fw;
        self.height = self.height * th / fh;
        if let ElementKind::Text(t) = &mut self.kind {
            t.font_size *= (tw / fw).min(th / fh);
        }
    }

    /// Shallow-merge a JSON object over this element.
    ///
    /// `id` and `type` keys are ignored; the element keeps its identity and
    /// kind. On error the element is left unchanged.
    pub fn merge_json(&mut self, patch: &serde_json::Value) -> Result<(), serde_json::Error> {
        let mut value = serde_json::to_value(&*self)?;
        if let (Some(target), Some(source)) = (value.as_object_mut(), patch.as_object()) {
            for (key, v) in source {
                if key == "id" || key == "type" {
                    continue;
                }
                target.insert(key.clone(), v.clone());
            }
        }
        let mut merged: Element = serde_json::from_value(value)?;
        merged.rotation = normalize_rotation(merged.rotation);
        *self = merged;
        Ok(())
    }
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input becomes 0.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Font weights arrive as either `"bold"`/`"700"` or a bare number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}
