pub mod binding;
pub mod config;
pub mod cover;
pub mod effects;
pub mod geometry;
pub mod id;
pub mod model;
pub mod persist;
pub mod proxy;
pub mod snap;
pub mod text_fit;

pub use binding::{bound_text, interpolate, resolve_binding};
pub use config::EditorConfig;
pub use cover::{CoverFit, FitAdjust, cover_fit};
pub use effects::{EffectKind, EffectPaint, TextEffect, resolve_effect};
pub use geometry::{Bounds, Frame, HandleSide, PageEdge, ResizeHandle};
pub use id::ElementId;
pub use model::*;
pub use persist::{ElementsJson, SerializedTemplate};
pub use proxy::ProxyRule;
pub use snap::{Axis, Guides, SnapEngine, SnapSettings};
pub use text_fit::{FontSpec, GlyphWidthMeasurer, TextMeasurer};

// Re-export kurbo geometry types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Size, Vec2};
