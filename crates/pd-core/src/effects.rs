//! Text effect presets.
//!
//! A preset id plus a handful of numeric parameters resolves into
//! renderer-agnostic paint properties. Each preset reads only the
//! parameters listed by [`EffectKind::parameters`]; the rest are carried
//! along untouched and ignored.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    None,
    Shadow,
    Lift,
    Hollow,
    Splice,
    Outline,
    Echo,
    Glitch,
    Neon,
    Background,
}

/// A tunable effect parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectParam {
    Offset,
    Direction,
    Blur,
    Transparency,
    Thickness,
    Color,
}

impl EffectKind {
    pub const ALL: [EffectKind; 10] = [
        Self::None,
        Self::Shadow,
        Self::Lift,
        Self::Hollow,
        Self::Splice,
        Self::Outline,
        Self::Echo,
        Self::Glitch,
        Self::Neon,
        Self::Background,
    ];

    /// Parameters this preset honours.
    pub fn parameters(self) -> &'static [EffectParam] {
        use EffectParam::*;
        match self {
            Self::None => &[],
            Self::Shadow => &[Offset, Direction, Blur, Transparency, Color],
            Self::Lift => &[Blur],
            Self::Hollow => &[Thickness],
            Self::Splice => &[Thickness, Offset, Direction, Color],
            Self::Outline => &[Thickness, Color],
            Self::Echo => &[Offset, Direction, Color],
            Self::Glitch => &[Offset, Direction],
            Self::Neon => &[Blur],
            Self::Background => &[Offset, Transparency, Color],
        }
    }
}

/// Stored effect settings on a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Distance in canvas units.
    pub offset: f64,
    /// Degrees, 0 = right, clockwise.
    pub direction: f64,
    pub blur: f64,
    /// 0 (opaque) to 100 (invisible).
    pub transparency: f64,
    pub thickness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for TextEffect {
    fn default() -> Self {
        Self {
            kind: EffectKind::None,
            offset: 5.0,
            direction: 45.0,
            blur: 10.0,
            transparency: 50.0,
            thickness: 2.0,
            color: None,
        }
    }
}

// ─── Resolved paint ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokePaint {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowPaint {
    pub color: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPaint {
    pub color: String,
    pub opacity: f64,
    pub padding: f64,
}

/// What the rasterizer should draw for a text run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectPaint {
    /// `false` draws only the stroke (hollow text).
    pub fill_enabled: bool,
    pub stroke: Option<StrokePaint>,
    /// Drawn back to front before the text itself.
    pub shadows: SmallVec<[ShadowPaint; 2]>,
    pub background: Option<BackgroundPaint>,
}

impl Default for EffectPaint {
    fn default() -> Self {
        Self {
            fill_enabled: true,
            stroke: None,
            shadows: SmallVec::new(),
            background: None,
        }
    }
}

fn opacity_from_transparency(transparency: f64) -> f64 {
    (1.0 - transparency / 100.0).clamp(0.0, 1.0)
}

/// Offset vector for a distance and a direction in degrees.
fn polar(distance: f64, direction: f64) -> (f64, f64) {
    let rad = direction.to_radians();
    (distance * rad.cos(), distance * rad.sin())
}

/// Resolve an effect into paint for text drawn in `text_color`.
pub fn resolve_effect(effect: Option<&TextEffect>, text_color: &str) -> EffectPaint {
    let mut paint = EffectPaint::default();
    let Some(effect) = effect else {
        return paint;
    };
    let param_color = || effect.color.clone().unwrap_or_else(|| "#000000".into());

    match effect.kind {
        EffectKind::None => {}
        EffectKind::Shadow => {
            let (dx, dy) = polar(effect.offset, effect.direction);
            paint.shadows.push(ShadowPaint {
                color: param_color(),
                offset_x: dx,
                offset_y: dy,
                blur: effect.blur,
                opacity: opacity_from_transparency(effect.transparency),
            });
        }
        EffectKind::Lift => {
            paint.shadows.push(ShadowPaint {
                color: "#000000".into(),
                offset_x: 0.0,
                offset_y: effect.blur * 0.2,
                blur: effect.blur,
                opacity: 0.5,
            });
        }
        EffectKind::Hollow => {
            paint.fill_enabled = false;
            paint.stroke = Some(StrokePaint {
                color: text_color.into(),
                width: effect.thickness,
            });
        }
        EffectKind::Splice => {
            paint.fill_enabled = false;
            paint.stroke = Some(StrokePaint {
                color: text_color.into(),
                width: effect.thickness,
            });
            let (dx, dy) = polar(effect.offset, effect.direction);
            paint.shadows.push(ShadowPaint {
                color: param_color(),
                offset_x: dx,
                offset_y: dy,
                blur: 0.0,
                opacity: 1.0,
            });
        }
        EffectKind::Outline => {
            paint.stroke = Some(StrokePaint {
                color: param_color(),
                width: effect.thickness,
            });
        }
        EffectKind::Echo => {
            let color = effect.color.clone().unwrap_or_else(|| text_color.into());
            for (step, opacity) in [(2.0, 0.25), (1.0, 0.5)] {
                let (dx, dy) = polar(effect.offset * step, effect.direction);
                paint.shadows.push(ShadowPaint {
                    color: color.clone(),
                    offset_x: dx,
                    offset_y: dy,
                    blur: 0.0,
                    opacity,
                });
            }
        }
        EffectKind::Glitch => {
            let (dx, dy) = polar(effect.offset, effect.direction);
            for (color, sign) in [("#00FFFF", -1.0), ("#FF00FF", 1.0)] {
                paint.shadows.push(ShadowPaint {
                    color: color.into(),
                    offset_x: dx * sign,
                    offset_y: dy * sign,
                    blur: 0.0,
                    opacity: 1.0,
                });
            }
        }
        EffectKind::Neon => {
            paint.shadows.push(ShadowPaint {
                color: text_color.into(),
                offset_x: 0.0,
                offset_y: 0.0,
                blur: effect.blur,
                opacity: 1.0,
            });
        }
        EffectKind::Background => {
            paint.background = Some(BackgroundPaint {
                color: effect.color.clone().unwrap_or_else(|| "#FFFFFF".into()),
                opacity: opacity_from_transparency(effect.transparency),
                padding: effect.offset,
            });
        }
    }
    paint
}
