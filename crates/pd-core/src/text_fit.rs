//! Text auto-fit.
//!
//! Shrinks a text element's font size until its wrapped content fits the
//! element's box. Measurement is injected through [`TextMeasurer`] so the
//! search runs the same against a browser canvas, a font rasterizer, or a
//! deterministic fake.

use crate::binding::has_placeholder;
use crate::model::{Element, FontStyle, TextProps, TextTransform};
use std::borrow::Cow;

/// Auto-fit never goes below this size.
pub const MIN_FONT_SIZE: f64 = 10.0;

/// Everything a measurer needs to lay out a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: String,
    pub style: FontStyle,
    /// Multiple of `size`.
    pub line_height: f64,
    /// Extra advance per character, in canvas units.
    pub letter_spacing: f64,
}

impl FontSpec {
    pub fn from_text(props: &TextProps) -> Self {
        Self {
            family: props.font_family.clone(),
            size: props.font_size,
            weight: props.font_weight.clone(),
            style: props.font_style,
            line_height: props.line_height,
            letter_spacing: props.letter_spacing,
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// CSS `font` shorthand, e.g. `italic 700 32px Inter`.
    pub fn css(&self) -> String {
        let style = match self.style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        };
        format!("{style} {} {}px {}", self.weight, self.size, self.family)
    }
}

/// Measures wrapped text.
pub trait TextMeasurer {
    /// Height of `text` word-wrapped at `width` using `font`.
    fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
        (**self).measure_wrapped_height(text, width, font)
    }
}

/// Greedy word-wrap line count. Explicit newlines always break; a single
/// word wider than `max_width` takes a line of its own.
pub fn wrap_line_count(text: &str, max_width: f64, measure_width: impl Fn(&str) -> f64) -> usize {
    let mut lines = 0;
    for paragraph in text.split('\n') {
        lines += 1;
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure_width(&candidate) <= max_width {
                current = candidate;
            } else {
                lines += 1;
                current = word.to_string();
            }
        }
    }
    lines
}

/// Headless measurer: every glyph advances `average_advance × size`.
#[derive(Debug, Clone, Copy)]
pub struct GlyphWidthMeasurer {
    pub average_advance: f64,
}

impl Default for GlyphWidthMeasurer {
    fn default() -> Self {
        Self {
            average_advance: 0.55,
        }
    }
}

impl TextMeasurer for GlyphWidthMeasurer {
    fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
        let advance = font.size * self.average_advance + font.letter_spacing;
        let lines = wrap_line_count(text, width, |s| s.chars().count() as f64 * advance);
        lines as f64 * font.size * font.line_height
    }
}

// ─── Fitting ─────────────────────────────────────────────────────────────

/// Explicit `autoFit` wins; otherwise content with a `{{binding}}`
/// placeholder auto-fits.
pub fn needs_auto_fit(props: &TextProps) -> bool {
    props
        .auto_fit
        .unwrap_or_else(|| has_placeholder(&props.content))
}

pub fn apply_text_transform(text: &str, transform: TextTransform) -> Cow<'_, str> {
    match transform {
        TextTransform::None => Cow::Borrowed(text),
        TextTransform::Uppercase => Cow::Owned(text.to_uppercase()),
        TextTransform::Lowercase => Cow::Owned(text.to_lowercase()),
        TextTransform::Capitalize => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if at_word_start && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(c);
                }
                at_word_start = c.is_whitespace();
            }
            Cow::Owned(out)
        }
    }
}

/// Largest font size in `[min_size, font.size]` at which `text` fits a
/// `width × height` box.
///
/// Returns `font.size` untouched when it already fits (or is at/below the
/// minimum). Otherwise searches whole sizes and returns the largest that
/// fits, or `min_size` when nothing does.
pub fn fit_font_size(
    text: &str,
    width: f64,
    height: f64,
    font: &FontSpec,
    min_size: f64,
    measurer: &impl TextMeasurer,
) -> f64 {
    let fits = |size: f64| measurer.measure_wrapped_height(text, width, &font.with_size(size)) <= height;

    let base = font.size;
    if base <= min_size || fits(base) {
        return base;
    }

    let mut lo = min_size.ceil() as i64;
    let mut hi = base.floor() as i64;
    if hi as f64 == base {
        hi -= 1;
    }
    if hi < lo || !fits(lo as f64) {
        return min_size;
    }

    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if fits(mid as f64) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    log::trace!("auto-fit {base}px → {lo}px in {width}×{height}");
    lo as f64
}

/// Font size a text element is displayed at, given its resolved content.
/// Non-text elements and non-auto-fit text return their stored size.
pub fn effective_font_size(
    element: &Element,
    content: &str,
    min_size: f64,
    measurer: &impl TextMeasurer,
) -> f64 {
    let Some(props) = element.as_text() else {
        return 0.0;
    };
    if !needs_auto_fit(props) {
        return props.font_size;
    }
    let text = apply_text_transform(content, props.text_transform);
    fit_font_size(
        &text,
        element.width,
        element.height,
        &FontSpec::from_text(props),
        min_size,
        measurer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ElementId;
    use crate::model::{CanvasSize, ElementType};
    use std::cell::Cell;

    /// Half-em glyphs, counts calls.
    struct Fake {
        calls: Cell<usize>,
    }

    impl Fake {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl TextMeasurer for Fake {
        fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
            self.calls.set(self.calls.get() + 1);
            let lines = wrap_line_count(text, width, |s| s.chars().count() as f64 * font.size * 0.5);
            lines as f64 * font.size * font.line_height
        }
    }

    fn font(size: f64) -> FontSpec {
        FontSpec {
            family: "Inter".into(),
            size,
            weight: "400".into(),
            style: FontStyle::Normal,
            line_height: 1.0,
            letter_spacing: 0.0,
        }
    }

    #[test]
    fn wraps_greedily() {
        let n = wrap_line_count("aa bb cc", 5.0, |s| s.len() as f64);
        assert_eq!(n, 2);
        assert_eq!(wrap_line_count("a\n\nb", 100.0, |s| s.len() as f64), 3);
        assert_eq!(wrap_line_count("", 100.0, |s| s.len() as f64), 1);
    }

    #[test]
    fn fitting_base_is_kept() {
        let m = Fake::new();
        let f = fit_font_size("Hi", 400.0, 100.0, &font(32.0), MIN_FONT_SIZE, &m);
        assert_eq!(f, 32.0);
        assert_eq!(m.calls.get(), 1);
    }

    #[test]
    fn result_fits_and_next_size_does_not() {
        let m = Fake::new();
        let text = "Easy One Pot Creamy Garlic Chicken Pasta";
        let (w, h) = (300.0, 120.0);
        let base = 72.0;
        let f = fit_font_size(text, w, h, &font(base), MIN_FONT_SIZE, &m);
        assert!(f >= MIN_FONT_SIZE && f < base);
        assert_eq!(f, f.floor());
        assert!(m.measure_wrapped_height(text, w, &font(f)) <= h);
        assert!(m.measure_wrapped_height(text, w, &font(f + 1.0)) > h);
    }

    #[test]
    fn floors_at_minimum() {
        let m = Fake::new();
        let long = "word ".repeat(200);
        let f = fit_font_size(&long, 50.0, 20.0, &font(40.0), MIN_FONT_SIZE, &m);
        assert_eq!(f, MIN_FONT_SIZE);
    }

    #[test]
    fn fractional_base_after_rescale() {
        let m = Fake::new();
        let f = fit_font_size("abcdefghij klmnop", 100.0, 30.0, &font(23.04), MIN_FONT_SIZE, &m);
        assert!(f <= 23.0);
        assert!(m.measure_wrapped_height("abcdefghij klmnop", 100.0, &font(f)) <= 30.0);
    }

    #[test]
    fn placeholder_implies_auto_fit() {
        let mut props = TextProps {
            content: "{{recipe.title}}".into(),
            ..TextProps::default()
        };
        assert!(needs_auto_fit(&props));
        props.auto_fit = Some(false);
        assert!(!needs_auto_fit(&props));
        props.content = "Static".into();
        props.auto_fit = None;
        assert!(!needs_auto_fit(&props));
        props.auto_fit = Some(true);
        assert!(needs_auto_fit(&props));
    }

    #[test]
    fn effective_size_applies_transform_and_recomputes() {
        let mut el = Element::with_defaults(
            ElementType::Text,
            ElementId::intern("fit"),
            CanvasSize::default(),
        );
        el.width = 200.0;
        el.height = 40.0;
        if let Some(t) = el.as_text_mut() {
            t.auto_fit = Some(true);
            t.font_size = 40.0;
            t.line_height = 1.0;
            t.text_transform = TextTransform::Uppercase;
        }
        let m = GlyphWidthMeasurer::default();
        let short = effective_font_size(&el, "hi", MIN_FONT_SIZE, &m);
        assert_eq!(short, 40.0);
        let long = effective_font_size(&el, "a much longer line of text", MIN_FONT_SIZE, &m);
        assert!(long < 40.0);
    }

    #[test]
    fn capitalize_words() {
        assert_eq!(
            apply_text_transform("easy weeknight pasta", TextTransform::Capitalize),
            "Easy Weeknight Pasta"
        );
    }

    #[test]
    fn css_shorthand() {
        assert_eq!(font(32.0).css(), "normal 400 32px Inter");
    }
}
