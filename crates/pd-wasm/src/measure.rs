//! Browser text measurement through a Canvas2D context.

use pd_core::text_fit::{FontSpec, TextMeasurer, wrap_line_count};
use web_sys::CanvasRenderingContext2d;

/// Measures with the same font stack the page renders with.
pub struct CanvasTextMeasurer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasurer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn line_width(&self, line: &str, letter_spacing: f64) -> f64 {
        let width = self.ctx.measure_text(line).map_or(0.0, |m| m.width());
        width + letter_spacing * line.chars().count() as f64
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn measure_wrapped_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
        self.ctx.set_font(&font.css());
        let lines = wrap_line_count(text, width, |line| self.line_width(line, font.letter_spacing));
        lines as f64 * font.size * font.line_height
    }
}
