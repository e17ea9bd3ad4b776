//! Cover-fit placement of an image inside a slot, like CSS
//! `object-fit: cover`, with optional zoom and pan.

use kurbo::Size;

/// User adjustments applied on top of plain cover-fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitAdjust {
    /// Uniform zoom; values below 1 are treated as 1.
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for FitAdjust {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Where to draw the scaled image, relative to the slot's top-left corner.
/// `x`/`y` are never positive and the image always covers the slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale `image` to cover `slot`, crop the overflowing axis around the
/// center, then zoom (re-centered) and pan by the offset. Panning is
/// clamped so no edge of the slot is ever exposed.
pub fn cover_fit(image: Size, slot: Size, adjust: FitAdjust) -> CoverFit {
    if image.width <= 0.0 || image.height <= 0.0 {
        return CoverFit {
            scale: 0.0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let image_aspect = image.width / image.height;
    let slot_aspect = slot.width / slot.height;
    let base = if image_aspect > slot_aspect {
        slot.height / image.height
    } else {
        slot.width / image.width
    };

    let scale = base * adjust.zoom.max(1.0);
    let width = image.width * scale;
    let height = image.height * scale;

    let x = ((slot.width - width) / 2.0 + adjust.offset_x)
        .min(0.0)
        .max(slot.width - width);
    let y = ((slot.height - height) / 2.0 + adjust.offset_y)
        .min(0.0)
        .max(slot.height - height);

    CoverFit {
        scale,
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn covers_for_many_aspects() {
        let slots = [(400.0, 400.0), (1000.0, 300.0), (250.0, 900.0)];
        let images = [(640.0, 480.0), (480.0, 640.0), (1920.0, 400.0), (333.0, 777.0)];
        for (sw, sh) in slots {
            for (iw, ih) in images {
                let fit = cover_fit(Size::new(iw, ih), Size::new(sw, sh), FitAdjust::default());
                assert!(fit.width >= sw - EPS && fit.height >= sh - EPS);
                let exact_w = (fit.width - sw).abs() < 1e-6;
                let exact_h = (fit.height - sh).abs() < 1e-6;
                assert!(exact_w || exact_h, "one axis must match exactly");
            }
        }
    }

    #[test]
    fn wide_image_crops_width_and_centers() {
        let fit = cover_fit(
            Size::new(800.0, 400.0),
            Size::new(400.0, 400.0),
            FitAdjust::default(),
        );
        assert_eq!(fit.scale, 1.0);
        assert_eq!((fit.width, fit.height), (800.0, 400.0));
        assert_eq!((fit.x, fit.y), (-200.0, 0.0));
    }

    #[test]
    fn zoom_recenters_then_offsets() {
        let adjust = FitAdjust {
            zoom: 2.0,
            offset_x: 50.0,
            offset_y: 0.0,
        };
        let fit = cover_fit(Size::new(400.0, 400.0), Size::new(400.0, 400.0), adjust);
        assert_eq!((fit.width, fit.height), (800.0, 800.0));
        assert_eq!((fit.x, fit.y), (-150.0, -200.0));
    }

    #[test]
    fn offset_never_exposes_edges() {
        let adjust = FitAdjust {
            zoom: 1.0,
            offset_x: 10_000.0,
            offset_y: -10_000.0,
        };
        let fit = cover_fit(Size::new(800.0, 400.0), Size::new(400.0, 400.0), adjust);
        assert_eq!(fit.x, 0.0);
        assert_eq!(fit.y, 0.0);
        let back = cover_fit(
            Size::new(800.0, 400.0),
            Size::new(400.0, 400.0),
            FitAdjust {
                offset_x: -10_000.0,
                ..adjust
            },
        );
        assert_eq!(back.x, -400.0);
    }

    #[test]
    fn zoom_below_one_is_ignored() {
        let fit = cover_fit(
            Size::new(400.0, 400.0),
            Size::new(200.0, 200.0),
            FitAdjust {
                zoom: 0.25,
                ..FitAdjust::default()
            },
        );
        assert_eq!(fit.width, 200.0);
    }
}
