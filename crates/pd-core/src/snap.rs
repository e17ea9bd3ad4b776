//! Grid snapping and smart alignment guides.
//!
//! Guide stops on each axis are the canvas start, center and end plus the
//! start, center and end of every sibling envelope. The dragged box's own
//! center, start and end are compared against those stops; the single
//! closest match under the threshold wins and produces one guide line per
//! axis.
//!
//! Ties are broken deterministically: the box center beats its start, which
//! beats its end, and canvas stops beat sibling stops. Only a strictly
//! closer candidate replaces the current best.

use crate::config::EditorConfig;
use crate::geometry::{Bounds, Frame, ResizeHandle};
use crate::model::CanvasSize;
use kurbo::Vec2;
use serde::Serialize;

pub const SNAP_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    /// Maximum distance (canvas units) at which a guide engages.
    pub threshold: f64,
    pub grid_enabled: bool,
    /// Grid size is `canvas.width / grid_divisions`.
    pub grid_divisions: u32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            threshold: SNAP_THRESHOLD,
            grid_enabled: false,
            grid_divisions: 20,
        }
    }
}

impl From<&EditorConfig> for SnapSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            threshold: config.snap_threshold,
            grid_enabled: config.grid_enabled,
            grid_divisions: config.grid_divisions,
        }
    }
}

/// The guide lines currently shown. `vertical` is an x position,
/// `horizontal` a y position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Guides {
    pub vertical: Option<f64>,
    pub horizontal: Option<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// A canvas axis. Guides on `X` are vertical lines, guides on `Y` horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Stateful snapper: computes corrections and remembers the active guides
/// until the gesture ends.
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    pub settings: SnapSettings,
    guides: Guides,
}

impl SnapEngine {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            settings,
            guides: Guides::default(),
        }
    }

    pub fn guides(&self) -> Guides {
        self.guides
    }

    /// Drop all guides (drag end / transform end).
    pub fn clear(&mut self) {
        self.guides = Guides::default();
    }

    /// Drop the guide on one axis, for drags locked to the other.
    pub fn clear_axis(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.guides.vertical = None,
            Axis::Y => self.guides.horizontal = None,
        }
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.settings.grid_enabled = !self.settings.grid_enabled;
        self.settings.grid_enabled
    }

    fn grid_size(&self, canvas: CanvasSize) -> Option<f64> {
        (self.settings.grid_enabled && self.settings.grid_divisions > 0)
            .then(|| canvas.w() / f64::from(self.settings.grid_divisions))
    }

    /// Correction to add to a dragged box whose envelope would land at
    /// `proposal`. Grid snapping applies first; a guide within the threshold
    /// then overrides it on its axis.
    pub fn snap_move(&mut self, proposal: &Bounds, canvas: CanvasSize, siblings: &[Bounds]) -> Vec2 {
        let mut correction = Vec2::ZERO;
        if let Some(size) = self.grid_size(canvas) {
            correction.x = (proposal.min_x / size).round() * size - proposal.min_x;
            correction.y = (proposal.min_y / size).round() * size - proposal.min_y;
        }

        let threshold = self.settings.threshold;
        let (w, h) = (proposal.width(), proposal.height());

        let x_stops = axis_stops(canvas.w(), siblings.iter().map(|b| (b.min_x, b.max_x)));
        let x_edges = [proposal.min_x + w / 2.0, proposal.min_x, proposal.max_x];
        self.guides.vertical = closest(&x_edges, &x_stops, threshold).map(|(delta, stop)| {
            correction.x = delta;
            stop
        });

        let y_stops = axis_stops(canvas.h(), siblings.iter().map(|b| (b.min_y, b.max_y)));
        let y_edges = [proposal.min_y + h / 2.0, proposal.min_y, proposal.max_y];
        self.guides.horizontal = closest(&y_edges, &y_stops, threshold).map(|(delta, stop)| {
            correction.y = delta;
            stop
        });

        correction
    }

    /// Snap the edges a resize handle is moving. Extents come from the live
    /// proposal, not the stored element. Rotated frames are not snapped.
    pub fn snap_resize(
        &mut self,
        proposal: &Frame,
        handle: ResizeHandle,
        canvas: CanvasSize,
        siblings: &[Bounds],
    ) -> Frame {
        self.clear();
        if proposal.rotation != 0.0 {
            return *proposal;
        }
        let threshold = self.settings.threshold;
        let mut out = *proposal;

        let x_stops = axis_stops(canvas.w(), siblings.iter().map(|b| (b.min_x, b.max_x)));
        if handle.moves_left() {
            let right = out.x + out.width;
            if let Some((delta, stop)) = closest(&[out.x], &x_stops, threshold)
                && right - (out.x + delta) >= 1.0
            {
                out.x += delta;
                out.width = right - out.x;
                self.guides.vertical = Some(stop);
            }
        } else if handle.moves_right() {
            let right = out.x + out.width;
            if let Some((delta, stop)) = closest(&[right], &x_stops, threshold)
                && out.width + delta >= 1.0
            {
                out.width += delta;
                self.guides.vertical = Some(stop);
            }
        }

        let y_stops = axis_stops(canvas.h(), siblings.iter().map(|b| (b.min_y, b.max_y)));
        if handle.moves_top() {
            let bottom = out.y + out.height;
            if let Some((delta, stop)) = closest(&[out.y], &y_stops, threshold)
                && bottom - (out.y + delta) >= 1.0
            {
                out.y += delta;
                out.height = bottom - out.y;
                self.guides.horizontal = Some(stop);
            }
        } else if handle.moves_bottom() {
            let bottom = out.y + out.height;
            if let Some((delta, stop)) = closest(&[bottom], &y_stops, threshold)
                && out.height + delta >= 1.0
            {
                out.height += delta;
                self.guides.horizontal = Some(stop);
            }
        }

        out
    }
}

/// Canvas stops first, then sibling start/center/end.
fn axis_stops(extent: f64, siblings: impl Iterator<Item = (f64, f64)>) -> Vec<f64> {
    let mut stops = vec![0.0, extent / 2.0, extent];
    for (start, end) in siblings {
        stops.extend([start, (start + end) / 2.0, end]);
    }
    stops
}

/// Closest `(delta, stop)` with `|stop - edge| < threshold`, or `None`.
fn closest(edges: &[f64], stops: &[f64], threshold: f64) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for &edge in edges {
        for &stop in stops {
            let distance = (stop - edge).abs();
            if distance < threshold && best.is_none_or(|(d, _, _)| distance < d) {
                best = Some((distance, stop - edge, stop));
            }
        }
    }
    best.map(|(_, delta, stop)| (delta, stop))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize::new(1000, 1500);

    fn bounds(x: f64, y: f64, w: f64, h: f64) -> Bounds {
        Bounds {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }

    #[test]
    fn snaps_left_edge_to_canvas() {
        let mut snap = SnapEngine::default();
        let c = snap.snap_move(&bounds(5.0, 300.0, 100.0, 100.0), CANVAS, &[]);
        assert_eq!(c.x, -5.0);
        assert_eq!(c.y, 0.0);
        assert_eq!(snap.guides().vertical, Some(0.0));
        assert_eq!(snap.guides().horizontal, None);
    }

    #[test]
    fn snaps_center_to_canvas_center() {
        let mut snap = SnapEngine::default();
        // Center x = 446 + 50 = 496 → 500.
        let c = snap.snap_move(&bounds(446.0, 703.0, 100.0, 100.0), CANVAS, &[]);
        assert_eq!(c.x, 4.0);
        // Center y = 753 → 750.
        assert_eq!(c.y, -3.0);
        assert_eq!(snap.guides().vertical, Some(500.0));
        assert_eq!(snap.guides().horizontal, Some(750.0));
    }

    #[test]
    fn clear_axis_keeps_the_other_guide() {
        let mut snap = SnapEngine::default();
        snap.snap_move(&bounds(446.0, 703.0, 100.0, 100.0), CANVAS, &[]);
        snap.clear_axis(Axis::Y);
        assert_eq!(snap.guides().vertical, Some(500.0));
        assert_eq!(snap.guides().horizontal, None);
        snap.clear_axis(Axis::X);
        assert!(snap.guides().is_empty());
    }

    #[test]
    fn nothing_within_threshold() {
        let mut snap = SnapEngine::default();
        let c = snap.snap_move(&bounds(200.0, 300.0, 100.0, 100.0), CANVAS, &[]);
        assert_eq!(c, Vec2::ZERO);
        assert!(snap.guides().is_empty());
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut snap = SnapEngine::default();
        let c = snap.snap_move(&bounds(8.0, 300.0, 100.0, 100.0), CANVAS, &[]);
        assert_eq!(c.x, 0.0);
    }

    #[test]
    fn snaps_to_sibling_edge() {
        let mut snap = SnapEngine::default();
        let sibling = bounds(300.0, 300.0, 100.0, 100.0);
        // Left edge 403 lands near the sibling's right edge 400.
        let c = snap.snap_move(&bounds(403.0, 600.0, 50.0, 50.0), CANVAS, &[sibling]);
        assert_eq!(c.x, -3.0);
        assert_eq!(snap.guides().vertical, Some(400.0));
    }

    #[test]
    fn tie_prefers_center_over_edge() {
        let mut snap = SnapEngine::default();
        let sibling = bounds(100.0, 100.0, 390.0, 10.0); // end = 490
        // start = 492 (2 from 490), center = 502 (2 from 500).
        let c = snap.snap_move(&bounds(492.0, 900.0, 20.0, 20.0), CANVAS, &[sibling]);
        assert_eq!(snap.guides().vertical, Some(500.0));
        assert_eq!(c.x, -2.0);
    }

    #[test]
    fn grid_then_guides() {
        let mut snap = SnapEngine::new(SnapSettings {
            grid_enabled: true,
            ..SnapSettings::default()
        });
        // Grid = 1000 / 20 = 50.
        let c = snap.snap_move(&bounds(212.0, 330.0, 40.0, 40.0), CANVAS, &[]);
        assert_eq!(c.x, -12.0);
        assert_eq!(c.y, 20.0);
        assert!(snap.guides().is_empty());
    }

    #[test]
    fn resize_snaps_moving_edge_only() {
        let mut snap = SnapEngine::default();
        let f = Frame {
            x: 100.0,
            y: 100.0,
            width: 396.0,
            height: 100.0,
            rotation: 0.0,
        };
        let out = snap.snap_resize(&f, ResizeHandle::Right, CANVAS, &[]);
        assert_eq!(out.x, 100.0);
        assert_eq!(out.width, 400.0);
        assert_eq!(snap.guides().vertical, Some(500.0));
        assert_eq!(snap.guides().horizontal, None);
    }

    #[test]
    fn resize_skips_rotated() {
        let mut snap = SnapEngine::default();
        let f = Frame {
            x: 3.0,
            y: 3.0,
            width: 100.0,
            height: 100.0,
            rotation: 15.0,
        };
        assert_eq!(snap.snap_resize(&f, ResizeHandle::TopLeft, CANVAS, &[]), f);
        assert!(snap.guides().is_empty());
    }

    #[test]
    fn clear_drops_guides() {
        let mut snap = SnapEngine::default();
        snap.snap_move(&bounds(2.0, 2.0, 10.0, 10.0), CANVAS, &[]);
        assert!(!snap.guides().is_empty());
        snap.clear();
        assert!(snap.guides().is_empty());
    }
}
