//! Edge curves in screen space.
//!
//! An edge leaves the right edge of its `from` node and enters the left edge
//! of its `to` node, both at mid height. Control points extend horizontally
//! so the curve reads left to right.

use crate::geometry::{Point, Rect};

/// Where an edge attaches to its two node boxes.
pub fn edge_anchors(from: &Rect, to: &Rect) -> (Point, Point) {
    (
        Point::new(from.right(), from.y + from.height / 2.0),
        Point::new(to.x, to.y + to.height / 2.0),
    )
}

/// Cubic bezier between two screen points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl EdgeCurve {
    /// Curve from `start` to `end`. Endpoints closer than `10 * zoom`
    /// degenerate to a straight segment so short links do not zig-zag.
    pub fn between(start: Point, end: Point, zoom: f32, min_offset: f32) -> Self {
        if start.distance_to(end) < 10.0 * zoom {
            return Self {
                start,
                ctrl1: start,
                ctrl2: end,
                end,
            };
        }
        let offset = ((end.x - start.x).abs() * 0.5).max(min_offset * zoom);
        Self {
            start,
            ctrl1: Point::new(start.x + offset, start.y),
            ctrl2: Point::new(end.x - offset, end.y),
            end,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.ctrl1 == self.start && self.ctrl2 == self.end
    }

    /// SVG path commands, e.g. `M 10 20 C 60 20 90 80 140 80`.
    pub fn to_svg(&self) -> String {
        if self.is_straight() {
            return format!(
                "M {} {} L {} {}",
                self.start.x, self.start.y, self.end.x, self.end.y
            );
        }
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.ctrl1.x,
            self.ctrl1.y,
            self.ctrl2.x,
            self.ctrl2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// SVG path for the edge between two screen-space node boxes.
pub fn edge_path(from: &Rect, to: &Rect, zoom: f32, min_offset: f32) -> String {
    let (start, end) = edge_anchors(from, to);
    EdgeCurve::between(start, end, zoom, min_offset).to_svg()
}
