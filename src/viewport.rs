//! Screen ↔ canvas coordinate mapping.
//!
//! Node positions are stored in canvas (world) space. Pointer input arrives
//! in screen space. The mapping is
//!
//! ```text
//! canvas = (screen - pan) / zoom
//! screen = canvas * zoom + pan
//! ```
//!
//! Pan is a screen-space offset; zoom is clamped to the configured bounds
//! (0.5..=1.5 by default).

use crate::config::CanvasConfig;
use crate::geometry::{Point, Rect};

/// Immutable copy of the pan/zoom pair.
///
/// Drag sessions hold one of these for their whole lifetime so that the
/// mapping they use does not change under them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSnapshot {
    pub pan: Point,
    pub zoom: f32,
}

impl ViewportSnapshot {
    pub fn to_canvas(&self, screen: Point) -> Point {
        let z = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        Point::new((screen.x - self.pan.x) / z, (screen.y - self.pan.y) / z)
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan.x,
            canvas.y * self.zoom + self.pan.y,
        )
    }

    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.to_screen(rect.origin());
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.zoom,
            rect.height * self.zoom,
        )
    }
}

/// Live pan/zoom state of one canvas.
#[derive(Clone, Debug)]
pub struct ViewportTransform {
    pan: Point,
    zoom: f32,
    zoom_min: f32,
    zoom_max: f32,
    zoom_step: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTransform {
    /// Identity transform with the default zoom bounds.
    pub fn new() -> Self {
        Self::from_config(&CanvasConfig::default())
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
        }
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.zoom_min, self.zoom_max)
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            pan: self.pan,
            zoom: self.zoom,
        }
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        self.snapshot().to_canvas(screen)
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        self.snapshot().to_screen(canvas)
    }

    /// Shift the pan offset by a screen-space pointer delta.
    pub fn pan_by(&mut self, screen_delta: Point) {
        self.pan += screen_delta;
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Set zoom, clamped to bounds. Returns whether the value changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let clamped = zoom.clamp(self.zoom_min, self.zoom_max);
        if (clamped - self.zoom).abs() < f32::EPSILON {
            return false;
        }
        self.zoom = clamped;
        true
    }

    /// One wheel notch. Negative `delta` (wheel away from the user) zooms in,
    /// positive zooms out, zero does nothing.
    ///
    /// Returns whether the zoom changed; at a bound this is a silent no-op.
    pub fn apply_wheel(&mut self, delta: f32) -> bool {
        if delta < 0.0 {
            self.zoom_in()
        } else if delta > 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        self.step_zoom(self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.step_zoom(-self.zoom_step)
    }

    fn step_zoom(&mut self, step: f32) -> bool {
        // Round away accumulated float error so repeated steps land on the grid.
        let next = ((self.zoom + step) * 1000.0).round() / 1000.0;
        self.set_zoom(next)
    }
}
