//! Screen/model coordinate mapping for the local pan + zoom transform.
//!
//! Model space is what strokes are stored and synchronized in; screen space
//! is device pixels. The transform is `screen = model * scale + offset`,
//! so the inverse is `model = (screen - offset) / scale`. The viewport is
//! local-only state and never goes on the wire.

use scrawl_shared::Point;

/// Multiplier applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    scale_min: f64,
    scale_max: f64,
}

impl Viewport {
    pub fn new(scale_min: f64, scale_max: f64) -> Self {
        // A non-positive or inverted range would let the scale hit zero and
        // divide model coordinates by it; fall back to a sane window.
        let (scale_min, scale_max) = if scale_min > 0.0 && scale_min <= scale_max {
            (scale_min, scale_max)
        } else {
            (0.5, 3.0)
        };
        Self {
            scale: 1.0f64.clamp(scale_min, scale_max),
            offset_x: 0.0,
            offset_y: 0.0,
            scale_min,
            scale_max,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_model(&self, screen_x: f64, screen_y: f64) -> Point {
        Point {
            x: ((screen_x - self.offset_x) / self.scale) as f32,
            y: ((screen_y - self.offset_y) / self.scale) as f32,
        }
    }

    pub fn to_screen(&self, point: Point) -> (f64, f64) {
        (
            point.x as f64 * self.scale + self.offset_x,
            point.y as f64 * self.scale + self.offset_y,
        )
    }

    /// Screen-space pan; independent of the current zoom level.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }

    /// Rescale while keeping the model point under `(screen_x, screen_y)`
    /// fixed on screen. The offset is recomputed from the clamped scale, not
    /// the requested one, so zoom can neither run away nor invert.
    pub fn zoom_about(&mut self, factor: f64, screen_x: f64, screen_y: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(self.scale_min, self.scale_max);
        let ratio = new_scale / old_scale;
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// One wheel notch: negative delta zooms in, positive zooms out.
    pub fn wheel_zoom(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = if delta < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            1.0 / WHEEL_ZOOM_STEP
        };
        self.zoom_about(factor, screen_x, screen_y);
    }
}

#[cfg(test)]
#[path = "viewport_test.rs"]
mod tests;
