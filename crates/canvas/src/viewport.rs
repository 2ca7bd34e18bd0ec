use glam::Vec2;
use node::{CanvasPoint, ScreenPoint};
use serde::{Deserialize, Serialize};

/// Camera/viewport state for the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in canvas coordinates
    pub offset: Vec2,
    /// Zoom level (1.0 = 100%)
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a point from screen coordinates to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: ScreenPoint) -> CanvasPoint {
        CanvasPoint(screen_point.0 / self.zoom - self.offset)
    }

    /// Convert a point from canvas coordinates to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: CanvasPoint) -> ScreenPoint {
        ScreenPoint((canvas_point.0 + self.offset) * self.zoom)
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta / self.zoom;
    }

    /// Zoom the viewport, keeping a screen point fixed.
    pub fn zoom_at(&mut self, screen_point: ScreenPoint, factor: f32) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

        // Adjust offset to keep the point under cursor fixed
        if self.zoom != old_zoom {
            self.offset = screen_point.0 / self.zoom - (screen_point.0 / old_zoom - self.offset);
        }
    }

    /// Reset to default view.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
