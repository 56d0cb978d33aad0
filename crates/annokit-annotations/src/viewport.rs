use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Drawing region in window pixels, origin at the bottom left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A viewport at the window origin
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Map tab or window percentages to viewport pixels. Z is negated and
    /// scaled to [-1, 0].
    pub fn percentage_to_pixels(&self, percentage: DVec3) -> DVec3 {
        DVec3::new(
            self.width * (percentage.x / 100.0),
            self.height * (percentage.y / 100.0),
            -percentage.z / 100.0,
        )
    }

    /// True when a viewport-relative pixel lies inside the viewport
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}
