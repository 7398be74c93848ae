use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Displayed size of the video surface in CSS/screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayRect {
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the rect can host an overlay.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Native dimensions of the decoded video frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntrinsicSize {
    pub width: u32,
    pub height: u32,
}

impl IntrinsicSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero in either dimension means no frame has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

/// Pixel coordinate relative to the top-left corner of the video surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
