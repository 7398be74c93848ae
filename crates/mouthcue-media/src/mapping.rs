//! Coordinate mapping from normalized landmarks to surface pixels.
//!
//! # Fill
//! The default mapping scales the normalized point by the displayed
//! rectangle: `x = anchor.x * rect.width`, `y = anchor.y * rect.height`.
//! This assumes the decoded frame fills the surface exactly. When the
//! surface letterboxes or pillarboxes the video, the result is offset by
//! the padding.
//!
//! # Contain
//! Opt-in correction for aspect-preserving surfaces. The frame is scaled by
//! `min(rect.w / frame.w, rect.h / frame.h)` and centered, so
//! `x = pad_left + anchor.x * content_width`.
//!
//! All positions are relative to the surface's own top-left corner.

use std::fmt;
use std::str::FromStr;

use mouthcue_models::{DisplayRect, IntrinsicSize, LandmarkPoint, PixelPosition};
use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// How the video frame is laid out inside its surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFit {
    /// Frame stretched over the whole surface
    #[default]
    Fill,
    /// Frame scaled to fit with centered padding
    Contain,
}

impl fmt::Display for SurfaceFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceFit::Fill => write!(f, "fill"),
            SurfaceFit::Contain => write!(f, "contain"),
        }
    }
}

impl FromStr for SurfaceFit {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fill" => Ok(SurfaceFit::Fill),
            "contain" => Ok(SurfaceFit::Contain),
            other => Err(MediaError::invalid_setting(format!(
                "unknown surface fit '{}', expected 'fill' or 'contain'",
                other
            ))),
        }
    }
}

/// Map a normalized point onto the full display rectangle.
#[inline]
pub fn map_to_surface(anchor: &LandmarkPoint, rect: &DisplayRect) -> PixelPosition {
    PixelPosition::new(anchor.x * rect.width, anchor.y * rect.height)
}

/// Placement of an aspect-preserved frame inside a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainLayout {
    /// Scale factor applied to the intrinsic frame (min of x/y scales)
    pub scale: f64,
    /// Displayed frame width before padding
    pub content_width: f64,
    /// Displayed frame height before padding
    pub content_height: f64,
    pub pad_left: f64,
    pub pad_top: f64,
}

impl ContainLayout {
    /// Compute the layout, or `None` when the intrinsic size is unknown.
    pub fn compute(intrinsic: IntrinsicSize, rect: &DisplayRect) -> Option<Self> {
        if intrinsic.is_empty() {
            return None;
        }

        let scale_x = rect.width / intrinsic.width as f64;
        let scale_y = rect.height / intrinsic.height as f64;
        let scale = scale_x.min(scale_y);

        let content_width = intrinsic.width as f64 * scale;
        let content_height = intrinsic.height as f64 * scale;

        Some(Self {
            scale,
            content_width,
            content_height,
            pad_left: (rect.width - content_width) / 2.0,
            pad_top: (rect.height - content_height) / 2.0,
        })
    }

    #[inline]
    pub fn map_point(&self, anchor: &LandmarkPoint) -> PixelPosition {
        PixelPosition::new(
            self.pad_left + anchor.x * self.content_width,
            self.pad_top + anchor.y * self.content_height,
        )
    }
}

/// Map a normalized point using the given fit.
///
/// `Contain` without a known intrinsic size falls back to `Fill`.
pub fn map_anchor(
    anchor: &LandmarkPoint,
    rect: &DisplayRect,
    intrinsic: IntrinsicSize,
    fit: SurfaceFit,
) -> PixelPosition {
    match fit {
        SurfaceFit::Fill => map_to_surface(anchor, rect),
        SurfaceFit::Contain => ContainLayout::compute(intrinsic, rect)
            .map(|layout| layout.map_point(anchor))
            .unwrap_or_else(|| map_to_surface(anchor, rect)),
    }
}
