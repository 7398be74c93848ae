//! Per-frame mouth state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkPoint;

/// Open/closed classification for one frame plus the point the overlay anchors to.
///
/// Recomputed every frame. There is no smoothing or hysteresis across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MouthState {
    pub open: bool,
    /// Upper-lip landmark, present whenever both lip landmarks were found
    pub anchor: Option<LandmarkPoint>,
}

impl MouthState {
    /// Closed with no anchor. Used for every incomplete input.
    pub fn closed() -> Self {
        Self {
            open: false,
            anchor: None,
        }
    }

    /// Anchor to place the overlay at, only when the mouth is open.
    pub fn overlay_anchor(&self) -> Option<LandmarkPoint> {
        if self.open {
            self.anchor
        } else {
            None
        }
    }
}
