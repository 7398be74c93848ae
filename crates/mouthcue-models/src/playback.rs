//! Playback signals and frame readiness of a video surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Edge-triggered playback notifications from a video surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackSignal {
    /// Playback started or resumed
    Started,
    /// Playback paused or reached the end
    Stopped,
}

/// How much media data the surface has buffered, in HTML media element order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    /// True once the current frame is decoded and can be handed to a model.
    pub fn has_current_frame(&self) -> bool {
        *self >= ReadyState::HaveCurrentData
    }
}
