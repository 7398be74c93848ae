//! Recorded landmark tracks.
//!
//! A track is the landmark model's output captured for every analysed frame
//! of a clip. Replaying it stands in for running the model live.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::landmark::{LandmarkResult, LandmarkSet};
use crate::rect::IntrinsicSize;

/// Errors produced while loading or validating a track.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Invalid track JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Track has an empty intrinsic size")]
    EmptyIntrinsicSize,

    #[error("Frame {index} has an invalid timestamp: {timestamp_ms}")]
    InvalidTimestamp { index: usize, timestamp_ms: f64 },

    #[error("Frame {index} is not after the previous frame")]
    OutOfOrder { index: usize },
}

/// Landmarks recorded for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackFrame {
    /// Playback position of the frame in milliseconds
    pub timestamp_ms: f64,
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl TrackFrame {
    pub fn new(timestamp_ms: f64, faces: Vec<LandmarkSet>) -> Self {
        Self {
            timestamp_ms,
            faces,
        }
    }

    pub fn to_result(&self) -> LandmarkResult {
        LandmarkResult::new(self.faces.clone())
    }
}

/// A recorded sequence of landmark frames for one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkTrack {
    pub intrinsic_size: IntrinsicSize,
    #[serde(default)]
    pub frames: Vec<TrackFrame>,
}

impl LandmarkTrack {
    pub fn new(intrinsic_size: IntrinsicSize, frames: Vec<TrackFrame>) -> Self {
        Self {
            intrinsic_size,
            frames,
        }
    }

    /// Parse and validate a track from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, TrackError> {
        let track: Self = serde_json::from_str(json)?;
        track.validate()?;
        Ok(track)
    }

    /// Check timestamps are finite, non-negative and strictly increasing.
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.intrinsic_size.is_empty() {
            return Err(TrackError::EmptyIntrinsicSize);
        }

        let mut previous: Option<f64> = None;
        for (index, frame) in self.frames.iter().enumerate() {
            let ts = frame.timestamp_ms;
            if !ts.is_finite() || ts < 0.0 {
                return Err(TrackError::InvalidTimestamp {
                    index,
                    timestamp_ms: ts,
                });
            }
            if previous.is_some_and(|prev| ts <= prev) {
                return Err(TrackError::OutOfOrder { index });
            }
            previous = Some(ts);
        }

        Ok(())
    }

    /// Most recent frame recorded at or before `timestamp_ms`.
    pub fn frame_at(&self, timestamp_ms: f64) -> Option<&TrackFrame> {
        let after = self
            .frames
            .partition_point(|frame| frame.timestamp_ms <= timestamp_ms);
        after.checked_sub(1).map(|index| &self.frames[index])
    }

    /// Timestamp of the last recorded frame, 0 for an empty track.
    pub fn duration_ms(&self) -> f64 {
        self.frames.last().map(|f| f.timestamp_ms).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
