//! Shared data models for the mouthcue overlay pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Normalized facial landmarks and per-frame detection results
//! - Per-frame mouth state
//! - Surface rectangles and pixel positions
//! - Playback signals and frame readiness
//! - Recorded landmark tracks

pub mod landmark;
pub mod mouth;
pub mod playback;
pub mod rect;
pub mod track;

// Re-export common types
pub use landmark::{
    LandmarkPoint, LandmarkResult, LandmarkSet, LOWER_LIP_INDEX, UPPER_LIP_INDEX,
};
pub use mouth::MouthState;
pub use playback::{PlaybackSignal, ReadyState};
pub use rect::{DisplayRect, IntrinsicSize, PixelPosition};
pub use track::{LandmarkTrack, TrackError, TrackFrame};
