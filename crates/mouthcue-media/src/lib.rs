#![deny(unreachable_patterns)]
//! Per-frame mouth detection and speech-bubble placement.
//!
//! This crate provides:
//! - Mouth openness evaluation from face-mesh lip landmarks
//! - Normalized-to-pixel mapping for fill and contain surfaces
//! - Provider, surface and presenter traits at the host seams
//! - A sans-IO frame loop controller and its tokio driver
//! - A replay provider for recorded landmark tracks

pub mod controller;
pub mod error;
pub mod frame_loop;
pub mod mapping;
pub mod metrics;
pub mod mouth;
pub mod presenter;
pub mod provider;
pub mod replay;
pub mod source;

pub use controller::{
    ControllerSettings, FrameLoopController, HideReason, LoopState, TickOutcome, TickStats,
    TickToken, DEFAULT_BUBBLE_TEXT,
};
pub use error::{MediaError, MediaResult};
pub use frame_loop::{refresh_interval, FrameLoop, DEFAULT_REFRESH_HZ};
pub use mapping::{map_anchor, map_to_surface, ContainLayout, SurfaceFit};
pub use mouth::{evaluate_mouth, MouthEvaluator, MOUTH_OPEN_THRESHOLD};
pub use presenter::{OverlayFrame, OverlayPresenter, RecordingPresenter};
pub use provider::{LandmarkLoader, LandmarkProvider, ModelHandle};
pub use replay::{load_track, ReplayLandmarkProvider, ReplayLoader};
pub use source::FrameSource;
