//! Landmark provider backed by a recorded [`LandmarkTrack`].
//!
//! Stands in for a live face-landmark model: every query returns the most
//! recent recorded frame at or before the requested timestamp.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use mouthcue_models::{LandmarkResult, LandmarkTrack, TrackFrame};
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::provider::{LandmarkLoader, LandmarkProvider};
use crate::source::FrameSource;

/// Read and validate a track file.
pub async fn load_track(path: &Path) -> MediaResult<LandmarkTrack> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaError::ModelNotFound(path.to_path_buf())
        } else {
            MediaError::Io(e)
        }
    })?;
    let track = LandmarkTrack::from_json_str(&json)?;
    debug!(
        path = %path.display(),
        frames = track.len(),
        duration_ms = track.duration_ms(),
        "Loaded landmark track"
    );
    Ok(track)
}

/// Provider answering from a recorded track.
#[derive(Debug, Clone)]
pub struct ReplayLandmarkProvider {
    track: LandmarkTrack,
}

impl ReplayLandmarkProvider {
    pub fn new(track: LandmarkTrack) -> Self {
        Self { track }
    }

    pub fn track(&self) -> &LandmarkTrack {
        &self.track
    }
}

impl LandmarkProvider for ReplayLandmarkProvider {
    fn detect(&self, _frame: &dyn FrameSource, timestamp_ms: f64) -> Option<LandmarkResult> {
        self.track.frame_at(timestamp_ms).map(TrackFrame::to_result)
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

#[derive(Debug, Clone)]
enum TrackSource {
    File(PathBuf),
    Memory(LandmarkTrack),
}

/// Loader for [`ReplayLandmarkProvider`].
#[derive(Debug, Clone)]
pub struct ReplayLoader {
    source: TrackSource,
    warmup: Duration,
}

impl ReplayLoader {
    /// Load the track from a JSON file when the model is loaded.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: TrackSource::File(path.into()),
            warmup: Duration::ZERO,
        }
    }

    /// Serve an already-parsed track.
    pub fn from_track(track: LandmarkTrack) -> Self {
        Self {
            source: TrackSource::Memory(track),
            warmup: Duration::ZERO,
        }
    }

    /// Delay the load to mimic a model download and warm-up.
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }
}

#[async_trait]
impl LandmarkLoader for ReplayLoader {
    type Provider = ReplayLandmarkProvider;

    async fn load(&self) -> MediaResult<ReplayLandmarkProvider> {
        if !self.warmup.is_zero() {
            tokio::time::sleep(self.warmup).await;
        }

        let track = match &self.source {
            TrackSource::File(path) => load_track(path).await?,
            TrackSource::Memory(track) => {
                track.validate()?;
                track.clone()
            }
        };
        Ok(ReplayLandmarkProvider::new(track))
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}
