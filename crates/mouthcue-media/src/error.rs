//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use mouthcue_models::TrackError;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur outside the per-frame path.
///
/// Per-frame anomalies (no face, missing landmarks, unready video) never
/// surface as errors; they hide the overlay instead.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Landmark provider initialization failed: {0}")]
    ProviderInit(String),

    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Invalid landmark track: {0}")]
    InvalidTrack(#[from] TrackError),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create a provider initialization error.
    pub fn provider_init(message: impl Into<String>) -> Self {
        Self::ProviderInit(message.into())
    }

    /// Create an invalid setting error.
    pub fn invalid_setting(message: impl Into<String>) -> Self {
        Self::InvalidSetting(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
