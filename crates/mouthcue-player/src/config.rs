//! Player configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mouthcue_media::{SurfaceFit, DEFAULT_BUBBLE_TEXT, DEFAULT_REFRESH_HZ, MOUTH_OPEN_THRESHOLD};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Player configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Recorded landmark track to replay
    pub track_path: PathBuf,
    /// Normalized lip gap above which the mouth is open
    pub mouth_threshold: f64,
    /// Speech bubble label
    pub bubble_text: String,
    /// Display refresh rate driving the frame loop
    pub refresh_hz: f64,
    /// Displayed surface width in pixels
    pub surface_width: f64,
    /// Displayed surface height in pixels
    pub surface_height: f64,
    /// How the video is laid out inside the surface
    pub surface_fit: SurfaceFit,
    /// Simulated model load time
    pub model_warmup: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            track_path: PathBuf::from("track.json"),
            mouth_threshold: MOUTH_OPEN_THRESHOLD,
            bubble_text: DEFAULT_BUBBLE_TEXT.to_string(),
            refresh_hz: DEFAULT_REFRESH_HZ,
            surface_width: 640.0,
            surface_height: 360.0,
            surface_fit: SurfaceFit::Fill,
            model_warmup: Duration::from_millis(250),
        }
    }
}

impl PlayerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mouth_threshold =
            parse_or(&lookup, "MOUTHCUE_MOUTH_THRESHOLD", defaults.mouth_threshold)?;
        if !mouth_threshold.is_finite() || mouth_threshold < 0.0 {
            return Err(invalid(
                "MOUTHCUE_MOUTH_THRESHOLD",
                mouth_threshold.to_string(),
                "must be finite and non-negative",
            ));
        }

        let refresh_hz = parse_or(&lookup, "MOUTHCUE_REFRESH_HZ", defaults.refresh_hz)?;
        if !refresh_hz.is_finite() || refresh_hz <= 0.0 {
            return Err(invalid(
                "MOUTHCUE_REFRESH_HZ",
                refresh_hz.to_string(),
                "must be positive",
            ));
        }

        let surface_width = positive_or(&lookup, "MOUTHCUE_SURFACE_WIDTH", defaults.surface_width)?;
        let surface_height =
            positive_or(&lookup, "MOUTHCUE_SURFACE_HEIGHT", defaults.surface_height)?;

        let surface_fit = match lookup("MOUTHCUE_SURFACE_FIT") {
            Some(value) => value
                .parse::<SurfaceFit>()
                .map_err(|e| invalid("MOUTHCUE_SURFACE_FIT", value, e.to_string()))?,
            None => defaults.surface_fit,
        };

        let model_warmup = Duration::from_millis(parse_or(
            &lookup,
            "MOUTHCUE_MODEL_WARMUP_MS",
            defaults.model_warmup.as_millis() as u64,
        )?);

        Ok(Self {
            track_path: lookup("MOUTHCUE_TRACK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.track_path),
            mouth_threshold,
            bubble_text: lookup("MOUTHCUE_BUBBLE_TEXT").unwrap_or(defaults.bubble_text),
            refresh_hz,
            surface_width,
            surface_height,
            surface_fit,
            model_warmup,
        })
    }
}

fn invalid(key: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        reason: reason.into(),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, value.clone(), e.to_string())),
        None => Ok(default),
    }
}

fn positive_or<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(key, value.to_string(), "must be positive"));
    }
    Ok(value)
}
