//! Overlay presenter seam.

use mouthcue_models::PixelPosition;
use serde::{Deserialize, Serialize};

/// Renders or hides the speech-bubble label.
pub trait OverlayPresenter {
    /// Show `text` at `position`, or hide the overlay when `position` is `None`.
    fn present(&mut self, position: Option<PixelPosition>, text: &str);
}

/// One published overlay update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub position: Option<PixelPosition>,
    pub text: String,
}

impl OverlayFrame {
    pub fn new(position: Option<PixelPosition>, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }
}

/// Presenter that keeps every update, for hosts that render later.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    frames: Vec<OverlayFrame>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[OverlayFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&OverlayFrame> {
        self.frames.last()
    }
}

impl OverlayPresenter for RecordingPresenter {
    fn present(&mut self, position: Option<PixelPosition>, text: &str) {
        self.frames.push(OverlayFrame::new(position, text));
    }
}
