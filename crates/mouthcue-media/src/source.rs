//! Video surface abstraction the frame loop reads from.

use mouthcue_models::{DisplayRect, IntrinsicSize, ReadyState};

/// A playing video surface: the current decoded frame plus its layout.
pub trait FrameSource {
    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    fn ready_state(&self) -> ReadyState;

    /// Native size of the decoded frames; zero until metadata is known.
    fn intrinsic_size(&self) -> IntrinsicSize;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Size of the surface as laid out on screen.
    fn display_rect(&self) -> DisplayRect;

    /// Whether the current frame can be handed to a landmark model.
    fn is_playable(&self) -> bool {
        !self.is_paused()
            && !self.is_ended()
            && self.ready_state().has_current_frame()
            && !self.intrinsic_size().is_empty()
    }

    /// Playback position scaled to milliseconds, as landmark models expect.
    fn timestamp_ms(&self) -> f64 {
        self.current_time() * 1000.0
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StaticSource;
    use super::*;

    #[test]
    fn test_playable_when_playing() {
        let source = StaticSource::playing();
        assert!(source.is_playable());
        assert_eq!(source.timestamp_ms(), 1500.0);
    }

    #[test]
    fn test_not_playable_states() {
        let mut paused = StaticSource::playing();
        paused.paused = true;
        assert!(!paused.is_playable());

        let mut ended = StaticSource::playing();
        ended.ended = true;
        assert!(!ended.is_playable());

        let mut metadata_only = StaticSource::playing();
        metadata_only.ready_state = ReadyState::HaveMetadata;
        assert!(!metadata_only.is_playable());

        let mut no_frame = StaticSource::playing();
        no_frame.intrinsic_size = IntrinsicSize::new(0, 480);
        assert!(!no_frame.is_playable());
    }
}
