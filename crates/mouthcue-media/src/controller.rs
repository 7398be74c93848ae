//! Frame loop controller.
//!
//! Drives the per-frame cycle: pull the current frame, ask the landmark
//! provider for faces, evaluate the first face's mouth, map the anchor to
//! surface pixels, and publish the overlay position (or hide it).
//!
//! # States
//! - **Idle**: no tick is scheduled.
//! - **Running**: exactly one tick is pending at any time. A tick schedules
//!   its successor only after its own provider call has returned, so
//!   provider calls never overlap.
//!
//! The controller is host-agnostic: it hands out a [`TickToken`] for the
//! pending tick and the host runs it on its next display refresh. Stopping
//! cancels the token, so a host that fires late runs nothing.

use mouthcue_models::{PixelPosition, PlaybackSignal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mapping::{map_anchor, SurfaceFit};
use crate::metrics;
use crate::mouth::MouthEvaluator;
use crate::presenter::OverlayPresenter;
use crate::provider::{LandmarkProvider, ModelHandle};
use crate::source::FrameSource;

/// Label shown in the speech bubble unless configured otherwise.
pub const DEFAULT_BUBBLE_TEXT: &str = "Mock Text...";

/// Externally observable loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Handle for one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Why the overlay was hidden on an evaluated tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideReason {
    /// Provider returned nothing or no faces
    NoFaces,
    /// First face's mouth closed or its lip landmarks were missing
    MouthClosed,
}

/// Result of running one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Token was cancelled or superseded; nothing ran
    Cancelled,
    /// Provider not loaded yet; rescheduled without detection
    ModelNotLoaded,
    /// Surface not ready to hand out a frame; rescheduled without detection
    SourceNotPlayable,
    /// Overlay hidden
    Hidden(HideReason),
    /// Overlay shown at this position
    Visible(PixelPosition),
}

impl TickOutcome {
    /// Position published by this tick, if any.
    pub fn position(&self) -> Option<PixelPosition> {
        match self {
            TickOutcome::Visible(position) => Some(*position),
            _ => None,
        }
    }

    /// Whether the provider was called on this tick.
    pub fn detected(&self) -> bool {
        matches!(self, TickOutcome::Hidden(_) | TickOutcome::Visible(_))
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Cancelled => "cancelled",
            TickOutcome::ModelNotLoaded => "model_not_loaded",
            TickOutcome::SourceNotPlayable => "source_not_playable",
            TickOutcome::Hidden(HideReason::NoFaces) => "no_faces",
            TickOutcome::Hidden(HideReason::MouthClosed) => "mouth_closed",
            TickOutcome::Visible(_) => "visible",
        }
    }
}

/// Counters over the controller's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub ticks: u64,
    pub model_not_loaded: u64,
    pub source_not_playable: u64,
    pub detections: u64,
    pub visible: u64,
    pub hidden_no_faces: u64,
    pub hidden_mouth_closed: u64,
}

impl TickStats {
    fn record(&mut self, outcome: &TickOutcome) {
        if matches!(outcome, TickOutcome::Cancelled) {
            return;
        }
        self.ticks += 1;
        if outcome.detected() {
            self.detections += 1;
        }
        match outcome {
            TickOutcome::Cancelled => {}
            TickOutcome::ModelNotLoaded => self.model_not_loaded += 1,
            TickOutcome::SourceNotPlayable => self.source_not_playable += 1,
            TickOutcome::Hidden(HideReason::NoFaces) => self.hidden_no_faces += 1,
            TickOutcome::Hidden(HideReason::MouthClosed) => self.hidden_mouth_closed += 1,
            TickOutcome::Visible(_) => self.visible += 1,
        }
    }
}

/// Controller settings.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub evaluator: MouthEvaluator,
    pub fit: SurfaceFit,
    pub bubble_text: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            evaluator: MouthEvaluator::default(),
            fit: SurfaceFit::default(),
            bubble_text: DEFAULT_BUBBLE_TEXT.to_string(),
        }
    }
}

/// State machine tying provider, evaluator, mapper and presenter together.
pub struct FrameLoopController<P, O> {
    model: ModelHandle<P>,
    presenter: O,
    settings: ControllerSettings,
    state: LoopState,
    pending: Option<TickToken>,
    next_token: u64,
    last_visible: Option<bool>,
    stats: TickStats,
}

impl<P, O> FrameLoopController<P, O>
where
    P: LandmarkProvider,
    O: OverlayPresenter,
{
    pub fn new(model: ModelHandle<P>, presenter: O, settings: ControllerSettings) -> Self {
        Self {
            model,
            presenter,
            settings,
            state: LoopState::Idle,
            pending: None,
            next_token: 0,
            last_visible: None,
            stats: TickStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Token of the tick waiting for the next display refresh.
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    pub fn model(&self) -> &ModelHandle<P> {
        &self.model
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn presenter(&self) -> &O {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut O {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> O {
        self.presenter
    }

    /// Dispatch a playback signal.
    pub fn handle_signal(&mut self, signal: PlaybackSignal) {
        match signal {
            PlaybackSignal::Started => self.on_started(),
            PlaybackSignal::Stopped => self.on_stopped(),
        }
    }

    /// Playback started: begin polling. Ignored while already running.
    pub fn on_started(&mut self) {
        if self.state == LoopState::Running {
            debug!("Start signal while running, ignoring");
            return;
        }
        self.state = LoopState::Running;
        self.schedule();
        info!(model_loaded = self.model.is_loaded(), "Frame loop started");
    }

    /// Playback paused or ended: cancel the pending tick.
    pub fn on_stopped(&mut self) {
        if self.state == LoopState::Idle {
            return;
        }
        self.cancel();
        self.state = LoopState::Idle;
        info!(ticks = self.stats.ticks, "Frame loop stopped");
    }

    /// Release the pending tick and return to idle, regardless of state.
    pub fn teardown(&mut self) {
        self.cancel();
        self.state = LoopState::Idle;
    }

    /// Run the tick identified by `token` against the current frame of `source`.
    ///
    /// Tokens that are no longer pending (cancelled by a stop, or already run)
    /// do nothing. Otherwise the next tick is scheduled after this one's work.
    pub fn run_tick<S: FrameSource>(&mut self, token: TickToken, source: &S) -> TickOutcome {
        if self.pending != Some(token) {
            return TickOutcome::Cancelled;
        }
        self.pending = None;

        let outcome = self.evaluate_frame(source);

        self.stats.record(&outcome);
        metrics::record_tick(&outcome);

        if self.state == LoopState::Running {
            self.schedule();
        }
        outcome
    }

    fn evaluate_frame<S: FrameSource>(&mut self, source: &S) -> TickOutcome {
        let outcome = {
            let Some(provider) = self.model.get() else {
                return TickOutcome::ModelNotLoaded;
            };
            if !source.is_playable() {
                return TickOutcome::SourceNotPlayable;
            }

            let timestamp_ms = source.timestamp_ms();
            let result = provider.detect(source, timestamp_ms);

            match result.as_ref().and_then(|r| r.primary_face()) {
                None => TickOutcome::Hidden(HideReason::NoFaces),
                Some(face) => {
                    let state = self.settings.evaluator.evaluate(Some(face));
                    match state.overlay_anchor() {
                        Some(anchor) => TickOutcome::Visible(map_anchor(
                            &anchor,
                            &source.display_rect(),
                            source.intrinsic_size(),
                            self.settings.fit,
                        )),
                        None => TickOutcome::Hidden(HideReason::MouthClosed),
                    }
                }
            }
        };

        self.publish(&outcome);
        outcome
    }

    fn publish(&mut self, outcome: &TickOutcome) {
        let position = outcome.position();
        let visible = position.is_some();
        if self.last_visible != Some(visible) {
            debug!(visible, outcome = outcome.label(), "Overlay visibility changed");
            self.last_visible = Some(visible);
        }
        self.presenter.present(position, &self.settings.bubble_text);
    }

    fn schedule(&mut self) {
        self.next_token += 1;
        self.pending = Some(TickToken(self.next_token));
    }

    fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            debug!(?token, "Cancelled pending tick");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;
    use crate::provider::test_support::ScriptedProvider;
    use crate::source::test_support::StaticSource;
    use mouthcue_models::{
        LandmarkPoint, LandmarkResult, LandmarkSet, ReadyState, LOWER_LIP_INDEX, UPPER_LIP_INDEX,
    };

    type TestController = FrameLoopController<ScriptedProvider, RecordingPresenter>;

    fn face(y13: f64, y14: f64) -> LandmarkSet {
        let mut points = vec![LandmarkPoint::new(0.1, 0.1); 478];
        points[UPPER_LIP_INDEX] = LandmarkPoint::new(0.5, y13);
        points[LOWER_LIP_INDEX] = LandmarkPoint::new(0.5, y14);
        LandmarkSet::new(points)
    }

    fn loaded(response: Option<LandmarkResult>) -> TestController {
        FrameLoopController::new(
            ModelHandle::loaded(ScriptedProvider::returning(response)),
            RecordingPresenter::new(),
            ControllerSettings::default(),
        )
    }

    fn provider(controller: &TestController) -> &ScriptedProvider {
        controller.model().get().unwrap()
    }

    /// Run whatever tick is pending.
    fn pump(controller: &mut TestController, source: &StaticSource) -> TickOutcome {
        let token = controller.pending_tick().expect("a tick should be pending");
        controller.run_tick(token, source)
    }

    #[test]
    fn test_open_mouth_publishes_position() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.43)])));
        let source = StaticSource::playing();
        controller.on_started();

        let outcome = pump(&mut controller, &source);
        let position = outcome.position().expect("overlay should be visible");
        assert!((position.x - 200.0).abs() < 1e-9);
        assert!((position.y - 120.0).abs() < 1e-9);

        let frame = controller.presenter().last().unwrap();
        assert_eq!(frame.position, Some(position));
        assert_eq!(frame.text, DEFAULT_BUBBLE_TEXT);
    }

    #[test]
    fn test_closed_mouth_hides_overlay() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.41)])));
        controller.on_started();

        let outcome = pump(&mut controller, &StaticSource::playing());
        assert_eq!(outcome, TickOutcome::Hidden(HideReason::MouthClosed));
        assert_eq!(controller.presenter().last().unwrap().position, None);
    }

    #[test]
    fn test_empty_face_list_hides_overlay() {
        let mut controller = loaded(Some(LandmarkResult::default()));
        controller.on_started();

        let outcome = pump(&mut controller, &StaticSource::playing());
        assert_eq!(outcome, TickOutcome::Hidden(HideReason::NoFaces));
        assert!(!controller.presenter().last().unwrap().is_visible());
    }

    #[test]
    fn test_absent_result_hides_overlay() {
        let mut controller = loaded(None);
        controller.on_started();

        assert_eq!(
            pump(&mut controller, &StaticSource::playing()),
            TickOutcome::Hidden(HideReason::NoFaces)
        );
    }

    #[test]
    fn test_truncated_landmarks_treated_as_closed() {
        let short = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 10]);
        let mut controller = loaded(Some(LandmarkResult::new(vec![short])));
        controller.on_started();

        assert_eq!(
            pump(&mut controller, &StaticSource::playing()),
            TickOutcome::Hidden(HideReason::MouthClosed)
        );
    }

    #[test]
    fn test_only_first_face_is_used() {
        let faces = vec![face(0.40, 0.41), face(0.40, 0.50)];
        let mut controller = loaded(Some(LandmarkResult::new(faces)));
        controller.on_started();

        assert_eq!(
            pump(&mut controller, &StaticSource::playing()),
            TickOutcome::Hidden(HideReason::MouthClosed)
        );
    }

    #[test]
    fn test_no_stale_position_after_detection_loss() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.43)])));
        let source = StaticSource::playing();
        controller.on_started();

        assert!(pump(&mut controller, &source).position().is_some());
        provider(&controller).set_response(None);
        assert!(pump(&mut controller, &source).position().is_none());

        let frames = controller.presenter().frames();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_visible());
        assert!(!frames[1].is_visible());
    }

    #[test]
    fn test_timestamp_is_playback_position_in_ms() {
        let mut controller = loaded(None);
        let mut source = StaticSource::playing();
        source.current_time = 2.25;
        controller.on_started();

        pump(&mut controller, &source);
        assert_eq!(provider(&controller).timestamps(), vec![2250.0]);
    }

    #[test]
    fn test_unloaded_model_skips_detection_and_reschedules() {
        let mut controller: TestController = FrameLoopController::new(
            ModelHandle::new(),
            RecordingPresenter::new(),
            ControllerSettings::default(),
        );
        controller.on_started();

        let first = controller.pending_tick().unwrap();
        let outcome = controller.run_tick(first, &StaticSource::playing());

        assert_eq!(outcome, TickOutcome::ModelNotLoaded);
        assert!(controller.presenter().frames().is_empty());
        let next = controller.pending_tick().expect("tick should be rescheduled");
        assert_ne!(next, first);
        assert_eq!(controller.stats().model_not_loaded, 1);
        assert_eq!(controller.stats().detections, 0);
    }

    #[test]
    fn test_unplayable_source_skips_detection_and_reschedules() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.43)])));
        let mut source = StaticSource::playing();
        source.ready_state = ReadyState::HaveMetadata;
        controller.on_started();

        assert_eq!(pump(&mut controller, &source), TickOutcome::SourceNotPlayable);
        assert_eq!(provider(&controller).calls(), 0);
        assert!(controller.pending_tick().is_some());
        assert_eq!(controller.state(), LoopState::Running);

        source.ready_state = ReadyState::HaveEnoughData;
        assert!(pump(&mut controller, &source).position().is_some());
        assert_eq!(provider(&controller).calls(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.43)])));
        let source = StaticSource::playing();
        controller.on_started();
        pump(&mut controller, &source);

        let pending = controller.pending_tick().unwrap();
        controller.handle_signal(PlaybackSignal::Stopped);

        assert_eq!(controller.state(), LoopState::Idle);
        assert!(controller.pending_tick().is_none());
        assert_eq!(controller.run_tick(pending, &source), TickOutcome::Cancelled);
        assert_eq!(provider(&controller).calls(), 1);

        controller.handle_signal(PlaybackSignal::Started);
        pump(&mut controller, &source);
        assert_eq!(provider(&controller).calls(), 2);
    }

    #[test]
    fn test_token_runs_once() {
        let mut controller = loaded(None);
        let source = StaticSource::playing();
        controller.on_started();

        let token = controller.pending_tick().unwrap();
        controller.run_tick(token, &source);
        assert_eq!(controller.run_tick(token, &source), TickOutcome::Cancelled);
        assert_eq!(provider(&controller).calls(), 1);
    }

    #[test]
    fn test_repeated_start_keeps_single_pending_tick() {
        let mut controller = loaded(None);
        controller.on_started();
        let token = controller.pending_tick();
        controller.on_started();

        assert_eq!(controller.pending_tick(), token);
    }

    #[test]
    fn test_teardown_releases_tick() {
        let mut controller = loaded(None);
        controller.on_started();
        controller.teardown();

        assert_eq!(controller.state(), LoopState::Idle);
        assert!(controller.pending_tick().is_none());
    }

    #[test]
    fn test_contain_fit_and_custom_text() {
        let settings = ControllerSettings {
            evaluator: MouthEvaluator::default(),
            fit: SurfaceFit::Contain,
            bubble_text: "hello".to_string(),
        };
        let mut controller = FrameLoopController::new(
            ModelHandle::loaded(ScriptedProvider::returning(Some(LandmarkResult::new(vec![
                face(0.0, 0.5),
            ])))),
            RecordingPresenter::new(),
            settings,
        );
        // 4:3 frame in a 16:9 surface, 200px bars left and right
        let mut source = StaticSource::playing();
        source.display_rect = mouthcue_models::DisplayRect::new(1600.0, 900.0);
        controller.on_started();

        let position = pump(&mut controller, &source).position().unwrap();
        assert!((position.x - (200.0 + 0.5 * 1200.0)).abs() < 1e-9);
        assert!(position.y.abs() < 1e-9);
        assert_eq!(controller.presenter().last().unwrap().text, "hello");
    }

    #[test]
    fn test_stats_track_outcomes() {
        let mut controller = loaded(Some(LandmarkResult::new(vec![face(0.40, 0.43)])));
        let source = StaticSource::playing();
        controller.on_started();

        pump(&mut controller, &source);
        provider(&controller).set_response(Some(LandmarkResult::new(vec![face(0.40, 0.40)])));
        pump(&mut controller, &source);
        provider(&controller).set_response(Some(LandmarkResult::default()));
        pump(&mut controller, &source);

        let stats = controller.stats();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.detections, 3);
        assert_eq!(stats.visible, 1);
        assert_eq!(stats.hidden_mouth_closed, 1);
        assert_eq!(stats.hidden_no_faces, 1);
    }
}
