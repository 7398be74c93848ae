//! Simulated video surface.
//!
//! Keeps a playback clock instead of decoding frames. Playing, pausing and
//! reaching the end emit the same edge-triggered signals a browser video
//! element would, on the channel the frame loop listens to.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mouthcue_media::FrameSource;
use mouthcue_models::{DisplayRect, IntrinsicSize, PlaybackSignal, ReadyState};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug)]
struct PlaybackClock {
    /// Position at the last play/pause, in seconds
    position: f64,
    /// Set while playing
    playing_since: Option<Instant>,
    duration: f64,
    ended: bool,
}

impl PlaybackClock {
    fn current_time(&self) -> f64 {
        let elapsed = self
            .playing_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.position + elapsed).min(self.duration)
    }
}

struct Shared {
    clock: Mutex<PlaybackClock>,
    signals: Mutex<Option<mpsc::Sender<PlaybackSignal>>>,
    intrinsic_size: IntrinsicSize,
    display_rect: DisplayRect,
}

/// Cloneable handle to one simulated video surface.
#[derive(Clone)]
pub struct SimulatedVideo {
    shared: Arc<Shared>,
}

impl SimulatedVideo {
    pub fn new(
        intrinsic_size: IntrinsicSize,
        display_rect: DisplayRect,
        duration: Duration,
        signals: mpsc::Sender<PlaybackSignal>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                clock: Mutex::new(PlaybackClock {
                    position: 0.0,
                    playing_since: None,
                    duration: duration.as_secs_f64(),
                    ended: false,
                }),
                signals: Mutex::new(Some(signals)),
                intrinsic_size,
                display_rect,
            }),
        }
    }

    fn clock(&self) -> MutexGuard<'_, PlaybackClock> {
        self.shared
            .clock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start or resume playback. Restarts from the beginning after the end.
    pub async fn play(&self) {
        {
            let mut clock = self.clock();
            if clock.playing_since.is_some() {
                return;
            }
            if clock.ended {
                clock.position = 0.0;
                clock.ended = false;
            }
            clock.playing_since = Some(Instant::now());
            info!(position = clock.position, "Playback started");
        }
        self.emit(PlaybackSignal::Started).await;
    }

    /// Pause playback at the current position.
    pub async fn pause(&self) {
        {
            let mut clock = self.clock();
            if clock.playing_since.is_none() {
                return;
            }
            clock.position = clock.current_time();
            clock.playing_since = None;
            info!(position = clock.position, "Playback paused");
        }
        self.emit(PlaybackSignal::Stopped).await;
    }

    /// Wait until playback reaches the end, then stop.
    ///
    /// Returns early if playback is paused from elsewhere.
    pub async fn run_to_end(&self) {
        loop {
            let remaining = {
                let clock = self.clock();
                if clock.playing_since.is_none() {
                    return;
                }
                clock.duration - clock.current_time()
            };

            if remaining <= 0.0 {
                break;
            }
            tokio::time::sleep(Duration::from_secs_f64(remaining)).await;
        }

        {
            let mut clock = self.clock();
            clock.position = clock.duration;
            clock.playing_since = None;
            clock.ended = true;
            info!(duration = clock.duration, "Playback ended");
        }
        self.emit(PlaybackSignal::Stopped).await;
    }

    /// Stop emitting signals. Once every handle has detached, listeners see
    /// the channel close.
    pub fn detach(&self) {
        let sender = self
            .shared
            .signals
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if sender.is_some() {
            debug!("Video surface detached from frame loop");
        }
    }

    async fn emit(&self, signal: PlaybackSignal) {
        let sender = self
            .shared
            .signals
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(sender) = sender {
            if sender.send(signal).await.is_err() {
                debug!(?signal, "No listener for playback signal");
            }
        }
    }
}

impl FrameSource for SimulatedVideo {
    fn is_paused(&self) -> bool {
        self.clock().playing_since.is_none()
    }

    fn is_ended(&self) -> bool {
        self.clock().ended
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }

    fn intrinsic_size(&self) -> IntrinsicSize {
        self.shared.intrinsic_size
    }

    fn current_time(&self) -> f64 {
        self.clock().current_time()
    }

    fn display_rect(&self) -> DisplayRect {
        self.shared.display_rect
    }
}
