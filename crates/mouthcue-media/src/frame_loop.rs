//! Display-synchronized driver for the [`FrameLoopController`].
//!
//! Runs on a single tokio task. One `select!` loop multiplexes:
//! - the one-time provider load,
//! - playback signals from the video surface,
//! - the display refresh clock, which runs the controller's pending tick.
//!
//! Ticks run inline in the loop, so a new tick can only start after the
//! previous one returned.

use std::time::Duration;

use mouthcue_models::PlaybackSignal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::controller::{FrameLoopController, TickStats};
use crate::error::{MediaError, MediaResult};
use crate::presenter::OverlayPresenter;
use crate::provider::{LandmarkLoader, LandmarkProvider};
use crate::source::FrameSource;

/// Default display refresh rate.
pub const DEFAULT_REFRESH_HZ: f64 = 60.0;

/// Refresh period for a display rate in Hz.
pub fn refresh_interval(hz: f64) -> MediaResult<Duration> {
    if !hz.is_finite() || hz <= 0.0 {
        return Err(MediaError::invalid_setting(format!(
            "refresh rate must be a positive number, got {}",
            hz
        )));
    }
    Ok(Duration::from_secs_f64(1.0 / hz))
}

/// Owns a controller and drives it from a refresh clock.
pub struct FrameLoop<P, O> {
    controller: FrameLoopController<P, O>,
    refresh_interval: Duration,
}

impl<P, O> FrameLoop<P, O>
where
    P: LandmarkProvider,
    O: OverlayPresenter,
{
    pub fn new(controller: FrameLoopController<P, O>, refresh_interval: Duration) -> Self {
        Self {
            controller,
            refresh_interval,
        }
    }

    pub fn controller(&self) -> &FrameLoopController<P, O> {
        &self.controller
    }

    pub fn into_controller(self) -> FrameLoopController<P, O> {
        self.controller
    }

    /// Run until the signal channel closes.
    ///
    /// `loader` is polled alongside the loop; ticks before it completes are
    /// no-ops. A load failure tears the loop down and is returned. When every
    /// signal sender is dropped the loop tears down and returns its stats.
    pub async fn run<S, L>(
        &mut self,
        source: &S,
        mut signals: mpsc::Receiver<PlaybackSignal>,
        loader: &L,
    ) -> MediaResult<TickStats>
    where
        S: FrameSource,
        L: LandmarkLoader<Provider = P> + ?Sized,
    {
        let model = self.controller.model().clone();
        let load = model.load_with(loader);
        tokio::pin!(load);
        let mut loading = !model.is_loaded();

        let mut refresh = tokio::time::interval(self.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            refresh_ms = self.refresh_interval.as_secs_f64() * 1000.0,
            loader = loader.name(),
            "Frame loop driver running"
        );

        loop {
            tokio::select! {
                loaded = &mut load, if loading => {
                    loading = false;
                    if let Err(e) = loaded {
                        warn!(error = %e, "Stopping frame loop: provider unavailable");
                        self.controller.teardown();
                        return Err(e);
                    }
                }
                signal = signals.recv() => {
                    match signal {
                        Some(signal) => self.controller.handle_signal(signal),
                        None => break,
                    }
                }
                _ = refresh.tick() => {
                    if let Some(token) = self.controller.pending_tick() {
                        self.controller.run_tick(token, source);
                    }
                }
            }
        }

        self.controller.teardown();
        let stats = self.controller.stats();
        info!(
            ticks = stats.ticks,
            detections = stats.detections,
            visible = stats.visible,
            "Frame loop driver finished"
        );
        Ok(stats)
    }
}
