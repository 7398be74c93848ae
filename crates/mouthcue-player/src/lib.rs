//! Replays a recorded landmark track through the overlay frame loop.
//!
//! The player stands in for the browser host: a simulated video surface
//! provides the playback clock and signals, a replay provider answers
//! landmark queries, and overlay updates are written as JSON lines.

pub mod config;
pub mod logging;
pub mod presenter;
pub mod video;

use std::time::Duration;

use anyhow::Context;
use mouthcue_media::{
    load_track, refresh_interval, ControllerSettings, FrameLoop, FrameLoopController,
    ModelHandle, MouthEvaluator, OverlayPresenter, ReplayLoader, TickStats,
};
use mouthcue_models::DisplayRect;
use tokio::sync::mpsc;
use tracing::info;

pub use config::{ConfigError, PlayerConfig};
pub use presenter::ConsolePresenter;
pub use video::SimulatedVideo;

/// Replay the configured track, printing overlay changes to stdout.
pub async fn run(config: PlayerConfig) -> anyhow::Result<TickStats> {
    let (stats, _) = run_with_presenter(config, ConsolePresenter::stdout()).await?;
    Ok(stats)
}

/// Replay the configured track into `presenter`.
pub async fn run_with_presenter<O>(
    config: PlayerConfig,
    presenter: O,
) -> anyhow::Result<(TickStats, O)>
where
    O: OverlayPresenter,
{
    let track = load_track(&config.track_path)
        .await
        .with_context(|| format!("Failed to load track {}", config.track_path.display()))?;
    info!(
        path = %config.track_path.display(),
        frames = track.len(),
        duration_ms = track.duration_ms(),
        "Replaying landmark track"
    );

    let (signals_tx, signals_rx) = mpsc::channel(16);
    let video = SimulatedVideo::new(
        track.intrinsic_size,
        DisplayRect::new(config.surface_width, config.surface_height),
        Duration::from_secs_f64(track.duration_ms() / 1000.0),
        signals_tx,
    );

    let settings = ControllerSettings {
        evaluator: MouthEvaluator::new(config.mouth_threshold)?,
        fit: config.surface_fit,
        bubble_text: config.bubble_text.clone(),
    };
    let controller = FrameLoopController::new(ModelHandle::new(), presenter, settings);
    let mut frame_loop = FrameLoop::new(controller, refresh_interval(config.refresh_hz)?);
    let loader = ReplayLoader::from_track(track).with_warmup(config.model_warmup);

    let playback = tokio::spawn(drive_playback(video.clone()));
    let result = frame_loop.run(&video, signals_rx, &loader).await;
    playback.abort();
    video.detach();

    let stats = result.context("Frame loop failed")?;
    Ok((stats, frame_loop.into_controller().into_presenter()))
}

/// Autoplay to the end (or until Ctrl-C), then detach from the frame loop.
async fn drive_playback(video: SimulatedVideo) {
    video.play().await;
    tokio::select! {
        _ = video.run_to_end() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping playback");
            video.pause().await;
        }
    }
    video.detach();
}
