//! Landmark track player binary.
//!
//! Usage: `mouthcue-player [TRACK_PATH]`

use std::path::PathBuf;

use tracing::{error, info};

use mouthcue_player::{logging, PlayerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    logging::init_tracing();

    let mut config = PlayerConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        config.track_path = PathBuf::from(path);
    }
    info!("Player config: {:?}", config);

    match mouthcue_player::run(config).await {
        Ok(stats) => {
            info!(
                ticks = stats.ticks,
                detections = stats.detections,
                visible = stats.visible,
                hidden_no_faces = stats.hidden_no_faces,
                hidden_mouth_closed = stats.hidden_mouth_closed,
                "Playback complete"
            );
            Ok(())
        }
        Err(e) => {
            error!("Player failed: {:#}", e);
            Err(e)
        }
    }
}
