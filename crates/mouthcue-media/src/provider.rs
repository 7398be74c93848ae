//! Landmark provider traits and the shared model handle.
//!
//! A landmark model is loaded once, asynchronously, and then queried
//! synchronously once per frame. The [`ModelHandle`] is the readiness flag
//! between the two: written once by the loader, read by every tick.

use std::sync::Arc;

use async_trait::async_trait;
use mouthcue_models::LandmarkResult;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::MediaResult;
use crate::metrics;
use crate::source::FrameSource;

/// A loaded face-landmark model.
pub trait LandmarkProvider: Send + Sync {
    /// Detect face landmarks in the frame currently shown by `frame`.
    ///
    /// # Arguments
    /// * `frame` - Surface to read the current frame from
    /// * `timestamp_ms` - Playback position of that frame in milliseconds
    ///
    /// # Returns
    /// `None` when the model produced no result for this frame.
    fn detect(&self, frame: &dyn FrameSource, timestamp_ms: f64) -> Option<LandmarkResult>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// One-time asynchronous initializer for a [`LandmarkProvider`].
#[async_trait]
pub trait LandmarkLoader: Send + Sync {
    type Provider: LandmarkProvider;

    /// Load the model. Called at most once per [`ModelHandle`].
    async fn load(&self) -> MediaResult<Self::Provider>;

    /// Loader name for logging.
    fn name(&self) -> &'static str;
}

/// Shared, write-once slot holding the loaded provider.
pub struct ModelHandle<P> {
    cell: Arc<OnceCell<P>>,
}

impl<P> Clone for ModelHandle<P> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<P> Default for ModelHandle<P> {
    fn default() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }
}

impl<P: LandmarkProvider> ModelHandle<P> {
    /// Create an empty handle. Nothing is detected until it is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle around an already-loaded provider.
    pub fn loaded(provider: P) -> Self {
        Self {
            cell: Arc::new(OnceCell::new_with(Some(provider))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub fn get(&self) -> Option<&P> {
        self.cell.get()
    }

    /// Load the provider through `loader` unless it is already loaded.
    ///
    /// Concurrent callers share a single load. A failed load leaves the
    /// handle empty and returns the error.
    pub async fn load_with<L>(&self, loader: &L) -> MediaResult<&P>
    where
        L: LandmarkLoader<Provider = P> + ?Sized,
    {
        self.cell
            .get_or_try_init(|| async {
                match loader.load().await {
                    Ok(provider) => {
                        info!(
                            loader = loader.name(),
                            provider = provider.name(),
                            "Landmark provider loaded"
                        );
                        metrics::record_provider_load(true);
                        Ok(provider)
                    }
                    Err(e) => {
                        warn!(loader = loader.name(), error = %e, "Landmark provider failed to load");
                        metrics::record_provider_load(false);
                        Err(e)
                    }
                }
            })
            .await
    }
}
