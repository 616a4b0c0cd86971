//! Shared application state for the inference service.
//!
//! The service owns a single process-wide model handle, loaded lazily on
//! the first request that needs it and kept for the life of the process.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use heart_core::{InferenceModel, ModelArtifact, ModelConfig, ModelError};

/// Shared handle to a loaded model.
pub type ModelHandle = Arc<dyn InferenceModel + Send + Sync>;

/// Application state: configuration plus the lazily-loaded model slot.
pub struct AppState {
    /// Artifact location, fixed at startup.
    pub config: ModelConfig,

    /// Loaded model, `None` until the first successful load. A failed
    /// load leaves the slot empty so the next caller retries.
    model: RwLock<Option<ModelHandle>>,
}

impl AppState {
    /// Create state with an explicit configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
        }
    }

    /// Create state from environment variables.
    pub fn from_env() -> Self {
        Self::new(ModelConfig::from_env())
    }

    /// Return the loaded model, loading it on first use.
    ///
    /// The write lock guards the check-then-load sequence so concurrent
    /// first requests deserialize the artifact only once. Failures are
    /// not cached: the slot stays empty and a later call retries.
    pub async fn get_or_load(&self) -> Result<ModelHandle, ModelError> {
        if let Some(model) = self.model.read().await.as_ref() {
            return Ok(model.clone());
        }

        let mut slot = self.model.write().await;
        if let Some(model) = slot.as_ref() {
            // Another request won the race while we waited for the lock
            return Ok(model.clone());
        }

        match ModelArtifact::load(self.config.path()) {
            Ok(artifact) => {
                info!(
                    path = %self.config.model_path.display(),
                    features = artifact.n_features(),
                    "Model artifact loaded"
                );
                let model: ModelHandle = Arc::new(artifact);
                *slot = Some(model.clone());
                Ok(model)
            }
            Err(e) => {
                warn!(
                    path = %self.config.model_path.display(),
                    error = %e,
                    "Model artifact load failed"
                );
                Err(e)
            }
        }
    }

    /// Whether a model is currently loaded.
    pub async fn is_loaded(&self) -> bool {
        self.model.read().await.is_some()
    }
}
