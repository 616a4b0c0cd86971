//! Heart Core Library
//!
//! Provides the shared domain types used by the trainer and the
//! inference service:
//! - Feature schema for prediction requests
//! - Model artifact type and its persistence
//! - Error taxonomy
//! - Runtime configuration

pub mod artifact;
pub mod config;
pub mod error;
pub mod features;
pub mod scaler;

// Re-export commonly used items
pub use artifact::{InferenceModel, ModelArtifact};
pub use config::ModelConfig;
pub use error::ModelError;
pub use features::{FeatureRecord, FEATURE_NAMES};
pub use scaler::StandardScaler;

/// Initialize tracing with standard configuration
pub fn init_tracing(service_name: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info,tower_http=debug", service_name)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
