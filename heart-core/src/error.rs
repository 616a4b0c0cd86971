//! Error taxonomy for model loading and prediction.

use thiserror::Error;

/// Errors that can occur while loading the model artifact or running
/// a prediction against it.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found at '{path}'; run the trainer to produce it")]
    ArtifactMissing { path: String },

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("feature vector has {got} columns, model expects {expected}")]
    FeatureShape { expected: usize, got: usize },
}

impl ModelError {
    /// True when the error means the artifact simply has not been
    /// trained yet, as opposed to a genuine runtime failure.
    pub fn is_artifact_missing(&self) -> bool {
        matches!(self, Self::ArtifactMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_names_path() {
        let err = ModelError::ArtifactMissing {
            path: "model/heart_model.json".to_string(),
        };
        assert!(err.to_string().contains("model/heart_model.json"));
        assert!(err.to_string().contains("trainer"));
        assert!(err.is_artifact_missing());
    }

    #[test]
    fn test_feature_shape_message() {
        let err = ModelError::FeatureShape {
            expected: 13,
            got: 12,
        };
        assert!(err.to_string().contains("13"));
        assert!(err.to_string().contains("12"));
        assert!(!err.is_artifact_missing());
    }
}
