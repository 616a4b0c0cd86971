//! Serialized model artifact and the capability interface the inference
//! service consumes it through.
//!
//! The artifact is written once by the trainer and read once per process
//! by the service. It bundles everything prediction needs: the fitted
//! scaler, the fitted classifier, and the feature column order captured
//! at training time.

use chrono::{DateTime, Utc};
use linfa::traits::Predict;
use linfa_logistic::FittedLogisticRegression;
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ModelError;
use crate::scaler::StandardScaler;

/// Capability interface for a loaded model.
///
/// `predict_label` is the required capability; feature-name introspection
/// is best effort and an artifact that carries none reports an empty list
/// rather than failing.
pub trait InferenceModel {
    /// Classify one feature row, returning the raw 0/1 label.
    fn predict_label(&self, row: &[f64]) -> Result<usize, ModelError>;

    /// Feature column names captured at training time, possibly empty.
    fn feature_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Runtime type name of the underlying model.
    fn model_type(&self) -> String;
}

/// Fitted preprocessing + classifier pipeline persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Column order the classifier was trained with. Older artifacts may
    /// not carry this; deserialization defaults to empty.
    #[serde(default)]
    pub feature_names: Vec<String>,

    /// Standardization fitted on the training partition.
    pub scaler: StandardScaler,

    /// Fitted logistic regression classifier.
    pub classifier: FittedLogisticRegression<f64, usize>,

    /// When the trainer produced this artifact.
    pub trained_at: DateTime<Utc>,

    /// Held-out accuracy reported by the trainer. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_accuracy: Option<f64>,
}

impl ModelArtifact {
    /// Load an artifact from disk.
    ///
    /// A missing file is reported as [`ModelError::ArtifactMissing`] so
    /// callers can distinguish "not trained yet" from a corrupt or
    /// unreadable artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::ArtifactMissing {
                path: path.display().to_string(),
            });
        }
        let bytes = std::fs::read(path)?;
        let artifact: Self = serde_json::from_slice(&bytes)?;
        debug!(
            path = %path.display(),
            features = artifact.feature_names.len(),
            "Model artifact deserialized"
        );
        Ok(artifact)
    }

    /// Persist the artifact, creating parent directories as needed.
    ///
    /// Writes through a temporary file and renames it into place so a
    /// failed write never leaves a partial artifact at the final path.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Number of feature columns the artifact expects.
    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }
}

impl InferenceModel for ModelArtifact {
    fn predict_label(&self, row: &[f64]) -> Result<usize, ModelError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(ModelError::FeatureShape {
                expected,
                got: row.len(),
            });
        }
        let scaled = self.scaler.transform_row(row);
        let x = Array1::from(scaled).insert_axis(Axis(0));
        let labels = self.classifier.predict(&x);
        Ok(labels[0])
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn model_type(&self) -> String {
        "StandardScaler + LogisticRegression".to_string()
    }
}
