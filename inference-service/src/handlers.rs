//! Request handlers for the prediction endpoints.
//!
//! All model-load and prediction failures are converted to structured
//! JSON error payloads here; nothing propagates to the caller as a raw
//! fault. A missing artifact is the caller's problem (400, train first);
//! everything else is ours (500).

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use heart_core::{FeatureRecord, ModelError};

use crate::state::AppState;

/// Structured JSON error response.
type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Serialize)]
pub struct InfoResponse {
    pub model_path: String,
    pub model_type: String,
    pub features: Vec<String>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub heart_disease: bool,
}

/// Health check. Never touches the model.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Model metadata. Triggers a load if the model is not resident yet.
pub async fn info_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InfoResponse>, ApiError> {
    let model = state.get_or_load().await.map_err(load_error_response)?;

    Ok(Json(InfoResponse {
        model_path: state.config.model_path.display().to_string(),
        model_type: model.model_type(),
        features: model.feature_names(),
    }))
}

/// Classify a feature record.
///
/// The request schema has already rejected malformed bodies by the time
/// this runs; what remains is load failure (400/500) and the classifier
/// itself rejecting the assembled row (500).
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(record): Json<FeatureRecord>,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state.get_or_load().await.map_err(load_error_response)?;

    match model.predict_label(&record.to_row()) {
        Ok(label) => {
            info!(label = label, "Prediction served");
            Ok(Json(PredictResponse {
                heart_disease: label == 1,
            }))
        }
        Err(e) => {
            error!(error = %e, "Prediction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("prediction failed: {e}") })),
            ))
        }
    }
}

/// Map a load failure onto the HTTP surface.
fn load_error_response(err: ModelError) -> ApiError {
    if err.is_artifact_missing() {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
    } else {
        error!(error = %err, "Model load failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("model load failed: {err}") })),
        )
    }
}
