//! Heart Disease Prediction Service
//!
//! Serves predictions from the artifact produced by the trainer binary.
//!
//! Endpoints:
//! - GET /health - Health check (never touches the model)
//! - GET /info - Artifact path, model type, and feature names
//! - POST /predict - Classify a 13-field feature record
//!
//! The model artifact is loaded lazily on the first request that needs
//! it and stays resident for the life of the process.

mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/info", get(handlers::info_handler))
        .route("/predict", post(handlers::predict_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    heart_core::init_tracing("inference_service");

    let bind_addr =
        std::env::var("PREDICT_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let state = Arc::new(AppState::from_env());
    info!(
        model_path = %state.config.model_path.display(),
        "Inference service starting"
    );

    let app = router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!(bind_addr = bind_addr, "Listening");

    axum::serve(listener, app).await.expect("Server failed");
}
