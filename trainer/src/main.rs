//! Heart Disease Model Trainer
//!
//! One-shot batch job: acquires the labeled dataset, fits the
//! standardization + logistic regression pipeline, reports held-out
//! accuracy, and persists the model artifact the inference service
//! loads at runtime.
//!
//! Any failure is fatal; the process exits non-zero with the error
//! logged, leaving no partial artifact behind.

mod dataset;
mod train;

use anyhow::Context;
use tracing::{error, info};

use heart_core::ModelConfig;

#[tokio::main]
async fn main() {
    heart_core::init_tracing("trainer");

    if let Err(e) = run().await {
        error!(error = ?e, "Training failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ModelConfig::from_env();

    let sources = dataset::sources_from_env();
    let csv_text = dataset::acquire(&sources).await?;
    let table = dataset::parse_csv(&csv_text)?;
    info!(
        rows = table.records.nrows(),
        features = table.records.ncols(),
        "Dataset ready"
    );

    let (artifact, report) = train::train(&table)?;
    info!(
        n_train = report.n_train,
        n_test = report.n_test,
        accuracy = report.test_accuracy,
        "Held-out evaluation complete"
    );

    artifact.save(config.path()).with_context(|| {
        format!(
            "failed to write model artifact to '{}'",
            config.model_path.display()
        )
    })?;
    info!(path = %config.model_path.display(), "Model artifact saved");

    Ok(())
}
