//! Model fitting and evaluation.
//!
//! The split is stratified per class and shuffled with a fixed seed so
//! repeated runs produce identical partitions with the class balance of
//! the full dataset preserved on both sides.

use anyhow::Context;
use chrono::Utc;
use linfa::prelude::*;
use ndarray::{Array1, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::info;

use heart_core::{ModelArtifact, StandardScaler};

use crate::dataset::TrainingTable;

/// Seed for the deterministic train/test shuffle.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of each class kept for training.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Summary of a completed training run.
pub struct TrainReport {
    pub n_train: usize,
    pub n_test: usize,
    pub test_accuracy: f64,
}

/// Split row indices into train/test partitions, stratified on the label.
///
/// Each class is shuffled and split separately so both partitions keep
/// the overall class balance. Classes with at least two members always
/// contribute to both sides.
pub fn stratified_split(
    targets: &Array1<usize>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in targets.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut indices) in by_class {
        indices.shuffle(&mut rng);
        let mut n_train = (indices.len() as f64 * train_fraction).round() as usize;
        if n_train == indices.len() && indices.len() > 1 {
            n_train -= 1;
        }
        if n_train == 0 && indices.len() > 1 {
            n_train = 1;
        }
        train.extend_from_slice(&indices[..n_train]);
        test.extend_from_slice(&indices[n_train..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

/// Fit the scaler + classifier pipeline and evaluate it on held-out rows.
pub fn train(table: &TrainingTable) -> anyhow::Result<(ModelArtifact, TrainReport)> {
    let (train_idx, test_idx) = stratified_split(&table.targets, TRAIN_FRACTION, SPLIT_SEED);
    info!(
        n_train = train_idx.len(),
        n_test = test_idx.len(),
        "Dataset split"
    );

    let train_x = table.records.select(Axis(0), &train_idx);
    let train_y = table.targets.select(Axis(0), &train_idx);
    let test_x = table.records.select(Axis(0), &test_idx);
    let test_y = table.targets.select(Axis(0), &test_idx);

    // The scaler only ever sees the training partition
    let scaler = StandardScaler::fit(&train_x);

    let train_ds = Dataset::new(scaler.transform(&train_x), train_y)
        .with_feature_names(table.feature_names.clone());
    let classifier = linfa_logistic::LogisticRegression::default()
        .max_iterations(300)
        .fit(&train_ds)
        .context("classifier fit failed")?;

    let test_ds = Dataset::new(scaler.transform(&test_x), test_y);
    let predictions = classifier.predict(&test_ds);
    let confusion = predictions
        .confusion_matrix(&test_ds)
        .context("held-out evaluation failed")?;
    let test_accuracy = f64::from(confusion.accuracy());

    let artifact = ModelArtifact {
        feature_names: table.feature_names.clone(),
        scaler,
        classifier,
        trained_at: Utc::now(),
        test_accuracy: Some(test_accuracy),
    };
    let report = TrainReport {
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        test_accuracy,
    };
    Ok((artifact, report))
}
