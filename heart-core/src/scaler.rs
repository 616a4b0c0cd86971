//! Per-column standardization fitted at training time.
//!
//! The fitted means and deviations travel inside the model artifact so
//! serving applies exactly the transform the classifier was trained on.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Column-wise standard scaler: `(x - mean) / std`.
///
/// Columns with zero deviation (constant in the training set) pass
/// through centered but unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fit the scaler on a training matrix (rows are samples).
    pub fn fit(records: &Array2<f64>) -> Self {
        let n_cols = records.ncols();
        let mean = records
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_cols));
        let std = records.std_axis(Axis(0), 0.0);
        Self {
            mean: mean.to_vec(),
            std: std.to_vec(),
        }
    }

    /// Number of feature columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a single row. The caller guarantees the width matches.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&x, (&m, &s))| if s > 0.0 { (x - m) / s } else { x - m })
            .collect()
    }

    /// Standardize a whole matrix in place, returning the result.
    pub fn transform(&self, records: &Array2<f64>) -> Array2<f64> {
        let mut out = records.clone();
        for mut row in out.rows_mut() {
            let scaled = self.transform_row(row.as_slice().unwrap_or(&[]));
            for (cell, value) in row.iter_mut().zip(scaled) {
                *cell = value;
            }
        }
        out
    }
}
