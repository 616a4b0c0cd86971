//! Feature schema for prediction requests.
//!
//! The 13 fields describe a single patient and must arrive in the same
//! order the classifier was trained with. `FEATURE_NAMES` is the single
//! source of truth for that order; the trainer validates dataset columns
//! against it and `to_row` assembles request fields with it.

use serde::{Deserialize, Serialize};

/// Canonical feature column order, identical at training and serving time.
pub const FEATURE_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// A single patient description submitted for prediction.
///
/// Integer-coded fields (`sex`, `cp`, ...) reject fractional JSON values
/// at deserialization time; every field is required, so a missing or
/// non-numeric value never reaches the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub age: f64,
    pub sex: i64,
    pub cp: i64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: i64,
    pub restecg: i64,
    pub thalach: f64,
    pub exang: i64,
    pub oldpeak: f64,
    pub slope: i64,
    pub ca: i64,
    pub thal: i64,
}

impl FeatureRecord {
    /// Assemble the fields into a numeric row in [`FEATURE_NAMES`] order.
    pub fn to_row(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex as f64,
            self.cp as f64,
            self.trestbps,
            self.chol,
            self.fbs as f64,
            self.restecg as f64,
            self.thalach,
            self.exang as f64,
            self.oldpeak,
            self.slope as f64,
            self.ca as f64,
            self.thal as f64,
        ]
    }
}
