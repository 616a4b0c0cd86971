//! Dataset acquisition and preparation.
//!
//! Acquisition walks an ordered list of sources (remote download, then a
//! local CSV search); the first success wins and the collected failures
//! are reported together when every source comes up empty. Preparation
//! validates the column schema, coerces cells to numbers, and imputes
//! missing values with the column median.

use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use heart_core::FEATURE_NAMES;

/// Label column the classifier is trained against.
pub const TARGET_COLUMN: &str = "target";

/// Environment variable carrying the remote dataset URL.
pub const DATASET_URL_ENV: &str = "HEART_DATASET_URL";

/// Environment variable overriding the local dataset directory.
pub const DATA_DIR_ENV: &str = "HEART_DATA_DIR";

/// Default local dataset directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Errors from acquiring or preparing the training dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset not found; all sources failed: {}", .failures.join("; "))]
    NotFound { failures: Vec<String> },

    #[error(
        "dataset is missing required columns [{}]; found columns [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("column '{column}' has no numeric values to impute from")]
    EmptyColumn { column: String },

    #[error("row {row}: target value '{value}' is not a binary label")]
    BadTarget { row: usize, value: String },

    #[error("dataset contains no data rows")]
    Empty,

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One way of obtaining the raw CSV text, tried in order.
pub enum DatasetSource {
    /// Download from a configured URL. An unconfigured URL counts as a
    /// failure so it shows up in the collected report.
    RemoteCsv { url: Option<String> },

    /// Probe `<dir>/heart.csv`, then any `*.csv` directly inside the
    /// directory, then `./heart.csv`.
    LocalSearch { dir: PathBuf },
}

impl DatasetSource {
    /// Short human-readable name for failure reports and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::RemoteCsv { url: Some(url) } => format!("remote download ({url})"),
            Self::RemoteCsv { url: None } => "remote download".to_string(),
            Self::LocalSearch { dir } => format!("local search ('{}')", dir.display()),
        }
    }

    /// Attempt this source, returning the CSV text or a failure reason.
    async fn fetch(&self) -> Result<String, String> {
        match self {
            Self::RemoteCsv { url: None } => Err(format!("{DATASET_URL_ENV} is not set")),
            Self::RemoteCsv { url: Some(url) } => fetch_remote(url).await,
            Self::LocalSearch { dir } => {
                let path = search_local(dir)?;
                std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read '{}': {e}", path.display()))
            }
        }
    }
}

async fn fetch_remote(url: &str) -> Result<String, String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| format!("request failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }
    response
        .text()
        .await
        .map_err(|e| format!("body read failed: {e}"))
}

fn search_local(dir: &Path) -> Result<PathBuf, String> {
    let preferred = dir.join("heart.csv");
    if preferred.is_file() {
        return Ok(preferred);
    }

    if let Ok(entries) = std::fs::read_dir(dir) {
        let mut candidates: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        candidates.sort();
        if let Some(path) = candidates.into_iter().next() {
            return Ok(path);
        }
    }

    let fallback = PathBuf::from("heart.csv");
    if fallback.is_file() {
        return Ok(fallback);
    }

    Err(format!("no CSV file found under '{}'", dir.display()))
}

/// Build the default source chain from the environment.
pub fn sources_from_env() -> Vec<DatasetSource> {
    let url = std::env::var(DATASET_URL_ENV).ok().filter(|v| !v.is_empty());
    let dir = std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    vec![
        DatasetSource::RemoteCsv { url },
        DatasetSource::LocalSearch { dir: dir.into() },
    ]
}

/// Try each source in order; first success wins.
pub async fn acquire(sources: &[DatasetSource]) -> Result<String, DatasetError> {
    let mut failures = Vec::new();
    for source in sources {
        match source.fetch().await {
            Ok(text) => {
                info!(source = %source.describe(), bytes = text.len(), "Dataset acquired");
                return Ok(text);
            }
            Err(reason) => {
                warn!(source = %source.describe(), reason = %reason, "Dataset source failed");
                failures.push(format!("{}: {reason}", source.describe()));
            }
        }
    }
    Err(DatasetError::NotFound { failures })
}

/// Prepared training data: numeric feature matrix plus binary targets.
pub struct TrainingTable {
    pub records: Array2<f64>,
    pub targets: Array1<usize>,
    pub feature_names: Vec<String>,
}

/// Parse and prepare the raw CSV text.
///
/// Validates the header against the canonical feature schema, coerces
/// every feature cell to f64 (unparseable cells become missing), imputes
/// missing cells with the column median, and checks the target labels.
pub fn parse_csv(text: &str) -> Result<TrainingTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut required: Vec<&str> = FEATURE_NAMES.to_vec();
    required.push(TARGET_COLUMN);
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns {
            missing,
            found: headers,
        });
    }

    let column_index = |name: &str| headers.iter().position(|h| h == name);
    let feature_indices: Vec<usize> = FEATURE_NAMES
        .iter()
        .filter_map(|name| column_index(name))
        .collect();
    let target_index = column_index(TARGET_COLUMN).ok_or(DatasetError::Empty)?;

    let mut cells: Vec<f64> = Vec::new();
    let mut targets: Vec<usize> = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for &idx in &feature_indices {
            let cell = record.get(idx).unwrap_or("");
            cells.push(cell.parse::<f64>().unwrap_or(f64::NAN));
        }
        let raw_target = record.get(target_index).unwrap_or("").to_string();
        let label = match raw_target.parse::<f64>() {
            Ok(v) if v == 0.0 => 0,
            Ok(v) if v == 1.0 => 1,
            _ => {
                return Err(DatasetError::BadTarget {
                    row,
                    value: raw_target,
                })
            }
        };
        targets.push(label);
    }

    let n_rows = targets.len();
    if n_rows == 0 {
        return Err(DatasetError::Empty);
    }

    let n_cols = FEATURE_NAMES.len();
    let mut records = Array2::from_shape_vec((n_rows, n_cols), cells)
        .map_err(|_| DatasetError::Empty)?;
    impute_medians(&mut records)?;

    Ok(TrainingTable {
        records,
        targets: Array1::from(targets),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Replace NaN cells with the median of their column.
fn impute_medians(records: &mut Array2<f64>) -> Result<(), DatasetError> {
    for col in 0..records.ncols() {
        let mut present: Vec<f64> = records
            .column(col)
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if present.is_empty() {
            return Err(DatasetError::EmptyColumn {
                column: FEATURE_NAMES[col].to_string(),
            });
        }
        if present.len() == records.nrows() {
            continue;
        }
        let median = median_of(&mut present);
        for cell in records.column_mut(col) {
            if !cell.is_finite() {
                *cell = median;
            }
        }
    }
    Ok(())
}

fn median_of(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heart_csv(rows: &[&str]) -> String {
        let mut text = String::from(
            "age,sex,cp,trestbps,chol,fbs,restecg,thalach,exang,oldpeak,slope,ca,thal,target\n",
        );
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_valid_csv() {
        let text = heart_csv(&[
            "63,1,3,145,233,1,0,150,0,2.3,0,0,1,1",
            "45,0,1,120,210,0,1,170,0,0.5,2,0,2,0",
        ]);
        let table = parse_csv(&text).unwrap();

        assert_eq!(table.records.nrows(), 2);
        assert_eq!(table.records.ncols(), 13);
        assert_eq!(table.targets.to_vec(), vec![1, 0]);
        assert_eq!(table.feature_names.len(), 13);
        assert_eq!(table.records[[0, 0]], 63.0);
        assert_eq!(table.records[[1, 9]], 0.5);
    }

    #[test]
    fn test_extra_columns_tolerated_and_reordered() {
        // Column order in the file differs from the canonical order and
        // includes an unrelated column; values must land by name.
        let text = "target,id,age,sex,cp,trestbps,chol,fbs,restecg,thalach,exang,oldpeak,slope,ca,thal\n\
                    1,99,63,1,3,145,233,1,0,150,0,2.3,0,0,1\n";
        let table = parse_csv(text).unwrap();
        assert_eq!(table.records[[0, 0]], 63.0); // age
        assert_eq!(table.records[[0, 12]], 1.0); // thal
        assert_eq!(table.targets[0], 1);
    }

    #[test]
    fn test_missing_columns_named_in_error() {
        let text = "age,sex,cp\n63,1,3\n";
        let err = parse_csv(text).unwrap_err();
        match err {
            DatasetError::MissingColumns { missing, found } => {
                assert!(missing.contains(&"target".to_string()));
                assert!(missing.contains(&"thal".to_string()));
                assert!(!missing.contains(&"age".to_string()));
                assert_eq!(found, vec!["age", "sex", "cp"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The message must name both sides
        let text = "age,sex,cp\n63,1,3\n";
        let message = parse_csv(text).unwrap_err().to_string();
        assert!(message.contains("thal"));
        assert!(message.contains("age"));
    }

    #[test]
    fn test_non_numeric_cell_imputed_with_median() {
        let text = heart_csv(&[
            "10,1,3,145,233,1,0,150,0,2.3,0,0,1,1",
            "?,0,1,120,210,0,1,170,0,0.5,2,0,2,0",
            "20,1,2,130,250,0,0,160,1,1.0,1,0,3,1",
            "30,0,0,110,190,0,1,175,0,0.0,2,0,2,0",
        ]);
        let table = parse_csv(&text).unwrap();
        // Median of {10, 20, 30}
        assert_eq!(table.records[[1, 0]], 20.0);
    }

    #[test]
    fn test_all_missing_column_is_fatal() {
        let text = heart_csv(&[
            "na,1,3,145,233,1,0,150,0,2.3,0,0,1,1",
            "na,0,1,120,210,0,1,170,0,0.5,2,0,2,0",
        ]);
        let err = parse_csv(&text).unwrap_err();
        match err {
            DatasetError::EmptyColumn { column } => assert_eq!(column, "age"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_binary_target_rejected() {
        let text = heart_csv(&["63,1,3,145,233,1,0,150,0,2.3,0,0,1,2"]);
        let err = parse_csv(&text).unwrap_err();
        match err {
            DatasetError::BadTarget { row, value } => {
                assert_eq!(row, 0);
                assert_eq!(value, "2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let text = heart_csv(&[]);
        assert!(matches!(parse_csv(&text), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_median_interpolates_even_counts() {
        assert_eq!(median_of(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median_of(&mut [3.0, 1.0, 2.0]), 2.0);
    }

    #[tokio::test]
    async fn test_acquire_prefers_first_working_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("heart.csv"), "age,target\n1,0\n").unwrap();

        let sources = vec![
            DatasetSource::RemoteCsv { url: None },
            DatasetSource::LocalSearch {
                dir: dir.path().to_path_buf(),
            },
        ];
        let text = acquire(&sources).await.unwrap();
        assert!(text.starts_with("age,target"));
    }

    #[tokio::test]
    async fn test_acquire_falls_back_to_other_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cleveland.csv"), "age,target\n2,1\n").unwrap();

        let sources = vec![DatasetSource::LocalSearch {
            dir: dir.path().to_path_buf(),
        }];
        let text = acquire(&sources).await.unwrap();
        assert!(text.contains("2,1"));
    }

    #[tokio::test]
    async fn test_acquire_collects_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            DatasetSource::RemoteCsv { url: None },
            DatasetSource::LocalSearch {
                dir: dir.path().join("nowhere"),
            },
        ];

        let err = acquire(&sources).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dataset not found"));
        assert!(message.contains(DATASET_URL_ENV));
        assert!(message.contains("nowhere"));
    }
}
