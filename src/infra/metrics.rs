// ============================================================
// Layer 6: Metrics Files
// ============================================================
// Two outputs live under the metrics directory:
//
//   metrics.json       ← written by `evaluate`: {"r2": 0.98...}
//                        A single key so CI pipelines can read the
//                        score without knowing anything else.
//
//   training_log.csv   ← appended by `train`, one row per epoch:
//     epoch,train_loss,valid_loss,valid_rmse
//     1,31276543.125000,30112288.500000,5487.466125
//     2,...
//
// How to read the training log:
//   - Both losses should fall epoch over epoch
//   - valid_loss rising while train_loss falls → overfitting
//   - valid_rmse is in dollars, the same unit as the price

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const METRICS_FILE: &str = "metrics.json";
pub const TRAINING_LOG_FILE: &str = "training_log.csv";

/// The persisted evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsFile {
    pub r2: f64,
}

impl MetricsFile {
    /// Write `{"r2": <value>}` to `{dir}/metrics.json`, creating `dir`.
    /// Returns the written path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        // JSON has no NaN/inf; serde_json would write `null`
        anyhow::ensure!(self.r2.is_finite(), "R² is not finite ({})", self.r2);

        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;
        let path = dir.join(METRICS_FILE);
        fs::write(&path, serde_json::to_string(self)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(path)
    }
}

/// One row of the training log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average MSE over all training batches
    pub train_loss: f64,

    /// MSE over the whole validation split
    pub valid_loss: f64,

    /// sqrt(valid_loss)
    pub valid_rmse: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, valid_loss: f64) -> Self {
        Self { epoch, train_loss, valid_loss, valid_rmse: valid_loss.sqrt() }
    }

    /// Returns true if this epoch improved over the previous best valid_loss
    pub fn is_improvement(&self, best_valid_loss: f64) -> bool {
        self.valid_loss < best_valid_loss
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger. Starts a fresh log with a header row, since
    /// each training run overwrites the previous weights.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join(TRAINING_LOG_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,valid_loss,valid_rmse")?;
        tracing::debug!("Created training log: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.valid_loss,
            m.valid_rmse,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, valid_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.valid_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_file_is_single_numeric_field() {
        let tmp  = tempfile::tempdir().unwrap();
        let dir  = tmp.path().join("nested").join("metrics");
        let path = MetricsFile { r2: 0.9812 }.write(&dir).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["r2"].as_f64(), Some(0.9812));
    }

    #[test]
    fn test_metrics_file_rejects_nan() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(MetricsFile { r2: f64::NAN }.write(tmp.path()).is_err());
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_logger_writes_header_and_rows() {
        let tmp    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 16.0, 9.0)).unwrap();
        logger.log(&EpochMetrics::new(2, 4.0, 1.0)).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,valid_loss,valid_rmse");
        assert_eq!(lines[1], "1,16.000000,9.000000,3.000000");
        assert_eq!(lines.len(), 3);
    }
}
