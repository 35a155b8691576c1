// ============================================================
// Layer 2: EvaluateUseCase
// ============================================================
// Scores a trained model on the held-out test split:
//
//   Step 1: Read the training record, if any  (Layer 6 - infra)
//   Step 2: Re-derive split + scaler          (Layer 4 - data)
//   Step 3: Rebuild model, load weights       (Layer 5 - ml)
//   Step 4: Predict on the test split         (Layer 5 - ml)
//   Step 5: MSE / RMSE / R²                   (Layer 3 - domain)
//   Step 6: Write metrics/metrics.json        (Layer 6 - infra)
//
// The test split is never stored. It is rebuilt from the same
// data, fraction and seed that `train` used, which yields the
// same rows in the same order.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::data::{loader::CsvLoader, prepare_splits};
use crate::domain::{metrics::RegressionReport, traits::DiamondSource};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsFile};
use crate::ml::{inferencer::Inferencer, model::DiamondPricePredictorConfig};

use super::train_use_case::TrainConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub data_path:     PathBuf,
    pub weights_path:  PathBuf,
    pub metrics_dir:   PathBuf,
    /// Overrides the fraction recorded at training time
    pub test_fraction: Option<f64>,
    /// Overrides the seed recorded at training time
    pub seed:          Option<u64>,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            data_path:     PathBuf::from("data/diamonds.csv"),
            weights_path:  PathBuf::from("models/diamond_price_predictor.mpk"),
            metrics_dir:   PathBuf::from("metrics"),
            test_fraction: None,
            seed:          None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluateOutcome {
    pub report:       RegressionReport,
    pub test_samples: usize,
    pub metrics_path: PathBuf,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvaluateOutcome> {
        let loader = CsvLoader::new(&self.config.data_path);
        tracing::info!("Loading diamonds from '{}'", loader.path().display());
        self.execute_with(&loader)
    }

    pub fn execute_with(&self, source: &impl DiamondSource) -> Result<EvaluateOutcome> {
        let cfg = &self.config;

        // ── Step 1: Training record ───────────────────────────────────────────
        let model_dir = cfg.weights_path.parent().unwrap_or(Path::new("."));
        let record    = CheckpointManager::load_record(model_dir)?;
        let trained   = match &record {
            Some(r) => r.config.clone(),
            None => {
                tracing::warn!(
                    "No training record in '{}', using default architecture and split",
                    model_dir.display()
                );
                TrainConfig::default()
            }
        };
        let test_fraction = cfg.test_fraction.unwrap_or(trained.test_fraction);
        let seed          = cfg.seed.unwrap_or(trained.seed);

        // ── Step 2: Re-derive the split ───────────────────────────────────────
        let splits = prepare_splits(source, test_fraction, seed)?;
        ensure!(!splits.test.is_empty(), "Test split is empty (test fraction {test_fraction})");

        if let Some(r) = &record {
            ensure!(
                r.input_dim == splits.input_dim(),
                "Model was trained on {} features but the data yields {}",
                r.input_dim, splits.input_dim()
            );
            if r.scaler != splits.scaler {
                tracing::warn!("Feature scaling differs from training, has the dataset changed?");
            }
        }

        // ── Step 3: Rebuild model and load weights ────────────────────────────
        let model_cfg = DiamondPricePredictorConfig::new(splits.input_dim())
            .with_hidden_dim(trained.hidden_dim)
            .with_hidden_dim2(trained.hidden_dim2);
        let inferencer = Inferencer::from_weights(&model_cfg, &cfg.weights_path)?;

        // ── Step 4: Predict ───────────────────────────────────────────────────
        let predictions = inferencer.predict(&splits.test)?;
        let targets: Vec<f32> = splits.test.iter().map(|s| s.price).collect();

        // ── Step 5: Score ─────────────────────────────────────────────────────
        let report = RegressionReport::compute(&targets, &predictions)?;
        println!("MSE: {:.2}", report.mse);
        println!("RMSE: {:.2}", report.rmse);
        println!("R2 Score: {:.2}", report.r2);
        tracing::info!("MAE on {} test samples: {:.2}", targets.len(), report.mae);

        // ── Step 6: Persist R² ────────────────────────────────────────────────
        let metrics_path = MetricsFile { r2: report.r2 }.write(&cfg.metrics_dir)?;
        tracing::info!("Wrote '{}'", metrics_path.display());

        Ok(EvaluateOutcome { report, test_samples: targets.len(), metrics_path })
    }
}
