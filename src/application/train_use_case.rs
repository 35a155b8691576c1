// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load, clean, split, scale   (Layer 4 - data)
//   Step 2: Build Burn datasets         (Layer 4 - data)
//   Step 3: Save the training record    (Layer 6 - infra)
//   Step 4: Open the epoch log          (Layer 6 - infra)
//   Step 5: Run training loop           (Layer 5 - ml)
//
// The record is written BEFORE training so a crashed run still
// documents what it was attempting.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{dataset::DiamondDataset, loader::CsvLoader, prepare_splits};
use crate::domain::traits::DiamondSource;
use crate::infra::{
    checkpoint::{CheckpointManager, TrainingRecord},
    metrics::MetricsLogger,
};
use crate::ml::trainer::{run_training, TrainSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Saved next to the weights
// so `evaluate` can rebuild the same architecture and split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:     PathBuf,
    pub model_dir:     PathBuf,
    pub metrics_dir:   PathBuf,
    pub epochs:        usize,
    pub batch_size:    usize,
    pub lr:            f64,
    pub hidden_dim:    usize,
    pub hidden_dim2:   usize,
    pub test_fraction: f64,
    pub seed:          u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:     PathBuf::from("data/diamonds.csv"),
            model_dir:     PathBuf::from("models"),
            metrics_dir:   PathBuf::from("metrics"),
            epochs:        50,
            batch_size:    32,
            lr:            1e-3,
            hidden_dim:    64,
            hidden_dim2:   32,
            test_fraction: 0.2,
            seed:          42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train from the CSV file named in the config.
    pub fn execute(&self) -> Result<TrainSummary> {
        let loader = CsvLoader::new(&self.config.data_path);
        tracing::info!("Loading diamonds from '{}'", loader.path().display());
        self.execute_with(&loader)
    }

    /// Train from any record source.
    pub fn execute_with(&self, source: &impl DiamondSource) -> Result<TrainSummary> {
        let cfg = &self.config;
        anyhow::ensure!(
            (0.0..1.0).contains(&cfg.test_fraction),
            "Test fraction must be in [0, 1), got {}", cfg.test_fraction
        );

        // ── Step 1: Load, clean, split and standardise ────────────────────────
        let splits = prepare_splits(source, cfg.test_fraction, cfg.seed)?;
        if splits.test.is_empty() {
            tracing::warn!("Test split is empty, validation loss will be NaN");
        }

        // ── Step 2: Build Burn datasets ───────────────────────────────────────
        let input_dim     = splits.input_dim();
        let train_dataset = DiamondDataset::new(splits.train);
        let valid_dataset = DiamondDataset::new(splits.test);

        // ── Step 3: Save the training record ──────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.model_dir)?;
        ckpt_manager.save_record(&TrainingRecord::new(cfg.clone(), splits.scaler))?;
        tracing::info!("Model directory: '{}'", ckpt_manager.dir().display());

        // ── Step 4: Open the epoch log ────────────────────────────────────────
        let logger = MetricsLogger::new(&cfg.metrics_dir)?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        tracing::info!(
            "Training on {} samples ({} features) for {} epochs",
            train_dataset.sample_count(), input_dim, cfg.epochs
        );
        let summary = run_training(cfg, train_dataset, valid_dataset, &ckpt_manager, &logger)?;

        println!(
            "Training finished after {} epochs: train_loss={:.2}, valid_loss={:.2}, best_valid_loss={:.2}",
            summary.epochs, summary.final_train_loss, summary.final_valid_loss, summary.best_valid_loss
        );
        Ok(summary)
    }
}
