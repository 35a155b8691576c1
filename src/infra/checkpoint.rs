// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder,
// plus a JSON record describing how those weights were produced.
//
// What gets saved in the model directory:
//   diamond_price_predictor.mpk   ← weights (MessagePack, half precision)
//   train_config.json             ← hyper-parameters, split seed,
//                                   input dimension, fitted scaler
//
// The directory is also what `deploy` uploads, so everything a
// consumer needs to rebuild and feed the model travels with it.
//
// CompactRecorder is type-safe: loading fails if the record does
// not match the architecture it is loaded into.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::preprocessor::FeatureScaler;
use crate::domain::diamond::FEATURE_NAMES;
use crate::ml::model::DiamondPricePredictor;

/// Weight file stem; the recorder appends its own extension.
pub const WEIGHTS_STEM: &str = "diamond_price_predictor";
/// Extension CompactRecorder (named MessagePack) writes.
pub const WEIGHTS_EXTENSION: &str = "mpk";
const RECORD_FILE: &str = "train_config.json";

/// Everything needed to rebuild the model that produced a weight file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub config:        TrainConfig,
    pub input_dim:     usize,
    pub feature_names: Vec<String>,
    pub scaler:        FeatureScaler,
}

impl TrainingRecord {
    pub fn new(config: TrainConfig, scaler: FeatureScaler) -> Self {
        Self {
            config,
            input_dim:     scaler.dims(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler,
        }
    }
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager and its directory (`mkdir -p`).
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create model directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the weight file as written to disk.
    pub fn weights_path(&self) -> PathBuf {
        self.dir
            .join(WEIGHTS_STEM)
            .with_extension(WEIGHTS_EXTENSION)
    }

    /// Save model weights to `{dir}/diamond_price_predictor.mpk`.
    pub fn save_model<B: Backend>(&self, model: &DiamondPricePredictor<B>) -> Result<PathBuf> {
        let path = self.dir.join(WEIGHTS_STEM);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save weights to '{}'", path.display())
            })?;

        let written = self.weights_path();
        tracing::debug!("Saved weights: {}", written.display());
        Ok(written)
    }

    /// Load weights from an explicit file path into `model`.
    ///
    /// The model must already have the architecture the weights
    /// were saved from, or the recorder rejects them. The recorder
    /// swaps in its own extension, so any other extension is refused
    /// rather than silently reading a sibling `.mpk` file.
    pub fn load_weights<B: Backend>(
        path:   &Path,
        model:  DiamondPricePredictor<B>,
        device: &B::Device,
    ) -> Result<DiamondPricePredictor<B>> {
        ensure!(
            path.extension().and_then(|e| e.to_str()) == Some(WEIGHTS_EXTENSION),
            "Weight file '{}' must have the .{} extension",
            path.display(),
            WEIGHTS_EXTENSION
        );
        ensure!(
            path.is_file(),
            "Weight file '{}' not found. Have you trained the model first?",
            path.display()
        );
        tracing::info!("Loading weights from '{}'", path.display());

        let record = CompactRecorder::new()
            .load(path.to_path_buf(), device)
            .with_context(|| {
                format!("Cannot load weights '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training record next to the weights.
    pub fn save_record(&self, record: &TrainingRecord) -> Result<()> {
        let path = self.dir.join(RECORD_FILE);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved training record to '{}'", path.display());
        Ok(())
    }

    /// Read the training record stored in `dir`, if there is one.
    pub fn load_record(dir: &Path) -> Result<Option<TrainingRecord>> {
        let path = dir.join(RECORD_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let record = serde_json::from_str(&json)
            .with_context(|| format!("Invalid training record '{}'", path.display()))?;
        Ok(Some(record))
    }
}
