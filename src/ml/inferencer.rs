// ============================================================
// Layer 5: Inferencer
// ============================================================
// Rebuilds the network on the inner (non-autodiff) backend,
// loads saved weights into it and predicts prices. No gradient
// graph is ever recorded here.
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use burn::prelude::*;

use crate::data::dataset::DiamondSample;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{DiamondPricePredictor, DiamondPricePredictorConfig};
use crate::ml::InferBackend;

// Rows per forward pass; bounds peak memory on the full test split
const PREDICT_CHUNK: usize = 4096;

pub struct Inferencer {
    model:     DiamondPricePredictor<InferBackend>,
    input_dim: usize,
    device:    <InferBackend as Backend>::Device,
}

impl Inferencer {
    /// Build a model from `model_cfg` and load the weights at `weights`.
    pub fn from_weights(model_cfg: &DiamondPricePredictorConfig, weights: &Path) -> Result<Self> {
        let device = <InferBackend as Backend>::Device::default();
        let model: DiamondPricePredictor<InferBackend> = model_cfg.init(&device);
        let model = CheckpointManager::load_weights(weights, model, &device)?;
        tracing::info!("Model loaded ({} input features)", model_cfg.input_dim);
        Ok(Self { model, input_dim: model_cfg.input_dim, device })
    }

    /// Predict one price per sample, in input order.
    pub fn predict(&self, samples: &[DiamondSample]) -> Result<Vec<f32>> {
        let mut predictions = Vec::with_capacity(samples.len());

        for chunk in samples.chunks(PREDICT_CHUNK) {
            if let Some(bad) = chunk.iter().find(|s| s.feature_count() != self.input_dim) {
                bail!(
                    "Sample has {} features, model expects {}",
                    bad.feature_count(),
                    self.input_dim
                );
            }
            let flat: Vec<f32> = chunk
                .iter()
                .flat_map(|s| s.features.iter().copied())
                .collect();

            let input = Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device)
                .reshape([chunk.len(), self.input_dim]);

            let output: Vec<f32> = self.model
                .forward(input)
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;
            predictions.extend(output);
        }

        tracing::debug!("Predicted {} prices", predictions.len());
        Ok(predictions)
    }
}
