use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::diamond::{DiamondRecord, FEATURE_COUNT};

/// One encoded training example: numeric features and the price target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiamondSample {
    pub features: Vec<f32>,
    pub price:    f32,
}

impl DiamondSample {
    pub fn new(features: Vec<f32>, price: f32) -> Self {
        Self { features, price }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl From<&DiamondRecord> for DiamondSample {
    fn from(r: &DiamondRecord) -> Self {
        let features: [f32; FEATURE_COUNT] = r.features();
        Self::new(features.to_vec(), r.price as f32)
    }
}

pub struct DiamondDataset {
    samples: Vec<DiamondSample>,
}

impl DiamondDataset {
    pub fn new(samples: Vec<DiamondSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Number of features per sample, or 0 for an empty dataset.
    pub fn feature_count(&self) -> usize {
        self.samples.first().map_or(0, DiamondSample::feature_count)
    }
}

impl Dataset<DiamondSample> for DiamondDataset {
    fn get(&self, index: usize) -> Option<DiamondSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
