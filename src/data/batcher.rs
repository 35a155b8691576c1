// ============================================================
// Layer 4: Diamond Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<DiamondSample>
// into tensors on the target device.
//
//   Input:  Vec of N samples, each with F features
//   Output: DiamondBatch with features [N, F] and targets [N, 1]
//
// Features are flattened row-major into one Vec<f32> and then
// reshaped, the same way a 2D tensor is laid out in memory:
//   [s1_f1, s1_f2, ..., s1_fF, s2_f1, ..., sN_fF] → [N, F]
//
// Targets keep a trailing dimension of 1 so they line up with
// the model's [N, 1] output in the MSE loss.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::DiamondSample;

#[derive(Debug, Clone)]
pub struct DiamondBatch<B: Backend> {
    /// Standardised features: [batch_size, feature_count]
    pub features: Tensor<B, 2>,

    /// Prices: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct DiamondBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> DiamondBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<DiamondSample, DiamondBatch<B>> for DiamondBatcher<B> {
    fn batch(&self, items: Vec<DiamondSample>) -> DiamondBatch<B> {
        let batch_size = items.len();
        let dims       = items.first().map_or(0, DiamondSample::feature_count);

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let prices: Vec<f32> = items.iter().map(|s| s.price).collect();

        let features = Tensor::<B, 1>::from_floats(
            features_flat.as_slice(), &self.device
        ).reshape([batch_size, dims]);

        let targets = Tensor::<B, 1>::from_floats(
            prices.as_slice(), &self.device
        ).reshape([batch_size, 1]);

        DiamondBatch { features, targets }
    }
}
