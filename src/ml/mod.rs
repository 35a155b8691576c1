// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All model math lives here and in the data batcher; the
// application layer only calls run_training / Inferencer.
//
//   model.rs      - feed-forward regressor
//                   Linear → ReLU → Linear → ReLU → Linear
//                   plus its MSE forward_loss
//
//   trainer.rs    - the training loop
//                   forward, MSE loss, backward, Adam step,
//                   per-epoch validation, final weight save
//
//   inferencer.rs - the inference engine
//                   rebuilds the model at a given input size,
//                   loads weights, predicts prices
//
// The backend is chosen at compile time. ndarray (CPU) is the
// default; build with `--features wgpu` to run on the GPU.

/// Feed-forward price regressor
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Inference engine: loads weights and predicts prices
pub mod inferencer;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;
