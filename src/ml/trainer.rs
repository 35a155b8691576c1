// ============================================================
// Layer 5: Training Loop
// ============================================================
// Mini-batch train + validation loop using Burn's DataLoader,
// Adam and MSE loss.
//
//   - Training uses TrainBackend (Autodiff<…>) for gradients
//   - model.valid() returns the model on the inner backend,
//     so validation builds no autodiff graph
//   - The validation batcher must use that inner backend too
//
// Validation loss is accumulated per sample (batch MSE × batch
// size) so a short final batch does not skew the epoch mean.

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::DiamondBatcher, dataset::DiamondDataset};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{DiamondPricePredictor, DiamondPricePredictorConfig};
use crate::ml::{InferBackend, TrainBackend};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub epochs:           usize,
    pub final_train_loss: f64,
    pub final_valid_loss: f64,
    pub best_valid_loss:  f64,
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: DiamondDataset,
    valid_dataset: DiamondDataset,
    ckpt_manager:  &CheckpointManager,
    logger:        &MetricsLogger,
) -> Result<TrainSummary> {
    ensure!(train_dataset.sample_count() > 0, "Cannot train on an empty dataset");
    ensure!(cfg.batch_size > 0, "Batch size must be positive");

    let device = <TrainBackend as Backend>::Device::default();
    tracing::info!("Using device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let input_dim = train_dataset.feature_count();
    let model_cfg = DiamondPricePredictorConfig::new(input_dim)
        .with_hidden_dim(cfg.hidden_dim)
        .with_hidden_dim2(cfg.hidden_dim2);
    let mut model: DiamondPricePredictor<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} → {} → {} → 1",
        input_dim, cfg.hidden_dim, cfg.hidden_dim2
    );

    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(DiamondBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let valid_loader = DataLoaderBuilder::new(DiamondBatcher::<InferBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(valid_dataset);

    let mut summary = TrainSummary {
        epochs:           0,
        final_train_loss: f64::NAN,
        final_valid_loss: f64::NAN,
        best_valid_loss:  f64::INFINITY,
    };

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.features, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let mse         = MseLoss::new();

        let mut sq_err_sum    = 0.0f64;
        let mut valid_samples = 0usize;

        for batch in valid_loader.iter() {
            let n      = batch.targets.dims()[0];
            let output = model_valid.forward(batch.features);
            let batch_mse: f64 = mse
                .forward(output, batch.targets, Reduction::Mean)
                .into_scalar()
                .elem::<f64>();

            sq_err_sum    += batch_mse * n as f64;
            valid_samples += n;
        }

        let valid_loss = if valid_samples > 0 {
            sq_err_sum / valid_samples as f64
        } else { f64::NAN };

        let metrics = EpochMetrics::new(epoch, avg_train_loss, valid_loss);
        println!(
            "Epoch {:>3}/{} | train_loss={:.2} | valid_loss={:.2} | valid_rmse={:.2}",
            epoch, cfg.epochs, metrics.train_loss, metrics.valid_loss, metrics.valid_rmse,
        );
        logger.log(&metrics)?;

        if metrics.is_improvement(summary.best_valid_loss) {
            summary.best_valid_loss = metrics.valid_loss;
        }
        summary.epochs           = epoch;
        summary.final_train_loss = avg_train_loss;
        summary.final_valid_loss = valid_loss;
    }

    let path = ckpt_manager.save_model(&model)?;
    tracing::info!("Training complete, weights saved to '{}'", path.display());
    Ok(summary)
}
