// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the three subcommands, `train`, `evaluate` and
// `deploy`, and all their configurable flags. Every flag has
// a default, so each command runs bare from the project root.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::{
    deploy_use_case::{DeployConfig, DEFAULT_REPO_ID},
    evaluate_use_case::EvaluateConfig,
    train_use_case::TrainConfig,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the price model on the diamonds CSV
    Train(TrainArgs),

    /// Score a trained model on the held-out test split
    Evaluate(EvaluateArgs),

    /// Upload the model folder to the model hub (needs HF_API_KEY)
    Deploy(DeployArgs),
}

// ─── train ────────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with the diamonds table
    #[arg(long, default_value = "data/diamonds.csv")]
    pub data: PathBuf,

    /// Directory for the weights and train_config.json
    #[arg(long, default_value = "models")]
    pub model_dir: PathBuf,

    /// Directory for training_log.csv
    #[arg(long, default_value = "metrics")]
    pub metrics_dir: PathBuf,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Width of the first hidden layer
    #[arg(long, default_value_t = 64)]
    pub hidden_dim: usize,

    /// Width of the second hidden layer
    #[arg(long, default_value_t = 32)]
    pub hidden_dim2: usize,

    /// Share of rows held out for validation, in [0, 1)
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the split shuffle; evaluate must use the same one
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:     a.data,
            model_dir:     a.model_dir,
            metrics_dir:   a.metrics_dir,
            epochs:        a.epochs,
            batch_size:    a.batch_size,
            lr:            a.lr,
            hidden_dim:    a.hidden_dim,
            hidden_dim2:   a.hidden_dim2,
            test_fraction: a.test_fraction,
            seed:          a.seed,
        }
    }
}

// ─── evaluate ─────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// CSV file with the diamonds table (the one used for training)
    #[arg(long, default_value = "data/diamonds.csv")]
    pub data: PathBuf,

    /// Weight file written by `train`
    #[arg(long, default_value = "models/diamond_price_predictor.mpk")]
    pub weights: PathBuf,

    /// Directory for metrics.json
    #[arg(long, default_value = "metrics")]
    pub metrics_dir: PathBuf,

    /// Override the test fraction recorded at training time
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Override the split seed recorded at training time
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            data_path:     a.data,
            weights_path:  a.weights,
            metrics_dir:   a.metrics_dir,
            test_fraction: a.test_fraction,
            seed:          a.seed,
        }
    }
}

// ─── deploy ───────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Destination repository, `namespace/name`
    #[arg(long, default_value = DEFAULT_REPO_ID)]
    pub repo_id: String,

    /// Local folder to upload
    #[arg(long, default_value = "models")]
    pub folder: PathBuf,

    /// Commit message on the hub
    #[arg(long, default_value = "Upload diamond price model")]
    pub message: String,
}

impl From<DeployArgs> for DeployConfig {
    fn from(a: DeployArgs) -> Self {
        DeployConfig {
            repo_id:        a.repo_id,
            folder:         a.folder,
            commit_message: a.message,
        }
    }
}
