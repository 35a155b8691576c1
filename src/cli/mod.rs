// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. Nothing is computed here.
//
//   1. `train`    - fit the model, write models/ and the epoch log
//   2. `evaluate` - score models/ on the test split, write metrics.json
//   3. `deploy`   - push models/ to the model hub

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DeployArgs, EvaluateArgs, TrainArgs};

use crate::application::{
    deploy_use_case::DeployUseCase,
    evaluate_use_case::EvaluateUseCase,
    train_use_case::TrainUseCase,
};
use crate::infra::hub_client::HubClient;

#[derive(Parser, Debug)]
#[command(
    name = "diamond-price",
    version,
    about = "Train, evaluate and publish a diamond price regression model."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Deploy(args)   => run_deploy(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    TrainUseCase::new(args.into()).execute()?;
    println!("Training complete. Model saved.");
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let outcome = EvaluateUseCase::new(args.into()).execute()?;
    tracing::info!(
        "Scored {} test samples (R2 {:.4}), metrics in '{}'",
        outcome.test_samples, outcome.report.r2, outcome.metrics_path.display()
    );
    Ok(())
}

fn run_deploy(args: DeployArgs) -> Result<()> {
    // Resolve the token first: no token, no network traffic
    let hub = HubClient::from_env()?;
    tracing::info!("Using model hub at {}", hub.endpoint());
    let outcome = DeployUseCase::new(args.into(), hub).execute()?;
    tracing::info!(
        "Deployed {} files to {} as '{}'",
        outcome.files, outcome.repo_url, outcome.account
    );
    Ok(())
}
