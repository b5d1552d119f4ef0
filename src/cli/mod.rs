// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case. Never computes anything itself.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, ServeArgs, TrainArgs};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "movie-recommender",
    version,
    about = "Train an embedding recommender on movie ratings, then serve predictions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Serve(args)    => run_serve(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    // Config is validated here, before any data is touched
    let use_case = TrainUseCase::from_config_file(&args.config)?;
    tracing::info!("Starting training with config '{}'", args.config);

    let report = use_case.execute()?;
    println!(
        "Training complete: {} epochs, best epoch {} (val_rmse={:.4}){}. Artifact saved to '{}'.",
        report.epochs_run,
        report.best_epoch,
        report.best_val_rmse,
        if report.stopped_early { ", stopped early" } else { "" },
        use_case.config().training.artifact_dir,
    );
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::api::{serve, AppContext};
    use crate::application::predict_use_case::PredictUseCase;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    // Everything is loaded before the listener accepts traffic
    let predictions = PredictUseCase::from_files(&args.artifact_dir, &args.catalog)?;
    let ctx         = AppContext::new(predictions);

    let runtime = tokio::runtime::Runtime::new().context("Cannot start tokio runtime")?;
    runtime.block_on(serve(ctx, addr))
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::from_files(&args.artifact_dir, &args.catalog)?;
    let rating   = use_case.predict(&args.user_id, &args.movie_title)?;
    println!("\nPredicted rating: {:.3}", rating);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(&args.artifact_dir).execute(&args.ratings)?;
    println!(
        "Scored {} of {} rows ({} skipped): mse={:.4} rmse={:.4}",
        report.scored, report.rows, report.skipped, report.mse, report.rmse
    );
    Ok(())
}
