//! AgriVerse - Main Entry Point
//!
//! Crop recommendation from the command line.

use agriverse::cli::{cmd_crops, cmd_evaluate, cmd_predict, cmd_synthesize, cmd_train, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agriverse=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { model, force } => {
            cmd_train(&model, force)?;
        }
        Commands::Predict { model, sample, top } => {
            cmd_predict(&model, &sample, top)?;
        }
        Commands::Evaluate { model } => {
            cmd_evaluate(&model)?;
        }
        Commands::Synthesize { output, seed, per_crop } => {
            cmd_synthesize(&output, seed, per_crop)?;
        }
        Commands::Crops { name } => {
            cmd_crops(name.as_deref())?;
        }
    }

    Ok(())
}
