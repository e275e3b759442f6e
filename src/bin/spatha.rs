//! Spatha CLI binary.

use anyhow::Context;
use clap::Parser;
use spatha::cli::{SpathaArgs, execute_command};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = SpathaArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let command = match &args.command {
        spatha::cli::Command::Train(_) => "train",
        spatha::cli::Command::Evaluate(_) => "evaluate",
        spatha::cli::Command::Predict(_) => "predict",
    };
    execute_command(args).with_context(|| format!("{command} failed"))
}
