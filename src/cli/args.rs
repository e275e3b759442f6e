//! Command line argument parsing for the Spatha CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::corpus::csv::DEFAULT_TEXT_COLUMN;

/// Spatha - bagged Naive Bayes classifiers for short comments
#[derive(Parser, Debug, Clone)]
#[command(name = "spatha")]
#[command(about = "Train and apply bagged Naive Bayes comment classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpathaArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, only errors are logged (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpathaArgs {
    /// Effective verbosity: 0 when quiet, otherwise one more than the
    /// number of `-v` flags.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Default log level for the effective verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train one classifier per label column and keep the best models
    Train(TrainArgs),

    /// Score a saved classifier against a labelled corpus
    Evaluate(EvaluateArgs),

    /// Classify comments with a saved classifier
    Predict(PredictArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labelled comments (CSV with a header row)
    #[arg(short, long, value_name = "CSV_FILE")]
    pub data: PathBuf,

    /// Label column to train; repeat for several columns
    #[arg(short, long = "label", value_name = "COLUMN", required = true)]
    pub labels: Vec<String>,

    /// Directory holding saved models
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub model_dir: PathBuf,

    /// Training configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Seed for shuffling and bootstrap sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of bagged estimators
    #[arg(short = 'n', long)]
    pub estimators: Option<usize>,

    /// Column holding the comment text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    pub text_column: String,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Labelled comments (CSV with a header row)
    #[arg(short, long, value_name = "CSV_FILE")]
    pub data: PathBuf,

    /// Label column of the saved model
    #[arg(short, long, value_name = "COLUMN")]
    pub label: String,

    /// Directory holding saved models
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub model_dir: PathBuf,

    /// Training configuration file (JSON) for the split and averaging mode
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Seed for shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Column holding the comment text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    pub text_column: String,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Label column of the saved model
    #[arg(short, long, value_name = "COLUMN")]
    pub label: String,

    /// Directory holding saved models
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub model_dir: PathBuf,

    /// Comments to classify
    #[arg(value_name = "COMMENT", required = true)]
    pub comments: Vec<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
