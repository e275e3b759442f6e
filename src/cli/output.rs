//! Output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SpathaArgs};
use crate::error::Result;
use crate::ml::metrics::MetricsReport;
use crate::ml::selection::ModelChoice;

/// Results that can be printed for people as well as serialized.
pub trait HumanOutput {
    /// Lines printed in human format.
    fn human_lines(&self) -> Vec<String>;
}

/// Training result for one label column.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelTrainingResult {
    pub label: String,
    pub documents: usize,
    pub train_size: usize,
    pub test_metrics: MetricsReport,
    pub eval_metrics: MetricsReport,
    pub choice: ModelChoice,
    pub model_path: String,
}

/// Result structure for the train command.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingReport {
    pub results: Vec<LabelTrainingResult>,
    pub duration_ms: u64,
}

/// Result structure for the evaluate command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub label: String,
    pub trained_at: DateTime<Utc>,
    pub saved_metrics: MetricsReport,
    pub test_metrics: MetricsReport,
    pub eval_metrics: MetricsReport,
}

/// Prediction for a single comment.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentPrediction {
    pub comment: String,
    pub predicted: bool,
    pub contributing_words: Vec<String>,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionReport {
    pub label: String,
    pub predictions: Vec<CommentPrediction>,
}

fn metric_lines(title: &str, metrics: &MetricsReport) -> Vec<String> {
    let mut lines = vec![format!("  {title}:")];
    lines.extend(
        metrics
            .entries()
            .iter()
            .map(|(name, score)| format!("    {name:<10} {score:.4}")),
    );
    lines
}

impl HumanOutput for TrainingReport {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for result in &self.results {
            lines.push(format!(
                "{} ({} documents, {} for training)",
                result.label, result.documents, result.train_size
            ));
            lines.extend(metric_lines("Test", &result.test_metrics));
            lines.extend(metric_lines("Eval", &result.eval_metrics));
            let decision = match result.choice {
                ModelChoice::Candidate => format!("saved to {}", result.model_path),
                ModelChoice::Saved => format!("kept existing {}", result.model_path),
            };
            lines.push(format!("  Model: {decision}"));
        }
        lines.push(format!("Finished in {} ms", self.duration_ms));
        lines
    }
}

impl HumanOutput for EvaluationReport {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} (trained {})",
            self.label,
            self.trained_at.format("%Y-%m-%d %H:%M:%S UTC")
        )];
        lines.extend(metric_lines("Saved", &self.saved_metrics));
        lines.extend(metric_lines("Test", &self.test_metrics));
        lines.extend(metric_lines("Eval", &self.eval_metrics));
        lines
    }
}

impl HumanOutput for PredictionReport {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for prediction in &self.predictions {
            lines.push(format!(
                "[{}={}] {}",
                self.label, prediction.predicted, prediction.comment
            ));
            if !prediction.contributing_words.is_empty() {
                lines.push(format!(
                    "  contributing words: {}",
                    prediction.contributing_words.join(", ")
                ));
            }
        }
        lines
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &SpathaArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: HumanOutput>(message: &str, result: &T, args: &SpathaArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    for line in result.human_lines() {
        println!("{line}");
    }
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &SpathaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
