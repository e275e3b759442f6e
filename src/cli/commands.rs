//! Command implementations for the Spatha CLI.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::csv::CsvCorpusReader;
use crate::error::{Result, SpathaError};
use crate::ml::training::{CommentModel, Trainer, TrainingConfig};
use crate::storage::file::FileModelStore;
use crate::storage::{ModelSnapshot, ModelStore, auto_save_best_model};

/// The positive class of every binary label column.
const POSITIVE: bool = true;

/// Execute a CLI command.
pub fn execute_command(args: SpathaArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
    }
}

/// Load the training configuration, applying command line overrides.
fn load_config(
    path: Option<&Path>,
    seed: Option<u64>,
    estimators: Option<usize>,
) -> Result<TrainingConfig> {
    let mut config = match path {
        Some(path) => TrainingConfig::from_json_file(path)?,
        None => TrainingConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(n_estimators) = estimators {
        config.bagging.n_estimators = n_estimators;
    }
    Ok(config)
}

fn load_model(store: &FileModelStore, label: &str) -> Result<ModelSnapshot<CommentModel<bool>>> {
    store.load(label)?.ok_or_else(|| {
        SpathaError::invalid_input(format!(
            "no saved model for '{label}' at {}",
            store.model_path(label).display()
        ))
    })
}

/// Train one model per label column.
fn train(args: &TrainArgs, cli_args: &SpathaArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(args.config.as_deref(), args.seed, args.estimators)?;
    let trainer = Trainer::new(config)?;
    let reader = CsvCorpusReader::new().with_text_column(&args.text_column);
    let store = FileModelStore::new(&args.model_dir);

    let mut seen = HashSet::new();
    let labels: Vec<&String> = args
        .labels
        .iter()
        .filter(|label| seen.insert(label.as_str()))
        .collect();

    let results = labels
        .par_iter()
        .map(|label| train_label(&trainer, &reader, &store, &args.data, label))
        .collect::<Result<Vec<_>>>()?;

    output_result(
        "Training finished",
        &TrainingReport {
            results,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn train_label(
    trainer: &Trainer,
    reader: &CsvCorpusReader,
    store: &FileModelStore,
    data: &Path,
    label: &str,
) -> Result<LabelTrainingResult> {
    let corpus = reader.read_path(data, label)?;
    info!(label, documents = corpus.len(), "training");
    let outcome = trainer.train(&corpus, &POSITIVE)?;

    let snapshot = ModelSnapshot::new(outcome.model, outcome.evaluation.test, label);
    let choice = auto_save_best_model(store, label, &snapshot)?;

    Ok(LabelTrainingResult {
        label: label.to_string(),
        documents: corpus.len(),
        train_size: outcome.train_size,
        test_metrics: outcome.evaluation.test,
        eval_metrics: outcome.evaluation.eval,
        choice,
        model_path: store.model_path(label).display().to_string(),
    })
}

/// Re-score a saved model.
fn evaluate(args: &EvaluateArgs, cli_args: &SpathaArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.seed, None)?;
    let trainer = Trainer::new(config)?;
    let store = FileModelStore::new(&args.model_dir);
    let snapshot = load_model(&store, &args.label)?;

    let corpus = CsvCorpusReader::new()
        .with_text_column(&args.text_column)
        .read_path(&args.data, &args.label)?;
    let evaluation = trainer.evaluate(&snapshot.model, &corpus, &POSITIVE)?;

    output_result(
        "Evaluation finished",
        &EvaluationReport {
            label: args.label.clone(),
            trained_at: snapshot.trained_at,
            saved_metrics: snapshot.metrics,
            test_metrics: evaluation.test,
            eval_metrics: evaluation.eval,
        },
        cli_args,
    )
}

/// Classify comments and explain positive predictions.
fn predict(args: &PredictArgs, cli_args: &SpathaArgs) -> Result<()> {
    if let Some(position) = args.comments.iter().position(|c| c.trim().is_empty()) {
        return Err(SpathaError::invalid_input(format!(
            "comment {} is empty",
            position + 1
        )));
    }

    let store = FileModelStore::new(&args.model_dir);
    let model = load_model(&store, &args.label)?.model;
    let predicted = model.predict(args.comments.as_slice())?;

    let predictions = args
        .comments
        .iter()
        .zip(predicted)
        .map(|(comment, predicted)| -> Result<CommentPrediction> {
            let contributing_words = if predicted == POSITIVE {
                model.contributing_words(comment, &POSITIVE)?
            } else {
                Vec::new()
            };
            Ok(CommentPrediction {
                comment: comment.clone(),
                predicted,
                contributing_words,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    output_result(
        "Prediction finished",
        &PredictionReport {
            label: args.label.clone(),
            predictions,
        },
        cli_args,
    )
}
