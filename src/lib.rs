//! # Spatha
//!
//! Bagged Naive Bayes classifiers for labelling short user comments
//! (toxic, abusive, provocative, ...).
//!
//! ## Features
//!
//! - Composable text analysis (whitespace tokenizer, lowercase and strip filters)
//! - Multinomial Naive Bayes with Laplace smoothing over any label type
//! - Bootstrap aggregation with majority voting and contributing-word explanations
//! - Accuracy, precision, recall and F1 with binary or weighted averaging
//! - Seeded train/test/eval splits and best-model persistence

pub mod analysis;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod ml;
pub mod storage;

pub mod prelude {
    pub use crate::corpus::Corpus;
    pub use crate::error::{Result, SpathaError};
    pub use crate::ml::bagging::{BaggingConfig, BaggingEnsemble};
    pub use crate::ml::estimator::{Estimator, Label};
    pub use crate::ml::metrics::{Average, MetricsReport};
    pub use crate::ml::naive_bayes::NaiveBayesClassifier;
    pub use crate::ml::training::{CommentModel, Trainer, TrainingConfig};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
