//! Multinomial Naive Bayes over bag-of-words token counts.
//!
//! Every label keeps a word-count table and a total word count; class priors
//! are document frequencies. Word probabilities use Laplace smoothing with a
//! configurable `alpha`, so unknown words and labels never produce a zero
//! probability:
//!
//! ```text
//! ln P(word | label) = ln((count(word, label) + α) / (total_words(label) + α·|V|))
//! ```
//!
//! # Examples
//!
//! ```
//! use spatha::ml::estimator::Estimator;
//! use spatha::ml::naive_bayes::NaiveBayesClassifier;
//!
//! let mut classifier = NaiveBayesClassifier::new();
//! classifier
//!     .fit(&["free money now", "see you at the park"], &[1, 0])
//!     .unwrap();
//! assert_eq!(classifier.predict(&["free money"]).unwrap(), vec![1]);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::{analyze_to_strings, default_analyzer};
use crate::error::{Result, SpathaError};
use crate::ml::estimator::{Estimator, Label};

/// Default Laplace smoothing parameter.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Configuration for [`NaiveBayesClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Laplace smoothing parameter, must be finite and > 0.
    pub alpha: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Naive Bayes text classifier with Laplace smoothing.
///
/// Labels are kept in first-seen order; when two labels score the same the
/// one seen first during `fit` wins.
#[derive(Clone, Serialize, Deserialize)]
pub struct NaiveBayesClassifier<L: Label> {
    alpha: f64,
    /// Documents per label.
    class_counts: IndexMap<L, usize>,
    /// Token occurrence counts per label.
    word_counts: IndexMap<L, HashMap<String, usize>>,
    /// Total tokens per label.
    total_words: IndexMap<L, usize>,
    vocabulary: HashSet<String>,
    class_priors: IndexMap<L, f64>,
    total_documents: usize,
    #[serde(skip, default = "default_analyzer")]
    analyzer: Arc<dyn Analyzer>,
}

impl<L: Label> std::fmt::Debug for NaiveBayesClassifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaiveBayesClassifier")
            .field("alpha", &self.alpha)
            .field("classes", &self.class_counts.keys().collect::<Vec<_>>())
            .field("vocabulary_size", &self.vocabulary.len())
            .field("total_documents", &self.total_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl<L: Label> Default for NaiveBayesClassifier<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> NaiveBayesClassifier<L> {
    /// Create an unfitted classifier with `alpha = 1.0`.
    pub fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            class_counts: IndexMap::new(),
            word_counts: IndexMap::new(),
            total_words: IndexMap::new(),
            vocabulary: HashSet::new(),
            class_priors: IndexMap::new(),
            total_documents: 0,
            analyzer: default_analyzer(),
        }
    }

    /// Create an unfitted classifier with a custom smoothing parameter.
    pub fn with_alpha(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SpathaError::invalid_input(format!(
                "alpha must be a finite number greater than 0, got {alpha}"
            )));
        }
        let mut classifier = Self::new();
        classifier.alpha = alpha;
        Ok(classifier)
    }

    /// Create an unfitted classifier from configuration.
    pub fn from_config(config: &NaiveBayesConfig) -> Result<Self> {
        Self::with_alpha(config.alpha)
    }

    /// Replace the analyzer used to tokenize documents.
    ///
    /// The analyzer is not persisted; a deserialized classifier always uses
    /// the default comment analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// All distinct tokens seen during `fit`.
    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    /// Number of distinct tokens seen during `fit`.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Labels in first-seen order.
    pub fn classes(&self) -> impl Iterator<Item = &L> {
        self.class_counts.keys()
    }

    /// Prior probability of `label`, if it was seen during `fit`.
    pub fn class_prior(&self, label: &L) -> Option<f64> {
        self.class_priors.get(label).copied()
    }

    /// Number of documents the classifier was fitted on.
    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    /// Joint log score of `text` for every known label, in label order.
    ///
    /// Tokens outside the vocabulary still contribute their smoothed
    /// probability.
    pub fn score(&self, text: &str) -> Result<Vec<(L, f64)>> {
        self.ensure_fitted()?;
        let tokens = self.tokenize(text)?;

        Ok(self
            .class_priors
            .iter()
            .map(|(label, prior)| {
                let likelihood: f64 = tokens
                    .iter()
                    .map(|token| self.smoothed_log_likelihood(token, label))
                    .sum();
                (label.clone(), prior.ln() + likelihood)
            })
            .collect())
    }

    fn reset(&mut self) {
        self.class_counts.clear();
        self.word_counts.clear();
        self.total_words.clear();
        self.vocabulary.clear();
        self.class_priors.clear();
        self.total_documents = 0;
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(SpathaError::uninitialized(
                "naive bayes classifier has not been fitted",
            ))
        }
    }

    /// Works for labels never seen in `fit` too: their count and total are 0.
    fn smoothed_log_likelihood(&self, word: &str, label: &L) -> f64 {
        let count = self
            .word_counts
            .get(label)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0);
        let total = self.total_words.get(label).copied().unwrap_or(0);
        // An empty vocabulary still reserves one slot so the denominator is never 0.
        let vocabulary_size = self.vocabulary.len().max(1) as f64;

        ((count as f64 + self.alpha) / (total as f64 + self.alpha * vocabulary_size)).ln()
    }
}

impl<L: Label> Estimator<L> for NaiveBayesClassifier<L> {
    fn fit<S: AsRef<str>>(&mut self, documents: &[S], labels: &[L]) -> Result<()> {
        if documents.is_empty() {
            return Err(SpathaError::invalid_input(
                "cannot fit naive bayes on an empty document set",
            ));
        }
        if documents.len() != labels.len() {
            return Err(SpathaError::invalid_input(format!(
                "documents and labels differ in length: {} vs {}",
                documents.len(),
                labels.len()
            )));
        }

        self.reset();

        for (document, label) in documents.iter().zip(labels) {
            let tokens = self.tokenize(document.as_ref())?;

            *self.class_counts.entry(label.clone()).or_insert(0) += 1;
            let words = self.word_counts.entry(label.clone()).or_default();
            let total = self.total_words.entry(label.clone()).or_insert(0);

            for token in tokens {
                *total += 1;
                *words.entry(token.clone()).or_insert(0) += 1;
                self.vocabulary.insert(token);
            }
        }

        self.total_documents = documents.len();
        let total_documents = self.total_documents as f64;
        self.class_priors = self
            .class_counts
            .iter()
            .map(|(label, count)| (label.clone(), *count as f64 / total_documents))
            .collect();

        Ok(())
    }

    fn predict<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<L>> {
        self.ensure_fitted()?;

        documents
            .iter()
            .map(|document| {
                let mut best: Option<(L, f64)> = None;
                for (label, score) in self.score(document.as_ref())? {
                    // strict comparison keeps the first-seen label on ties
                    if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
                        best = Some((label, score));
                    }
                }
                best.map(|(label, _)| label).ok_or_else(|| {
                    SpathaError::uninitialized("naive bayes classifier has no classes")
                })
            })
            .collect()
    }

    fn log_likelihood(&self, word: &str, label: &L) -> Result<f64> {
        self.ensure_fitted()?;
        Ok(self.smoothed_log_likelihood(word, label))
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        analyze_to_strings(self.analyzer.as_ref(), text)
    }

    fn is_fitted(&self) -> bool {
        self.total_documents > 0
    }

    fn clone_unfitted(&self) -> Self {
        Self {
            alpha: self.alpha,
            analyzer: Arc::clone(&self.analyzer),
            ..Self::new()
        }
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
