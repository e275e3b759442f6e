//! Bootstrap aggregation over independently trained estimators.
//!
//! Each member of the ensemble is a fresh copy of a prototype estimator
//! fitted on its own bootstrap resample of the training corpus (indices drawn
//! uniformly with replacement). Predictions are combined by majority vote.
//!
//! Randomness is always injectable: [`BaggingEnsemble::fit_with_rng`] takes
//! any [`rand::Rng`], and [`BaggingConfig::seed`] makes [`BaggingEnsemble::fit`]
//! reproducible.
//!
//! # Examples
//!
//! ```
//! use spatha::ml::bagging::{BaggingConfig, BaggingEnsemble};
//! use spatha::ml::naive_bayes::NaiveBayesClassifier;
//!
//! let config = BaggingConfig { n_estimators: 5, max_samples: None, seed: Some(7) };
//! let mut ensemble = BaggingEnsemble::with_config(NaiveBayesClassifier::new(), config).unwrap();
//! ensemble
//!     .fit(&["you are an idiot", "thanks for sharing", "idiot troll", "great video"],
//!          &[true, false, true, false])
//!     .unwrap();
//! let labels = ensemble.predict(&["what an idiot"]).unwrap();
//! assert_eq!(labels.len(), 1);
//! ```

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SpathaError};
use crate::ml::estimator::{Estimator, Label};

/// Default number of ensemble members.
pub const DEFAULT_N_ESTIMATORS: usize = 10;

/// Configuration for [`BaggingEnsemble`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaggingConfig {
    /// Number of estimators to train.
    pub n_estimators: usize,
    /// Bootstrap sample size; `None` uses the training-set size of each `fit`.
    pub max_samples: Option<usize>,
    /// Seed for the bootstrap draws made by [`BaggingEnsemble::fit`].
    pub seed: Option<u64>,
}

impl Default for BaggingConfig {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_samples: None,
            seed: None,
        }
    }
}

impl BaggingConfig {
    /// Check that the configuration describes a usable ensemble.
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(SpathaError::invalid_input(
                "n_estimators must be at least 1",
            ));
        }
        if self.max_samples == Some(0) {
            return Err(SpathaError::invalid_input("max_samples must be at least 1"));
        }
        Ok(())
    }
}

/// Bagging ensemble of estimators combined by majority vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggingEnsemble<E, L>
where
    E: Estimator<L>,
    L: Label,
{
    /// Unfitted template every member is cloned from.
    prototype: E,
    config: BaggingConfig,
    estimators: Vec<E>,
    /// Distinct training labels in first-seen order.
    classes: Vec<L>,
}

impl<E, L> BaggingEnsemble<E, L>
where
    E: Estimator<L>,
    L: Label,
{
    /// Create an unfitted ensemble of ten members built from `prototype`.
    pub fn new(prototype: E) -> Self {
        Self {
            prototype: prototype.clone_unfitted(),
            config: BaggingConfig::default(),
            estimators: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Create an unfitted ensemble with an explicit configuration.
    pub fn with_config(prototype: E, config: BaggingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            prototype: prototype.clone_unfitted(),
            config,
            estimators: Vec::new(),
            classes: Vec::new(),
        })
    }

    /// Assemble an ensemble from members that are already fitted.
    ///
    /// `classes` is the binary label set used by
    /// [`contributing_words`](Self::contributing_words).
    pub fn from_estimators(estimators: Vec<E>, classes: Vec<L>) -> Result<Self> {
        let first = estimators.first().ok_or_else(|| {
            SpathaError::invalid_input("an ensemble needs at least one estimator")
        })?;
        if estimators.iter().any(|estimator| !estimator.is_fitted()) {
            return Err(SpathaError::uninitialized(
                "every estimator must be fitted before it joins an ensemble",
            ));
        }

        Ok(Self {
            prototype: first.clone_unfitted(),
            config: BaggingConfig {
                n_estimators: estimators.len(),
                ..BaggingConfig::default()
            },
            estimators,
            classes,
        })
    }

    /// The ensemble configuration.
    pub fn config(&self) -> &BaggingConfig {
        &self.config
    }

    /// Number of members the next `fit` will train.
    pub fn n_estimators(&self) -> usize {
        self.config.n_estimators
    }

    /// Fitted members, in training order.
    pub fn estimators(&self) -> &[E] {
        &self.estimators
    }

    /// Distinct training labels in first-seen order.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Whether the ensemble holds fitted members.
    pub fn is_fitted(&self) -> bool {
        !self.estimators.is_empty()
    }

    /// Fit the ensemble, seeding the bootstrap draws from the configured seed
    /// or the thread-local generator.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S], labels: &[L]) -> Result<()> {
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.fit_with_rng(documents, labels, &mut rng)
            }
            None => {
                let mut rng = rand::rng();
                self.fit_with_rng(documents, labels, &mut rng)
            }
        }
    }

    /// Fit the ensemble drawing bootstrap indices from `rng`.
    ///
    /// Previously fitted members are discarded. On error the ensemble is left
    /// unfitted.
    pub fn fit_with_rng<S, R>(&mut self, documents: &[S], labels: &[L], rng: &mut R) -> Result<()>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if documents.is_empty() {
            return Err(SpathaError::invalid_input(
                "cannot fit an ensemble on an empty document set",
            ));
        }
        if documents.len() != labels.len() {
            return Err(SpathaError::invalid_input(format!(
                "documents and labels differ in length: {} vs {}",
                documents.len(),
                labels.len()
            )));
        }
        self.config.validate()?;

        self.estimators.clear();
        self.classes.clear();

        let n_samples = documents.len();
        let sample_size = self.config.max_samples.unwrap_or(n_samples);
        let classes = distinct_in_order(labels);

        let mut estimators = Vec::with_capacity(self.config.n_estimators);
        for index in 0..self.config.n_estimators {
            let mut sample_documents = Vec::with_capacity(sample_size);
            let mut sample_labels = Vec::with_capacity(sample_size);
            for _ in 0..sample_size {
                let drawn = rng.random_range(0..n_samples);
                sample_documents.push(documents[drawn].as_ref());
                sample_labels.push(labels[drawn].clone());
            }

            let sampled_classes = distinct_in_order(&sample_labels).len();
            if sampled_classes < classes.len() {
                warn!(
                    estimator = index,
                    sampled_classes,
                    total_classes = classes.len(),
                    "bootstrap sample is missing a class"
                );
            }

            let mut estimator = self.prototype.clone_unfitted();
            estimator.fit(&sample_documents, &sample_labels)?;
            debug!(
                estimator = index,
                name = estimator.name(),
                sample_size,
                "fitted bagging member"
            );
            estimators.push(estimator);
        }

        self.estimators = estimators;
        self.classes = classes;
        Ok(())
    }

    /// Predict one label per document by majority vote over all members.
    pub fn predict<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<L>> {
        self.ensure_fitted()?;

        let all_predictions = self
            .estimators
            .iter()
            .map(|estimator| estimator.predict(documents))
            .collect::<Result<Vec<_>>>()?;

        if let Some(short) = all_predictions.iter().find(|p| p.len() != documents.len()) {
            return Err(SpathaError::invalid_input(format!(
                "estimator returned {} predictions for {} documents",
                short.len(),
                documents.len()
            )));
        }

        (0..documents.len())
            .map(|position| {
                let votes: Vec<L> = all_predictions
                    .iter()
                    .map(|predictions| predictions[position].clone())
                    .collect();
                majority_vote(&votes)
                    .ok_or_else(|| SpathaError::uninitialized("ensemble produced no votes"))
            })
            .collect()
    }

    /// Words of `text` that a strict majority of members consider evidence
    /// for `positive`.
    ///
    /// A member votes for a word when its log-likelihood under `positive` is
    /// greater than under the other label of the binary class set. Words are
    /// returned once each, in order of first occurrence.
    pub fn contributing_words(&self, text: &str, positive: &L) -> Result<Vec<String>> {
        self.ensure_fitted()?;
        let negative = self.complement_of(positive)?;

        let tokens = self.estimators[0].tokenize(text)?;
        let mut seen = HashSet::new();
        let mut contributing = Vec::new();

        for token in tokens {
            if !seen.insert(token.clone()) {
                continue;
            }

            let mut votes = 0usize;
            for estimator in &self.estimators {
                let for_positive = estimator.log_likelihood(&token, positive)?;
                let for_negative = estimator.log_likelihood(&token, negative)?;
                if for_positive > for_negative {
                    votes += 1;
                }
            }

            if 2 * votes > self.estimators.len() {
                contributing.push(token);
            }
        }

        Ok(contributing)
    }

    fn complement_of(&self, positive: &L) -> Result<&L> {
        if self.classes.len() != 2 {
            return Err(SpathaError::invalid_input(format!(
                "contributing words need exactly two classes, ensemble has {}",
                self.classes.len()
            )));
        }
        if !self.classes.contains(positive) {
            return Err(SpathaError::invalid_input(format!(
                "positive class {positive:?} is not one of {:?}",
                self.classes
            )));
        }
        self.classes
            .iter()
            .find(|label| *label != positive)
            .ok_or_else(|| SpathaError::invalid_input("class set has no complement"))
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(SpathaError::uninitialized(
                "bagging ensemble has not been fitted",
            ))
        }
    }
}

/// The label with the most votes.
///
/// Ties go to the label that appears first in `votes` among those with the
/// maximal count. Returns `None` for an empty slice.
pub fn majority_vote<L: Label>(votes: &[L]) -> Option<L> {
    let mut counts: HashMap<&L, usize> = HashMap::new();
    for vote in votes {
        *counts.entry(vote).or_insert(0) += 1;
    }
    let max_votes = counts.values().copied().max()?;
    votes
        .iter()
        .find(|vote| counts.get(vote).copied() == Some(max_votes))
        .cloned()
}

fn distinct_in_order<L: Label>(labels: &[L]) -> Vec<L> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .filter(|label| seen.insert(*label))
        .cloned()
        .collect()
}
