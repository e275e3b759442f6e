//! End-to-end training of comment classifiers.
//!
//! A labelled [`Corpus`] is shuffled and split into training, test and
//! evaluation partitions (70/15/15 by default). A bagged Naive Bayes ensemble
//! is fitted on the training partition and scored on the other two.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::error::{Result, SpathaError};
use crate::ml::bagging::{BaggingConfig, BaggingEnsemble};
use crate::ml::estimator::Label;
use crate::ml::metrics::{Average, MetricsReport};
use crate::ml::naive_bayes::{NaiveBayesClassifier, NaiveBayesConfig};

/// Bagged Naive Bayes, the model produced by [`Trainer`].
pub type CommentModel<L> = BaggingEnsemble<NaiveBayesClassifier<L>, L>;

/// Partition ratios; the evaluation set receives the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_ratio: f64,
    pub test_ratio: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.70,
            test_ratio: 0.15,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        let in_range = |ratio: f64| ratio.is_finite() && ratio > 0.0 && ratio <= 1.0;
        if !in_range(self.train_ratio) || !(self.test_ratio.is_finite() && self.test_ratio >= 0.0) {
            return Err(SpathaError::invalid_input(format!(
                "split ratios out of range: train={}, test={}",
                self.train_ratio, self.test_ratio
            )));
        }
        if self.train_ratio + self.test_ratio > 1.0 + f64::EPSILON {
            return Err(SpathaError::invalid_input(format!(
                "train and test ratios exceed 1: {} + {}",
                self.train_ratio, self.test_ratio
            )));
        }
        Ok(())
    }
}

/// The three partitions of a shuffled corpus.
#[derive(Debug, Clone)]
pub struct CorpusSplit<L> {
    pub train: Corpus<L>,
    pub test: Corpus<L>,
    pub eval: Corpus<L>,
}

/// Shuffle `corpus` and cut it into training, test and evaluation parts.
pub fn split_corpus<L, R>(corpus: &Corpus<L>, split: &SplitConfig, rng: &mut R) -> Result<CorpusSplit<L>>
where
    L: Label,
    R: Rng + ?Sized,
{
    split.validate()?;
    if corpus.is_empty() {
        return Err(SpathaError::invalid_input("cannot split an empty corpus"));
    }

    let n = corpus.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let train_end = (split.train_ratio * n as f64) as usize;
    let test_end = (((split.train_ratio + split.test_ratio) * n as f64) as usize).min(n);
    if train_end == 0 {
        return Err(SpathaError::invalid_input(format!(
            "a corpus of {n} documents leaves no training data"
        )));
    }

    Ok(CorpusSplit {
        train: corpus.select(&indices[..train_end]),
        test: corpus.select(&indices[train_end..test_end]),
        eval: corpus.select(&indices[test_end..]),
    })
}

/// Everything needed to train and score one classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub naive_bayes: NaiveBayesConfig,
    pub bagging: BaggingConfig,
    pub split: SplitConfig,
    pub average: Average,
    /// Seed for the corpus shuffle, and for the bootstrap when
    /// `bagging.seed` is unset.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        NaiveBayesClassifier::<bool>::from_config(&self.naive_bayes)?;
        self.bagging.validate()?;
        self.split.validate()
    }
}

/// Scores of a model on the test and evaluation partitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub test: MetricsReport,
    pub eval: MetricsReport,
}

/// A freshly trained model with its scores.
#[derive(Debug, Clone)]
pub struct TrainingOutcome<L: Label> {
    pub model: CommentModel<L>,
    pub evaluation: Evaluation,
    /// Documents in the training partition.
    pub train_size: usize,
}

/// Trains and evaluates bagged Naive Bayes comment classifiers.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Split `corpus`, fit a new ensemble on the training part and score it.
    ///
    /// `positive` is the positive class for binary averaging.
    pub fn train<L: Label>(&self, corpus: &Corpus<L>, positive: &L) -> Result<TrainingOutcome<L>> {
        let mut rng = self.rng();
        let split = split_corpus(corpus, &self.config.split, &mut rng)?;
        info!(
            train = split.train.len(),
            test = split.test.len(),
            eval = split.eval.len(),
            "split corpus"
        );

        let prototype = NaiveBayesClassifier::from_config(&self.config.naive_bayes)?;
        let mut model = BaggingEnsemble::with_config(prototype, self.config.bagging.clone())?;
        if self.config.bagging.seed.is_some() {
            model.fit(split.train.texts(), split.train.labels())?;
        } else {
            model.fit_with_rng(split.train.texts(), split.train.labels(), &mut rng)?;
        }
        debug!(n_estimators = model.n_estimators(), "fitted ensemble");

        let evaluation = self.score(&model, &split, positive)?;
        info!(
            test_f1 = evaluation.test.f1,
            eval_f1 = evaluation.eval.f1,
            "trained model"
        );

        Ok(TrainingOutcome {
            model,
            evaluation,
            train_size: split.train.len(),
        })
    }

    /// Re-split `corpus` and score an existing model on its test and
    /// evaluation parts.
    pub fn evaluate<L: Label>(
        &self,
        model: &CommentModel<L>,
        corpus: &Corpus<L>,
        positive: &L,
    ) -> Result<Evaluation> {
        let mut rng = self.rng();
        let split = split_corpus(corpus, &self.config.split, &mut rng)?;
        self.score(model, &split, positive)
    }

    fn score<L: Label>(
        &self,
        model: &CommentModel<L>,
        split: &CorpusSplit<L>,
        positive: &L,
    ) -> Result<Evaluation> {
        let report = |part: &Corpus<L>| -> Result<MetricsReport> {
            let predicted = model.predict(part.texts())?;
            MetricsReport::evaluate(part.labels(), &predicted, positive, self.config.average)
        };
        Ok(Evaluation {
            test: report(&split.test)?,
            eval: report(&split.eval)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Corpus<bool> {
        Corpus::from_pairs((0..n).map(|i| (format!("doc {i}"), i % 2 == 0)))
    }

    fn toxic_corpus() -> Corpus<bool> {
        let toxic = ["you idiot", "stupid troll", "idiot video", "shut up idiot", "stupid stupid"];
        let clean = ["great video", "thanks for sharing", "love this song", "nice work", "great song"];
        let mut pairs = Vec::new();
        for _ in 0..4 {
            pairs.extend(toxic.iter().map(|text| (text.to_string(), true)));
            pairs.extend(clean.iter().map(|text| (text.to_string(), false)));
        }
        Corpus::from_pairs(pairs)
    }

    #[test]
    fn test_split_sizes() {
        let corpus = numbered(20);
        let split = split_corpus(&corpus, &SplitConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(split.train.len(), 14);
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.eval.len(), 3);

        let mut all: Vec<String> = split
            .train
            .texts()
            .iter()
            .chain(split.test.texts())
            .chain(split.eval.texts())
            .cloned()
            .collect();
        all.sort();
        let mut expected = corpus.texts().to_vec();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_split_keeps_pairs_together() {
        let corpus = numbered(30);
        let split = split_corpus(&corpus, &SplitConfig::default(), &mut StdRng::seed_from_u64(9)).unwrap();
        for (text, label) in split.train.iter().chain(split.test.iter()) {
            let i: usize = text.trim_start_matches("doc ").parse().unwrap();
            assert_eq!(*label, i % 2 == 0);
        }
    }

    #[test]
    fn test_split_is_seeded() {
        let corpus = numbered(40);
        let a = split_corpus(&corpus, &SplitConfig::default(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = split_corpus(&corpus, &SplitConfig::default(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.train.texts(), b.train.texts());
        assert_eq!(a.eval.texts(), b.eval.texts());
    }

    #[test]
    fn test_split_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: Corpus<bool> = Corpus::from_pairs(Vec::<(String, bool)>::new());
        assert!(split_corpus(&empty, &SplitConfig::default(), &mut rng).is_err());
        assert!(split_corpus(&numbered(1), &SplitConfig::default(), &mut rng).is_err());

        let bad = SplitConfig {
            train_ratio: 0.9,
            test_ratio: 0.2,
        };
        assert!(split_corpus(&numbered(10), &bad, &mut rng).is_err());
        let bad = SplitConfig {
            train_ratio: 0.0,
            test_ratio: 0.5,
        };
        assert!(split_corpus(&numbered(10), &bad, &mut rng).is_err());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");
        std::fs::write(&path, r#"{"bagging": {"n_estimators": 3}, "seed": 11}"#).unwrap();

        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.bagging.n_estimators, 3);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.split, SplitConfig::default());
        assert_eq!(config.average, Average::Weighted);
        assert_eq!(config.naive_bayes.alpha, 1.0);

        std::fs::write(&path, r#"{"naive_bayes": {"alpha": -1.0}}"#).unwrap();
        assert!(TrainingConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn test_train_and_evaluate() {
        let config = TrainingConfig {
            seed: Some(42),
            bagging: BaggingConfig {
                n_estimators: 5,
                ..BaggingConfig::default()
            },
            ..TrainingConfig::default()
        };
        let trainer = Trainer::new(config).unwrap();
        let corpus = toxic_corpus();

        let outcome = trainer.train(&corpus, &true).unwrap();
        assert_eq!(outcome.train_size, 28);
        assert!(outcome.model.is_fitted());
        assert_eq!(outcome.model.n_estimators(), 5);
        for (_, score) in outcome.evaluation.test.entries() {
            assert!((0.0..=1.0).contains(&score));
        }

        let again = trainer.train(&corpus, &true).unwrap();
        assert_eq!(again.evaluation, outcome.evaluation);

        let evaluation = trainer.evaluate(&outcome.model, &corpus, &true).unwrap();
        assert_eq!(evaluation, outcome.evaluation);
    }

    #[test]
    fn test_evaluate_requires_fitted_model() {
        let trainer = Trainer::default();
        let model: CommentModel<bool> = BaggingEnsemble::new(NaiveBayesClassifier::new());
        assert!(trainer.evaluate(&model, &toxic_corpus(), &true).is_err());
    }
}
