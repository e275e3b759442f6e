//! Labelled text corpora.
//!
//! A [`Corpus`] is an ordered sequence of `(text, label)` pairs. Order does
//! not matter for training; it is preserved so splits are reproducible under
//! a fixed seed.

pub mod csv;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpathaError};
use crate::ml::estimator::Label;

/// Texts and labels of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus<L> {
    texts: Vec<String>,
    labels: Vec<L>,
}

impl<L: Label> Corpus<L> {
    /// Create a corpus from parallel text and label sequences.
    pub fn new(texts: Vec<String>, labels: Vec<L>) -> Result<Self> {
        if texts.len() != labels.len() {
            return Err(SpathaError::invalid_input(format!(
                "texts and labels differ in length: {} vs {}",
                texts.len(),
                labels.len()
            )));
        }
        Ok(Self { texts, labels })
    }

    /// Create a corpus from `(text, label)` pairs.
    pub fn from_pairs<S, I>(pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, L)>,
    {
        let (texts, labels) = pairs
            .into_iter()
            .map(|(text, label)| (text.into(), label))
            .unzip();
        Self { texts, labels }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Iterate over `(text, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &L)> {
        self.texts.iter().map(String::as_str).zip(self.labels.iter())
    }

    /// Distinct labels in first-seen order.
    pub fn distinct_labels(&self) -> Vec<L> {
        let mut seen = HashSet::new();
        self.labels
            .iter()
            .filter(|label| seen.insert(*label))
            .cloned()
            .collect()
    }

    /// Build a new corpus from the documents at `indices`.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            texts: indices.iter().map(|&i| self.texts[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}
