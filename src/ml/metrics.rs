//! Classification metrics: accuracy, precision, recall and F1.
//!
//! Precision, recall and F1 come in two averaging modes:
//!
//! - [`Average::Binary`] scores only the given positive label.
//! - [`Average::Weighted`] scores every label present in `y_true` as if it
//!   were positive and averages the results weighted by support.
//!
//! A zero denominator yields `0.0`, not an error. Empty or mismatched inputs
//! are rejected.
//!
//! # Examples
//!
//! ```
//! use spatha::ml::metrics::{accuracy, precision, recall, f1_score, Average};
//!
//! let y_true = [1, 1, 0, 0, 1];
//! let y_pred = [1, 0, 0, 0, 1];
//!
//! assert_eq!(accuracy(&y_true, &y_pred).unwrap(), 0.8);
//! assert_eq!(precision(&y_true, &y_pred, &1, Average::Binary).unwrap(), 1.0);
//! assert!((recall(&y_true, &y_pred, &1, Average::Binary).unwrap() - 2.0 / 3.0).abs() < 1e-12);
//! assert!((f1_score(&y_true, &y_pred, &1, Average::Binary).unwrap() - 0.8).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpathaError};
use crate::ml::estimator::Label;

/// Averaging mode for precision, recall and F1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// Score the positive label only.
    Binary,
    /// Support-weighted mean over every label in `y_true`.
    #[default]
    Weighted,
}

impl FromStr for Average {
    type Err = SpathaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary" => Ok(Average::Binary),
            "weighted" => Ok(Average::Weighted),
            other => Err(SpathaError::unsupported_mode(format!(
                "averaging mode '{other}' is not supported, use 'binary' or 'weighted'"
            ))),
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Binary => write!(f, "binary"),
            Average::Weighted => write!(f, "weighted"),
        }
    }
}

/// Confusion counts for one label treated as positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Confusion {
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
}

impl Confusion {
    fn count<L: Label>(y_true: &[L], y_pred: &[L], positive: &L) -> Self {
        let mut confusion = Confusion::default();
        for (truth, predicted) in y_true.iter().zip(y_pred) {
            match (truth == positive, predicted == positive) {
                (true, true) => confusion.true_positives += 1,
                (false, true) => confusion.false_positives += 1,
                (true, false) => confusion.false_negatives += 1,
                (false, false) => {}
            }
        }
        confusion
    }

    fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn validate<L>(y_true: &[L], y_pred: &[L]) -> Result<()> {
    if y_true.is_empty() {
        return Err(SpathaError::invalid_input(
            "metrics need at least one label",
        ));
    }
    if y_true.len() != y_pred.len() {
        return Err(SpathaError::invalid_input(format!(
            "y_true and y_pred differ in length: {} vs {}",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Apply a per-label metric according to the averaging mode.
fn averaged<L, F>(y_true: &[L], y_pred: &[L], positive: &L, average: Average, metric: F) -> Result<f64>
where
    L: Label,
    F: Fn(&Confusion) -> f64,
{
    validate(y_true, y_pred)?;

    match average {
        Average::Binary => Ok(metric(&Confusion::count(y_true, y_pred, positive))),
        Average::Weighted => {
            let mut support: IndexMap<&L, usize> = IndexMap::new();
            for label in y_true {
                *support.entry(label).or_insert(0) += 1;
            }
            let total = y_true.len() as f64;
            Ok(support
                .iter()
                .map(|(label, count)| {
                    metric(&Confusion::count(y_true, y_pred, *label)) * *count as f64 / total
                })
                .sum())
        }
    }
}

/// Fraction of positions where `y_true` and `y_pred` agree.
pub fn accuracy<L: Label>(y_true: &[L], y_pred: &[L]) -> Result<f64> {
    validate(y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(truth, predicted)| truth == predicted)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Precision: TP / (TP + FP).
///
/// `positive` is only consulted in [`Average::Binary`] mode.
pub fn precision<L: Label>(y_true: &[L], y_pred: &[L], positive: &L, average: Average) -> Result<f64> {
    averaged(y_true, y_pred, positive, average, Confusion::precision)
}

/// Recall: TP / (TP + FN).
///
/// `positive` is only consulted in [`Average::Binary`] mode.
pub fn recall<L: Label>(y_true: &[L], y_pred: &[L], positive: &L, average: Average) -> Result<f64> {
    averaged(y_true, y_pred, positive, average, Confusion::recall)
}

/// Harmonic mean of precision and recall, 0 when both are 0.
///
/// In weighted mode the F1 of each label is averaged, not the harmonic mean
/// of the averaged precision and recall.
pub fn f1_score<L: Label>(y_true: &[L], y_pred: &[L], positive: &L, average: Average) -> Result<f64> {
    averaged(y_true, y_pred, positive, average, Confusion::f1)
}

/// Metric names as they appear in serialized reports.
pub const ACCURACY: &str = "Accuracy";
pub const PRECISION: &str = "Precision";
pub const RECALL: &str = "Recall";
pub const F1_SCORE: &str = "F1 Score";

/// The four scores of one evaluation, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F1 Score")]
    pub f1: f64,
}

impl MetricsReport {
    /// Compute all four metrics for one pair of label sequences.
    pub fn evaluate<L: Label>(
        y_true: &[L],
        y_pred: &[L],
        positive: &L,
        average: Average,
    ) -> Result<Self> {
        Ok(Self {
            accuracy: accuracy(y_true, y_pred)?,
            precision: precision(y_true, y_pred, positive, average)?,
            recall: recall(y_true, y_pred, positive, average)?,
            f1: f1_score(y_true, y_pred, positive, average)?,
        })
    }

    /// `(name, score)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            (ACCURACY, self.accuracy),
            (PRECISION, self.precision),
            (RECALL, self.recall),
            (F1_SCORE, self.f1),
        ]
    }

    /// Look a score up by its report name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, score)| score)
    }
}
