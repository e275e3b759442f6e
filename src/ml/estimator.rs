//! The seam between the bagging ensemble and its base classifier.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// A class label.
///
/// Labels are compared for equality and hashed; nothing assumes they are
/// literally `0`/`1`. The command-line application uses `bool`.
pub trait Label: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Label for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A text classifier that can be bagged.
///
/// Implementations own all of their learned state; two instances never share
/// mutable data.
pub trait Estimator<L: Label>: Send + Sync {
    /// Learn from `documents` and their `labels`, replacing any previous state.
    fn fit<S: AsRef<str>>(&mut self, documents: &[S], labels: &[L]) -> Result<()>;

    /// Predict one label per document.
    fn predict<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<L>>;

    /// Smoothed log-probability of `word` under `label`.
    fn log_likelihood(&self, word: &str, label: &L) -> Result<f64>;

    /// Split `text` into the tokens this estimator counts.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Whether `fit` has populated this estimator.
    fn is_fitted(&self) -> bool;

    /// A fresh, unfitted instance with the same hyper-parameters.
    fn clone_unfitted(&self) -> Self
    where
        Self: Sized;

    /// Name used in logs.
    fn name(&self) -> &str;
}
