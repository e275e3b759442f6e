//! Classifiers, ensembles, metrics and the training workflow.

pub mod bagging;
pub mod estimator;
pub mod metrics;
pub mod naive_bayes;
pub mod selection;
pub mod training;
