//! Choosing between a newly trained model and the one already saved.
//!
//! Models are compared on their F1 score. A saved model is kept when it
//! scores at least as well as the candidate.

use serde::{Deserialize, Serialize};

use crate::ml::metrics::MetricsReport;

/// How the saved model, if any, relates to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedModelState {
    NoSavedModel,
    SavedModelWorse,
    SavedModelBetterOrEqual,
}

/// Which model should be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    Candidate,
    Saved,
}

impl SavedModelState {
    /// Compare a candidate's scores against the saved model's scores.
    pub fn compare(candidate: &MetricsReport, saved: Option<&MetricsReport>) -> Self {
        match saved {
            None => SavedModelState::NoSavedModel,
            Some(saved) if candidate.f1 > saved.f1 => SavedModelState::SavedModelWorse,
            Some(_) => SavedModelState::SavedModelBetterOrEqual,
        }
    }

    pub fn choice(self) -> ModelChoice {
        match self {
            SavedModelState::NoSavedModel | SavedModelState::SavedModelWorse => {
                ModelChoice::Candidate
            }
            SavedModelState::SavedModelBetterOrEqual => ModelChoice::Saved,
        }
    }
}

/// Decide which model to keep.
pub fn select_model(candidate: &MetricsReport, saved: Option<&MetricsReport>) -> ModelChoice {
    SavedModelState::compare(candidate, saved).choice()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(f1: f64) -> MetricsReport {
        MetricsReport {
            accuracy: 0.5,
            precision: 0.5,
            recall: 0.5,
            f1,
        }
    }

    #[test]
    fn test_no_saved_model() {
        assert_eq!(
            SavedModelState::compare(&report(0.1), None),
            SavedModelState::NoSavedModel
        );
        assert_eq!(select_model(&report(0.0), None), ModelChoice::Candidate);
    }

    #[test]
    fn test_strictly_better_candidate_wins() {
        assert_eq!(
            SavedModelState::compare(&report(0.81), Some(&report(0.80))),
            SavedModelState::SavedModelWorse
        );
        assert_eq!(
            select_model(&report(0.81), Some(&report(0.80))),
            ModelChoice::Candidate
        );
    }

    #[test]
    fn test_equal_or_worse_candidate_keeps_saved() {
        assert_eq!(
            select_model(&report(0.8), Some(&report(0.8))),
            ModelChoice::Saved
        );
        assert_eq!(
            SavedModelState::compare(&report(0.5), Some(&report(0.9))),
            SavedModelState::SavedModelBetterOrEqual
        );
    }
}
