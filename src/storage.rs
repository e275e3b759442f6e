//! Persistence of trained models.
//!
//! A [`ModelStore`] keeps one serialized [`ModelSnapshot`] per model
//! identifier (usually the label column, such as `IsToxic`). Snapshots are
//! encoded with bincode and carry the scores the model was selected on, so a
//! later training run can decide whether to replace it.
//!
//! # Storage Types
//!
//! - [`FileModelStore`](file::FileModelStore): one `best_model_<id>.bin` file per model
//! - [`MemoryModelStore`](memory::MemoryModelStore): bytes held in memory, for tests
//!
//! # Example
//!
//! ```
//! use spatha::ml::metrics::MetricsReport;
//! use spatha::storage::memory::MemoryModelStore;
//! use spatha::storage::{auto_save_best_model, ModelSnapshot, ModelStore};
//!
//! # fn main() -> spatha::error::Result<()> {
//! let store = MemoryModelStore::new();
//! let metrics = MetricsReport { accuracy: 0.9, precision: 0.9, recall: 0.9, f1: 0.9 };
//! let snapshot = ModelSnapshot::new(vec![1u32, 2, 3], metrics, "IsToxic");
//! auto_save_best_model(&store, "IsToxic", &snapshot)?;
//! assert!(store.exists("IsToxic")?);
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SpathaError};
use crate::ml::metrics::MetricsReport;
use crate::ml::selection::{ModelChoice, SavedModelState};

/// A trained model together with the scores it was selected on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot<M> {
    pub model: M,
    pub metrics: MetricsReport,
    /// Label column the model was trained for.
    pub label: String,
    pub trained_at: DateTime<Utc>,
}

impl<M> ModelSnapshot<M> {
    /// Wrap a model, stamping it with the current time.
    pub fn new<S: Into<String>>(model: M, metrics: MetricsReport, label: S) -> Self {
        ModelSnapshot {
            model,
            metrics,
            label: label.into(),
            trained_at: Utc::now(),
        }
    }
}

/// A keyed store of serialized model snapshots.
pub trait ModelStore: Send + Sync + std::fmt::Debug {
    /// Raw bytes stored under `id`, if any.
    fn load_bytes(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `id`.
    fn save_bytes(&self, id: &str, bytes: &[u8]) -> Result<()>;

    /// Whether anything is stored under `id`.
    fn exists(&self, id: &str) -> Result<bool>;

    /// Load and decode the snapshot stored under `id`.
    fn load<M: DeserializeOwned>(&self, id: &str) -> Result<Option<ModelSnapshot<M>>>
    where
        Self: Sized,
    {
        match self.load_bytes(id)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `snapshot` under `id`.
    fn save<M: Serialize>(&self, id: &str, snapshot: &ModelSnapshot<M>) -> Result<()>
    where
        Self: Sized,
    {
        let bytes = bincode::serialize(snapshot)?;
        self.save_bytes(id, &bytes)
    }
}

/// Reject identifiers that cannot name a single stored model.
pub(crate) fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(SpathaError::invalid_input(format!(
            "invalid model identifier '{id}'"
        )));
    }
    Ok(())
}

/// Persist `candidate` under `id` only if it beats the stored model.
///
/// A stored snapshot that can no longer be decoded counts as absent and is
/// overwritten.
pub fn auto_save_best_model<S, M>(
    store: &S,
    id: &str,
    candidate: &ModelSnapshot<M>,
) -> Result<ModelChoice>
where
    S: ModelStore,
    M: Serialize + DeserializeOwned,
{
    let saved = match store.load::<M>(id) {
        Ok(saved) => saved,
        Err(SpathaError::Serialization(err)) => {
            warn!(id, error = %err, "stored model is unreadable, treating it as absent");
            None
        }
        Err(err) => return Err(err),
    };

    let state = SavedModelState::compare(&candidate.metrics, saved.as_ref().map(|s| &s.metrics));
    let choice = state.choice();
    match choice {
        ModelChoice::Candidate => {
            store.save(id, candidate)?;
            info!(id, f1 = candidate.metrics.f1, ?state, "saved new best model");
        }
        ModelChoice::Saved => {
            info!(id, f1 = candidate.metrics.f1, ?state, "kept existing model");
        }
    }
    Ok(choice)
}
