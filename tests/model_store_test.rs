//! Integration tests for saving, reloading and replacing trained models.

use spatha::corpus::Corpus;
use spatha::error::Result;
use spatha::ml::bagging::BaggingConfig;
use spatha::ml::selection::ModelChoice;
use spatha::ml::training::{CommentModel, Trainer, TrainingConfig};
use spatha::storage::file::FileModelStore;
use spatha::storage::memory::MemoryModelStore;
use spatha::storage::{ModelSnapshot, ModelStore, auto_save_best_model};
use tempfile::TempDir;

fn abusive_corpus() -> Corpus<bool> {
    let abusive = ["get lost loser", "you pathetic loser", "nobody likes you loser", "pathetic"];
    let fine = ["cool track", "subscribed", "the drums are great", "cool cool"];
    let mut pairs = Vec::new();
    for _ in 0..5 {
        pairs.extend(abusive.iter().map(|text| (text.to_string(), true)));
        pairs.extend(fine.iter().map(|text| (text.to_string(), false)));
    }
    Corpus::from_pairs(pairs)
}

fn trainer(seed: u64) -> Trainer {
    Trainer::new(TrainingConfig {
        seed: Some(seed),
        bagging: BaggingConfig {
            n_estimators: 5,
            ..BaggingConfig::default()
        },
        ..TrainingConfig::default()
    })
    .unwrap()
}

#[test]
fn test_reloaded_model_behaves_identically() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let store = FileModelStore::new(temp_dir.path());
    let outcome = trainer(3).train(&abusive_corpus(), &true)?;

    let snapshot = ModelSnapshot::new(outcome.model, outcome.evaluation.test, "IsAbusive");
    store.save("IsAbusive", &snapshot)?;
    assert!(temp_dir.path().join("best_model_IsAbusive.bin").is_file());

    let loaded: ModelSnapshot<CommentModel<bool>> = store.load("IsAbusive")?.unwrap();
    assert_eq!(loaded.label, "IsAbusive");
    assert_eq!(loaded.metrics, snapshot.metrics);
    assert_eq!(loaded.trained_at, snapshot.trained_at);

    let comments = ["you loser", "cool drums", "pathetic track", "hello there"];
    assert_eq!(loaded.model.predict(&comments)?, snapshot.model.predict(&comments)?);
    for comment in comments {
        assert_eq!(
            loaded.model.contributing_words(comment, &true)?,
            snapshot.model.contributing_words(comment, &true)?
        );
    }
    Ok(())
}

#[test]
fn test_auto_save_replaces_only_better_models() -> Result<()> {
    let store = MemoryModelStore::new();
    let outcome = trainer(8).train(&abusive_corpus(), &true)?;
    let mut snapshot = ModelSnapshot::new(outcome.model, outcome.evaluation.test, "IsAbusive");

    assert_eq!(
        auto_save_best_model(&store, "IsAbusive", &snapshot)?,
        ModelChoice::Candidate
    );
    assert_eq!(
        auto_save_best_model(&store, "IsAbusive", &snapshot)?,
        ModelChoice::Saved
    );

    snapshot.metrics.f1 = -1.0;
    assert_eq!(
        auto_save_best_model(&store, "IsAbusive", &snapshot)?,
        ModelChoice::Saved
    );
    let kept: ModelSnapshot<CommentModel<bool>> = store.load("IsAbusive")?.unwrap();
    assert!(kept.metrics.f1 >= 0.0);
    assert_eq!(store.ids(), vec!["IsAbusive"]);
    Ok(())
}
