//! Disk-backed model store.
//!
//! Each model lives in `<directory>/best_model_<id>.bin`. Writes go to a
//! temporary file in the same directory that is then renamed over the
//! target, so a crash never leaves a half-written model behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::storage::{ModelStore, validate_id};

/// File name prefix of stored models.
pub const MODEL_FILE_PREFIX: &str = "best_model_";
/// File name extension of stored models.
pub const MODEL_FILE_EXTENSION: &str = "bin";

/// Stores one bincode file per model identifier.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    directory: PathBuf,
}

impl FileModelStore {
    /// Use `directory` for model files. It is created on the first save.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        FileModelStore {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding model `id`.
    pub fn model_path(&self, id: &str) -> PathBuf {
        self.directory
            .join(format!("{MODEL_FILE_PREFIX}{id}.{MODEL_FILE_EXTENSION}"))
    }
}

impl ModelStore for FileModelStore {
    fn load_bytes(&self, id: &str) -> Result<Option<Vec<u8>>> {
        validate_id(id)?;
        match fs::read(self.model_path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_bytes(&self, id: &str, bytes: &[u8]) -> Result<()> {
        validate_id(id)?;
        fs::create_dir_all(&self.directory)?;

        let path = self.model_path(id);
        let temp_path = path.with_extension(format!("{MODEL_FILE_EXTENSION}.tmp"));
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        debug!(path = %path.display(), size = bytes.len(), "wrote model file");
        Ok(())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        validate_id(id)?;
        Ok(self.model_path(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_model_path() {
        let store = FileModelStore::new("/models");
        assert_eq!(
            store.model_path("IsToxic"),
            PathBuf::from("/models/best_model_IsToxic.bin")
        );
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileModelStore::new(temp_dir.path().join("models"));

        assert!(!store.exists("IsToxic").unwrap());
        assert_eq!(store.load_bytes("IsToxic").unwrap(), None);

        store.save_bytes("IsToxic", b"model bytes").unwrap();
        assert!(store.exists("IsToxic").unwrap());
        assert_eq!(
            store.load_bytes("IsToxic").unwrap(),
            Some(b"model bytes".to_vec())
        );

        store.save_bytes("IsToxic", b"newer").unwrap();
        assert_eq!(store.load_bytes("IsToxic").unwrap(), Some(b"newer".to_vec()));

        let leftovers: Vec<_> = fs::read_dir(store.directory())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_file_store_rejects_bad_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileModelStore::new(temp_dir.path());
        assert!(store.save_bytes("../escape", b"x").is_err());
        assert!(store.exists("").is_err());
    }
}
