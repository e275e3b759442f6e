//! In-memory model store for testing and short-lived processes.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::{ModelStore, validate_id};

/// Keeps serialized snapshots in a map.
#[derive(Debug, Default)]
pub struct MemoryModelStore {
    models: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored models.
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Identifiers of all stored models, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ModelStore for MemoryModelStore {
    fn load_bytes(&self, id: &str) -> Result<Option<Vec<u8>>> {
        validate_id(id)?;
        Ok(self.models.read().get(id).cloned())
    }

    fn save_bytes(&self, id: &str, bytes: &[u8]) -> Result<()> {
        validate_id(id)?;
        self.models.write().insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        validate_id(id)?;
        Ok(self.models.read().contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_bytes() {
        let store = MemoryModelStore::new();
        assert!(store.is_empty());
        assert!(!store.exists("IsAbusive").unwrap());

        store.save_bytes("IsAbusive", b"one").unwrap();
        store.save_bytes("IsToxic", b"two").unwrap();
        store.save_bytes("IsAbusive", b"three").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.ids(), vec!["IsAbusive", "IsToxic"]);
        assert_eq!(store.load_bytes("IsAbusive").unwrap(), Some(b"three".to_vec()));
        assert!(store.load_bytes("").is_err());
    }
}
