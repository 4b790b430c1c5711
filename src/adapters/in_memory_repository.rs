//! In-memory checkpoint repository for testing.
//!
//! This adapter provides a pure in-memory implementation of CheckpointRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::SavedAgent};

/// In-memory repository for testing.
///
/// Checkpoints are stored as MessagePack bytes keyed by path, so the
/// serialization path is still exercised.
///
/// # Examples
///
/// ```
/// use checkers_rl::adapters::InMemoryRepository;
/// use checkers_rl::app::AgentConfig;
/// use checkers_rl::ports::CheckpointRepository;
/// use checkers_rl::q_learning::{QLearningAgent, TrainingMetadata};
/// use checkers_rl::types::Color;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(Color::Black, AgentConfig::default());
///
/// repo.save(&agent.to_saved(TrainingMetadata::default()), Path::new("q_black"))?;
/// let loaded = repo.load(Path::new("q_black"))?;
/// assert_eq!(loaded.color, Color::Black);
/// # Ok::<(), checkers_rl::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of checkpoints currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl CheckpointRepository for InMemoryRepository {
    fn save(&self, checkpoint: &SavedAgent, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec_named(checkpoint).map_err(|e| Error::SerializationContext {
            operation: "serialize checkpoint for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load checkpoint from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize checkpoint from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AgentConfig,
        q_learning::{QTable, TrainingMetadata},
        types::Color,
    };

    fn checkpoint(color: Color) -> SavedAgent {
        SavedAgent::new(
            color,
            QTable::new(),
            AgentConfig::default(),
            TrainingMetadata::default(),
        )
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("q_red");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&checkpoint(Color::Red), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        assert_eq!(repo.load(path).unwrap().color, Color::Red);
    }

    #[test]
    fn test_clones_share_storage() {
        let repo = InMemoryRepository::new();
        let clone = repo.clone();
        repo.save(&checkpoint(Color::Black), Path::new("shared")).unwrap();
        assert!(clone.contains(Path::new("shared")));
        clone.clear();
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_missing_key_is_io_error() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.load(Path::new("absent")),
            Err(Error::Io { .. })
        ));
    }
}
