//! Repository port for checkpoint persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading agent checkpoints.
///
/// A checkpoint is saved and loaded whole; there are no partial writes and
/// no retries.
pub trait CheckpointRepository {
    /// Save a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or
    /// serialization fails.
    fn save(&self, checkpoint: &SavedAgent, path: &Path) -> Result<()>;

    /// Load a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing, unreadable, or does not
    /// decode to a checkpoint.
    fn load(&self, path: &Path) -> Result<SavedAgent>;
}
