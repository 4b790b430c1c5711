//! Checkpoint format for trained Q-tables.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::{Error, Result, app::AgentConfig, types::Color};

/// Provenance recorded alongside a saved table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes_trained: Option<usize>,
    pub seed: Option<u64>,
    /// RFC 3339 timestamp of the save
    pub saved_at: Option<String>,
}

impl TrainingMetadata {
    /// Metadata stamped with the current time and nothing else.
    pub fn now() -> Self {
        Self {
            saved_at: Some(Utc::now().to_rfc3339()),
            ..Self::default()
        }
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes_trained = Some(episodes);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Versioned envelope around one agent's table.
///
/// The hyperparameters are informational; loading keeps the receiving
/// agent's own settings and only replaces its table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub color: Color,
    pub q_table: QTable,
    pub hyperparameters: AgentConfig,
    #[serde(default)]
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn new(
        color: Color,
        q_table: QTable,
        hyperparameters: AgentConfig,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            version: Self::VERSION,
            color,
            q_table,
            hyperparameters,
            metadata,
        }
    }

    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }
}
