//! MessagePack implementation of the checkpoint repository.
//!
//! This adapter implements the CheckpointRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::SavedAgent};

/// MessagePack-based checkpoint repository.
///
/// The default on-disk format: Q-tables grow to hundreds of thousands of
/// entries and the binary form is several times smaller than JSON.
///
/// # Examples
///
/// ```no_run
/// use checkers_rl::adapters::MsgPackRepository;
/// use checkers_rl::app::AgentConfig;
/// use checkers_rl::ports::CheckpointRepository;
/// use checkers_rl::q_learning::{QLearningAgent, TrainingMetadata};
/// use checkers_rl::types::Color;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = QLearningAgent::new(Color::Red, AgentConfig::default());
///
/// repo.save(&agent.to_saved(TrainingMetadata::now()), Path::new("q_red.msgpack"))?;
/// let loaded = repo.load(Path::new("q_red.msgpack"))?;
/// # Ok::<(), checkers_rl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl CheckpointRepository for MsgPackRepository {
    fn save(&self, checkpoint: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, checkpoint).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize checkpoint to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize checkpoint from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}
