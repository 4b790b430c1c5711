//! Format selection by file extension.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{JsonRepository, MsgPackRepository};
use crate::{Result, ports::CheckpointRepository, q_learning::SavedAgent, types::Color};

/// On-disk checkpoint encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointFormat {
    #[default]
    #[value(name = "msgpack")]
    MsgPack,
    Json,
}

impl CheckpointFormat {
    pub fn extension(self) -> &'static str {
        match self {
            CheckpointFormat::MsgPack => "msgpack",
            CheckpointFormat::Json => "json",
        }
    }

    /// `.json` means JSON; anything else is read as MessagePack.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CheckpointFormat::Json,
            _ => CheckpointFormat::MsgPack,
        }
    }
}

/// Conventional file name for one side's table: `q_red.msgpack`, `q_black.json`, ...
pub fn checkpoint_path(dir: &Path, color: Color, format: CheckpointFormat) -> PathBuf {
    dir.join(format!("q_{}.{}", color.as_str(), format.extension()))
}

/// Repository that dispatches on the path's extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionRepository;

impl ExtensionRepository {
    pub fn new() -> Self {
        Self
    }
}

impl CheckpointRepository for ExtensionRepository {
    fn save(&self, checkpoint: &SavedAgent, path: &Path) -> Result<()> {
        match CheckpointFormat::from_path(path) {
            CheckpointFormat::MsgPack => MsgPackRepository.save(checkpoint, path),
            CheckpointFormat::Json => JsonRepository::pretty().save(checkpoint, path),
        }
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        match CheckpointFormat::from_path(path) {
            CheckpointFormat::MsgPack => MsgPackRepository.load(path),
            CheckpointFormat::Json => JsonRepository::new().load(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        app::AgentConfig,
        q_learning::{QTable, TrainingMetadata},
    };

    #[test]
    fn test_checkpoint_paths() {
        let dir = Path::new("out");
        assert_eq!(
            checkpoint_path(dir, Color::Red, CheckpointFormat::MsgPack),
            PathBuf::from("out/q_red.msgpack")
        );
        assert_eq!(
            checkpoint_path(dir, Color::Black, CheckpointFormat::Json),
            PathBuf::from("out/q_black.json")
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            CheckpointFormat::from_path(Path::new("a/q.JSON")),
            CheckpointFormat::Json
        );
        assert_eq!(
            CheckpointFormat::from_path(Path::new("a/q.msgpack")),
            CheckpointFormat::MsgPack
        );
        assert_eq!(
            CheckpointFormat::from_path(Path::new("a/q")),
            CheckpointFormat::MsgPack
        );
    }

    #[test]
    fn test_json_file_is_text() {
        let dir = TempDir::new().unwrap();
        let path = checkpoint_path(dir.path(), Color::Red, CheckpointFormat::Json);
        let saved = SavedAgent::new(
            Color::Red,
            QTable::new(),
            AgentConfig::default(),
            TrainingMetadata::default(),
        );
        ExtensionRepository.save(&saved, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with('{'));
        assert_eq!(ExtensionRepository.load(&path).unwrap(), saved);
    }
}
