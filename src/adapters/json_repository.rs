//! JSON implementation of the checkpoint repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::SavedAgent};

/// Human-readable checkpoints.
///
/// State keys and actions appear as plain strings, so a saved table can be
/// inspected or diffed with ordinary text tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository {
    pretty: bool,
}

impl JsonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl CheckpointRepository for JsonRepository {
    fn save(&self, checkpoint: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, checkpoint)?;
        } else {
            serde_json::to_writer(&mut writer, checkpoint)?;
        }
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

        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
