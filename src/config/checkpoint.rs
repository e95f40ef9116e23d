use super::traits::{invalid, ConfigSection};
use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub directory: PathBuf,
    /// File prefix for per-generation checkpoints (`{prefix}_{generation}.json`).
    pub prefix: String,
    pub best_file_name: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("checkpoints"),
            prefix: "agent_gen".to_string(),
            best_file_name: "best_agent.json".to_string(),
        }
    }
}

impl CheckpointConfig {
    pub fn best_path(&self) -> PathBuf {
        self.directory.join(&self.best_file_name)
    }
}

impl ConfigSection for CheckpointConfig {
    fn section_name() -> &'static str {
        "checkpoint"
    }

    fn validate(&self) -> Result<(), LevelSearchError> {
        if self.prefix.trim().is_empty() {
            return Err(invalid::<Self>("prefix must not be empty"));
        }
        if self.best_file_name.trim().is_empty() {
            return Err(invalid::<Self>("best_file_name must not be empty"));
        }
        Ok(())
    }
}
