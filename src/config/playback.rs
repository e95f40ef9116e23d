use super::traits::ConfigSection;
use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between rendered frames (16ms is roughly the native 60 fps).
    pub frame_delay_ms: u64,
    pub render: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 16,
            render: true,
        }
    }
}

impl ConfigSection for PlaybackConfig {
    fn section_name() -> &'static str {
        "playback"
    }

    fn validate(&self) -> Result<(), LevelSearchError> {
        Ok(())
    }
}
