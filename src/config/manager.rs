use super::{
    checkpoint::CheckpointConfig,
    environment::EnvironmentConfig,
    evaluation::EvaluationConfig,
    evolution::EvolutionConfig,
    playback::PlaybackConfig,
    traits::ConfigSection,
};
use crate::error::{LevelSearchError, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `LEVELSEARCH__EVOLUTION__POPULATION_SIZE=20`.
pub const ENV_PREFIX: &str = "LEVELSEARCH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub evaluation: EvaluationConfig,
    pub environment: EnvironmentConfig,
    pub checkpoint: CheckpointConfig,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.evaluation.validate()?;
        self.environment.validate()?;
        self.checkpoint.validate()?;
        self.playback.validate()?;
        Ok(())
    }

    /// Defaults, overlaid with `path` when given, overlaid with environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);
        if let Some(path) = path {
            if !path.exists() {
                return Err(LevelSearchError::Configuration(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    /// Parse a TOML document layered over the defaults. No environment overrides.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self> {
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| LevelSearchError::Configuration(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_str)
            .map_err(|e| LevelSearchError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
