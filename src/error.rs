use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LevelSearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error(transparent)]
    Environment(#[from] anyhow::Error),

    #[error("Checkpoint error at {path}: {message}")]
    Checkpoint { path: PathBuf, message: String },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, LevelSearchError>;
