use crate::config::CheckpointConfig;
use crate::engines::generation::Genome;
use crate::error::{LevelSearchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Which snapshot a checkpoint represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckpointLabel {
    /// Best genome of a numbered generation (1-based).
    Generation(usize),
    /// Best genome of the last generation.
    Final,
    /// Best genome of the whole run.
    Best,
}

impl fmt::Display for CheckpointLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointLabel::Generation(generation) => write!(f, "generation {}", generation),
            CheckpointLabel::Final => write!(f, "final"),
            CheckpointLabel::Best => write!(f, "best"),
        }
    }
}

/// A stored genome. Only `genome` is required to replay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub genome: Genome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Checkpoint {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            generation: None,
            fitness: None,
            saved_at: Some(Utc::now()),
        }
    }

    pub fn with_generation(mut self, generation: usize) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness.is_finite().then_some(fitness);
        self
    }
}

/// Durable storage for checkpoints. Every save overwrites the previous
/// checkpoint with the same label.
pub trait CheckpointStore {
    fn save(&mut self, label: CheckpointLabel, checkpoint: &Checkpoint) -> Result<()>;
    fn load(&self, label: CheckpointLabel) -> Result<Checkpoint>;
}

/// Stores checkpoints as pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    directory: PathBuf,
    prefix: String,
    best_file_name: String,
}

impl FileCheckpointStore {
    pub fn new(config: &CheckpointConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            prefix: config.prefix.clone(),
            best_file_name: config.best_file_name.clone(),
        }
    }

    pub fn path_for(&self, label: CheckpointLabel) -> PathBuf {
        let file_name = match label {
            CheckpointLabel::Generation(generation) => format!("{}_{}.json", self.prefix, generation),
            CheckpointLabel::Final => format!("{}_final.json", self.prefix),
            CheckpointLabel::Best => self.best_file_name.clone(),
        };
        self.directory.join(file_name)
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn save(&mut self, label: CheckpointLabel, checkpoint: &Checkpoint) -> Result<()> {
        let path = self.path_for(label);
        let failed = |message: String| LevelSearchError::Checkpoint {
            path: path.clone(),
            message,
        };

        fs::create_dir_all(&self.directory)
            .map_err(|e| failed(format!("failed creating directory: {}", e)))?;
        let bytes = serde_json::to_vec_pretty(checkpoint)
            .map_err(|e| failed(format!("failed serializing: {}", e)))?;
        fs::write(&path, bytes).map_err(|e| failed(format!("failed writing: {}", e)))?;

        Ok(())
    }

    fn load(&self, label: CheckpointLabel) -> Result<Checkpoint> {
        load_checkpoint(self.path_for(label))
    }
}

/// Read a checkpoint file on its own, without any other run state.
pub fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<Checkpoint> {
    let path = path.as_ref();
    let failed = |message: String| LevelSearchError::Checkpoint {
        path: path.to_path_buf(),
        message,
    };

    let raw = fs::read(path).map_err(|e| failed(format!("failed reading: {}", e)))?;
    serde_json::from_slice(&raw).map_err(|e| failed(format!("failed parsing: {}", e)))
}
