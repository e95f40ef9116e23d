pub mod checkpoint;

pub use checkpoint::{load_checkpoint, Checkpoint, CheckpointLabel, CheckpointStore, FileCheckpointStore};
