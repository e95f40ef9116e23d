pub mod config;
pub mod data;
pub mod engines;
pub mod environment;
pub mod error;
pub mod playback;
pub mod types;

pub use error::{LevelSearchError, Result};
