pub mod traits;
pub mod evolution;
pub mod evaluation;
pub mod environment;
pub mod checkpoint;
pub mod playback;
pub mod manager;

pub use manager::{AppConfig, ENV_PREFIX};
pub use evolution::EvolutionConfig;
pub use evaluation::EvaluationConfig;
pub use environment::{CorridorLevel, EnvironmentConfig, Span};
pub use checkpoint::CheckpointConfig;
pub use playback::PlaybackConfig;
pub use traits::ConfigSection;
