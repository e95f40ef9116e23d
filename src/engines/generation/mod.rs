pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;

pub use genome::Genome;
pub use evolution_engine::{
    EvolutionEngine, EvolutionOutcome, EvolutionState, GenerationSummary, ProgressCallback,
};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
