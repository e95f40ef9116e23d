pub mod episode;
pub mod fitness;
pub mod population;

pub use episode::{EpisodeTracker, FitnessReport, StepDecision, Termination};
pub use fitness::FitnessEvaluator;
pub use population::PopulationEvaluator;
