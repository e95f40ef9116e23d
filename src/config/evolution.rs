use super::traits::{invalid, ConfigSection};
use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub num_generations: usize,
    pub mutation_rate: f64,
    pub elite_size: usize,
    pub tournament_size: usize,
    /// Best-of-generation checkpoints are written at generation 1 and every
    /// `checkpoint_interval` generations.
    pub checkpoint_interval: usize,
    pub seed: Option<u64>,
    /// Evaluation worker threads. `None` uses every available core.
    pub workers: Option<usize>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            genome_length: 2500,
            num_generations: 300,
            mutation_rate: 0.05,
            elite_size: 2,
            tournament_size: 3,
            checkpoint_interval: 10,
            seed: None,
            workers: None,
        }
    }
}

impl EvolutionConfig {
    /// Size of the parent pool filled by tournament selection.
    pub fn parent_pool_size(&self) -> usize {
        self.population_size / 2
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), LevelSearchError> {
        if self.population_size < 4 {
            return Err(invalid::<Self>(
                "population_size must be at least 4 so the parent pool holds two parents",
            ));
        }
        if self.elite_size >= self.population_size {
            return Err(invalid::<Self>(format!(
                "elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        if self.genome_length < 2 {
            return Err(invalid::<Self>("genome_length must be at least 2"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(invalid::<Self>(format!(
                "tournament_size must be between 1 and population_size ({})",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid::<Self>("mutation_rate must be between 0 and 1"));
        }
        if self.num_generations == 0 {
            return Err(invalid::<Self>("num_generations must be at least 1"));
        }
        if self.checkpoint_interval == 0 {
            return Err(invalid::<Self>("checkpoint_interval must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(invalid::<Self>("workers must be at least 1 when set"));
        }
        Ok(())
    }
}
