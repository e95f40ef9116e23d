use crate::config::{ConfigSection, EvolutionConfig};
use crate::data::{Checkpoint, CheckpointLabel, CheckpointStore};
use crate::engines::evaluation::PopulationEvaluator;
use crate::engines::generation::{
    genome::Genome,
    operators::{best_index, crossover, elite_indices, mutate, select_parents},
};
use crate::environment::EnvironmentFactory;
use crate::error::{LevelSearchError, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Running state of one evolution. Owned and updated by `EvolutionEngine` only.
#[derive(Debug, Clone)]
pub struct EvolutionState {
    /// Completed generations.
    pub generation: usize,
    /// Population to be evaluated next. Once the last generation has run it
    /// holds that generation's evaluated population, since no offspring are bred.
    pub population: Vec<Genome>,
    pub best_genome: Option<Genome>,
    pub best_fitness: f64,
    /// Checkpoint writes that failed during the run.
    pub degraded_checkpoints: usize,
}

/// Everything observed while processing one generation.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// 1-based generation number.
    pub generation: usize,
    /// The evaluated population, paired index-for-index with `fitnesses`.
    pub population: Vec<Genome>,
    pub fitnesses: Vec<f64>,
    pub best_index: usize,
    pub best_fitness: f64,
    pub best_ever_fitness: f64,
    /// Whether this generation raised the best-ever fitness.
    pub improved: bool,
    /// Indices into `population` carried unchanged into the next generation.
    pub elites: Vec<usize>,
}

impl GenerationSummary {
    pub fn best_genome(&self) -> &Genome {
        &self.population[self.best_index]
    }
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best_genome: Genome,
    pub best_fitness: f64,
    pub generations: usize,
    /// Best fitness of every generation, in order.
    pub best_per_generation: Vec<f64>,
    pub degraded_checkpoints: usize,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_checkpoint(&mut self, label: CheckpointLabel, saved: bool);
}

/// Generational loop: evaluate, select, vary, carry elites, replace.
///
/// Each generation is a barrier. Evaluation fans out across worker threads,
/// everything else (including all random draws) happens on the caller's
/// thread, so a fixed seed reproduces the run exactly.
pub struct EvolutionEngine<F, S> {
    config: EvolutionConfig,
    evaluator: PopulationEvaluator<F>,
    checkpoints: S,
    rng: StdRng,
}

impl<F: EnvironmentFactory, S: CheckpointStore> EvolutionEngine<F, S> {
    pub fn new(config: EvolutionConfig, evaluator: PopulationEvaluator<F>, checkpoints: S) -> Result<Self> {
        config.validate()?;
        if evaluator.evaluator().action_count() == 0 {
            return Err(LevelSearchError::Configuration(
                "action space must contain at least one action".to_string(),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            evaluator,
            checkpoints,
            rng,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn checkpoints(&self) -> &S {
        &self.checkpoints
    }

    pub fn into_checkpoints(self) -> S {
        self.checkpoints
    }

    fn action_count(&self) -> u32 {
        self.evaluator.evaluator().action_count()
    }

    /// Fresh random population and an empty best-ever record.
    pub fn initialize(&mut self) -> EvolutionState {
        let action_count = self.action_count();
        let population = (0..self.config.population_size)
            .map(|_| Genome::random(self.config.genome_length, action_count, &mut self.rng))
            .collect();

        EvolutionState {
            generation: 0,
            population,
            best_genome: None,
            best_fitness: f64::NEG_INFINITY,
            degraded_checkpoints: 0,
        }
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionOutcome> {
        let mut state = self.initialize();
        let mut best_per_generation = Vec::with_capacity(self.config.num_generations);
        let mut last = None;

        while state.generation < self.config.num_generations {
            let summary = self.run_generation(&mut state, &mut callback)?;
            best_per_generation.push(summary.best_fitness);
            last = Some(summary);
        }

        let (Some(last), Some(best_genome)) = (last, state.best_genome.clone()) else {
            return Err(LevelSearchError::Configuration(
                "evolution finished without evaluating a generation".to_string(),
            ));
        };

        let final_checkpoint = Checkpoint::new(last.best_genome().clone())
            .with_generation(last.generation)
            .with_fitness(last.best_fitness);
        self.write_checkpoint(CheckpointLabel::Final, &final_checkpoint, &mut state, &mut callback);

        let best_checkpoint = Checkpoint::new(best_genome.clone()).with_fitness(state.best_fitness);
        self.write_checkpoint(CheckpointLabel::Best, &best_checkpoint, &mut state, &mut callback);

        info!(
            "Evolution complete after {} generations. Best fitness: {:.2}",
            state.generation, state.best_fitness
        );

        Ok(EvolutionOutcome {
            best_genome,
            best_fitness: state.best_fitness,
            generations: state.generation,
            best_per_generation,
            degraded_checkpoints: state.degraded_checkpoints,
        })
    }

    /// Evaluate the current population and replace it with the next one.
    pub fn run_generation<C: ProgressCallback>(
        &mut self,
        state: &mut EvolutionState,
        callback: &mut C,
    ) -> Result<GenerationSummary> {
        let generation = state.generation + 1;
        callback.on_generation_start(generation);

        let fitnesses = self.evaluator.evaluate_population(&state.population)?;
        for (i, fitness) in fitnesses.iter().enumerate() {
            debug!("  [{}/{}] fitness {:.2}", i + 1, fitnesses.len(), fitness);
        }

        let best = best_index(&fitnesses).ok_or_else(|| {
            LevelSearchError::Configuration("cannot evolve an empty population".to_string())
        })?;
        let best_fitness = fitnesses[best];
        let improved = best_fitness > state.best_fitness;
        if improved {
            state.best_fitness = best_fitness;
            state.best_genome = Some(state.population[best].clone());
            info!("New best genome in generation {}: {:.2}", generation, best_fitness);
        }

        let elites = elite_indices(&fitnesses, self.config.elite_size);

        if generation == 1 || generation % self.config.checkpoint_interval == 0 {
            let checkpoint = Checkpoint::new(state.population[best].clone())
                .with_generation(generation)
                .with_fitness(best_fitness);
            self.write_checkpoint(CheckpointLabel::Generation(generation), &checkpoint, state, callback);
        }

        let next = if generation < self.config.num_generations {
            self.breed(&state.population, &fitnesses, &elites)
        } else {
            state.population.clone()
        };

        let evaluated = std::mem::replace(&mut state.population, next);
        state.generation = generation;

        let summary = GenerationSummary {
            generation,
            population: evaluated,
            fitnesses,
            best_index: best,
            best_fitness,
            best_ever_fitness: state.best_fitness,
            improved,
            elites,
        };
        callback.on_generation_complete(&summary);

        Ok(summary)
    }

    /// Elites first, then mutated crossover offspring of tournament winners.
    fn breed(&mut self, population: &[Genome], fitnesses: &[f64], elites: &[usize]) -> Vec<Genome> {
        let size = self.config.population_size;
        let action_count = self.action_count();
        let parents = select_parents(
            population,
            fitnesses,
            self.config.tournament_size,
            self.config.parent_pool_size(),
            &mut self.rng,
        );

        let mut next_generation: Vec<Genome> = elites.iter().map(|&i| population[i].clone()).collect();

        while next_generation.len() < size {
            let pair = index::sample(&mut self.rng, parents.len(), 2);
            let (child1, child2) = crossover(&parents[pair.index(0)], &parents[pair.index(1)], &mut self.rng);

            next_generation.push(mutate(&child1, self.config.mutation_rate, action_count, &mut self.rng));
            next_generation.push(mutate(&child2, self.config.mutation_rate, action_count, &mut self.rng));
        }

        next_generation.truncate(size);
        next_generation
    }

    /// Checkpoint failures degrade the run but never abort it.
    fn write_checkpoint<C: ProgressCallback>(
        &mut self,
        label: CheckpointLabel,
        checkpoint: &Checkpoint,
        state: &mut EvolutionState,
        callback: &mut C,
    ) {
        match self.checkpoints.save(label, checkpoint) {
            Ok(()) => {
                info!("Saved {} checkpoint", label);
                callback.on_checkpoint(label, true);
            }
            Err(e) => {
                state.degraded_checkpoints += 1;
                warn!("Could not save {} checkpoint, continuing without it: {}", label, e);
                callback.on_checkpoint(label, false);
            }
        }
    }
}
