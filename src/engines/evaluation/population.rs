use super::episode::FitnessReport;
use super::fitness::FitnessEvaluator;
use crate::engines::generation::Genome;
use crate::environment::EnvironmentFactory;
use crate::error::{LevelSearchError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Evaluates a whole generation in parallel.
///
/// Every genome runs in its own environment instance. Results come back in
/// input order, and the first failure fails the whole batch.
pub struct PopulationEvaluator<F> {
    evaluator: FitnessEvaluator<F>,
    pool: Option<ThreadPool>,
}

impl<F: EnvironmentFactory> PopulationEvaluator<F> {
    /// `workers: None` shares rayon's global pool, sized to the available cores.
    pub fn new(evaluator: FitnessEvaluator<F>, workers: Option<usize>) -> Result<Self> {
        let pool = workers
            .map(|threads| {
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("evaluator-{i}"))
                    .build()
            })
            .transpose()
            .map_err(|e| LevelSearchError::WorkerPool(e.to_string()))?;

        Ok(Self { evaluator, pool })
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<F> {
        &self.evaluator
    }

    pub fn evaluate_population(&self, population: &[Genome]) -> Result<Vec<f64>> {
        Ok(self
            .evaluate_reports(population)?
            .into_iter()
            .map(|report| report.fitness)
            .collect())
    }

    pub fn evaluate_reports(&self, population: &[Genome]) -> Result<Vec<FitnessReport>> {
        let run = || {
            population
                .par_iter()
                .enumerate()
                .map(|(index, genome)| {
                    self.evaluator
                        .evaluate_detailed(genome)
                        .map_err(|err| tag_individual(err, index))
                })
                .collect::<Result<Vec<_>>>()
        };

        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

fn tag_individual(err: LevelSearchError, index: usize) -> LevelSearchError {
    match err {
        LevelSearchError::Environment(source) => {
            LevelSearchError::Environment(source.context(format!("evaluating individual {index}")))
        }
        LevelSearchError::InvalidGenome(message) => {
            LevelSearchError::InvalidGenome(format!("individual {index}: {message}"))
        }
        other => other,
    }
}
