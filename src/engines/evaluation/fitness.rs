use super::episode::{EpisodeTracker, FitnessReport, StepDecision, Termination};
use crate::config::{ConfigSection, EvaluationConfig};
use crate::engines::generation::Genome;
use crate::environment::{Environment, EnvironmentFactory};
use crate::error::{LevelSearchError, Result};
use anyhow::{anyhow, Context};

/// Replays one genome against a fresh environment and scores it.
pub struct FitnessEvaluator<F> {
    factory: F,
    config: EvaluationConfig,
    action_count: u32,
    genome_length: Option<usize>,
}

impl<F: EnvironmentFactory> FitnessEvaluator<F> {
    pub fn new(factory: F, config: EvaluationConfig, action_count: u32) -> Result<Self> {
        config.validate()?;
        if action_count == 0 {
            return Err(LevelSearchError::Configuration(
                "action space must contain at least one action".to_string(),
            ));
        }
        Ok(Self {
            factory,
            config,
            action_count,
            genome_length: None,
        })
    }

    /// Reject genomes whose length differs from `length`.
    pub fn with_genome_length(mut self, length: usize) -> Self {
        self.genome_length = Some(length);
        self
    }

    pub fn action_count(&self) -> u32 {
        self.action_count
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, genome: &Genome) -> Result<f64> {
        Ok(self.evaluate_detailed(genome)?.fitness)
    }

    pub fn evaluate_detailed(&self, genome: &Genome) -> Result<FitnessReport> {
        genome.validate(self.genome_length, self.action_count)?;

        let mut env = self
            .factory
            .create()
            .context("failed to create environment")?;
        let report = self.run_episode(&mut env, genome);
        env.close();
        report
    }

    fn run_episode(&self, env: &mut F::Env, genome: &Genome) -> Result<FitnessReport> {
        env.reset().context("environment reset failed")?;

        let mut tracker = EpisodeTracker::new(&self.config);
        let mut actions_executed = 0;
        let mut termination = Termination::GenomeExhausted;

        'episode: for &action in genome.iter() {
            actions_executed += 1;
            for _ in 0..self.config.frame_skip {
                let outcome = env
                    .step(action)
                    .with_context(|| format!("environment step {} failed", tracker.steps() + 1))?;
                if !outcome.reward.is_finite() {
                    return Err(anyhow!("non-finite reward {}", outcome.reward)
                        .context(format!("environment step {} failed", tracker.steps() + 1))
                        .into());
                }
                let airborne = env.airborne();

                if let StepDecision::Terminate(reason) =
                    tracker.observe(outcome.reward, outcome.done, &outcome.info, airborne)
                {
                    termination = reason;
                    break 'episode;
                }
            }
        }

        let report = tracker.finish(termination, actions_executed);
        if !report.fitness.is_finite() {
            return Err(LevelSearchError::Environment(anyhow!(
                "episode produced non-finite fitness {}",
                report.fitness
            )));
        }
        Ok(report)
    }
}
