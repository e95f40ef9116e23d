use crate::config::PlaybackConfig;
use crate::engines::evaluation::Termination;
use crate::engines::generation::Genome;
use crate::environment::{Environment, EnvironmentFactory};
use crate::error::{LevelSearchError, Result};
use anyhow::Context;
use log::info;
use std::thread;
use std::time::Duration;

/// How a replay ended and how long it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub termination: Termination,
    pub steps: usize,
}

/// Replays a genome for a human to watch.
pub struct Playback<F> {
    factory: F,
    frame_skip: usize,
    config: PlaybackConfig,
}

impl<F: EnvironmentFactory> Playback<F> {
    pub fn new(factory: F, frame_skip: usize, config: PlaybackConfig) -> Result<Self> {
        if frame_skip == 0 {
            return Err(LevelSearchError::Configuration(
                "frame_skip must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            factory,
            frame_skip,
            config,
        })
    }

    pub fn play(&self, genome: &Genome) -> Result<()> {
        let summary = self.replay(genome)?;
        match summary.termination {
            Termination::LifeLost => info!("Lost a life after {} steps", summary.steps),
            Termination::GoalReached => info!("Level complete after {} steps", summary.steps),
            Termination::EnvironmentDone => info!("Episode ended after {} steps", summary.steps),
            _ => info!("Genome exhausted after {} steps", summary.steps),
        }
        Ok(())
    }

    /// Step through `genome`, rendering each frame, until life loss, goal or `done`.
    pub fn replay(&self, genome: &Genome) -> Result<PlaybackSummary> {
        let mut env = self.factory.create().context("failed to create environment")?;
        let summary = self.run(&mut env, genome);
        env.close();
        summary
    }

    fn run(&self, env: &mut F::Env, genome: &Genome) -> Result<PlaybackSummary> {
        env.reset().context("environment reset failed")?;
        let delay = Duration::from_millis(self.config.frame_delay_ms);
        let mut prev_life = None;
        let mut steps = 0;

        for &action in genome.iter() {
            for _ in 0..self.frame_skip {
                let outcome = env.step(action).context("environment step failed")?;
                steps += 1;
                if self.config.render {
                    env.render().context("render failed")?;
                }
                if !delay.is_zero() {
                    thread::sleep(delay);
                }

                let termination = match prev_life {
                    Some(prev) if outcome.info.life < prev => Some(Termination::LifeLost),
                    _ if outcome.info.flag_get => Some(Termination::GoalReached),
                    _ if outcome.done => Some(Termination::EnvironmentDone),
                    _ => None,
                };
                if let Some(termination) = termination {
                    return Ok(PlaybackSummary { termination, steps });
                }
                prev_life.get_or_insert(outcome.info.life);
            }
        }

        Ok(PlaybackSummary {
            termination: Termination::GenomeExhausted,
            steps,
        })
    }
}
