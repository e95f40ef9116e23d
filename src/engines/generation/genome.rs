//! Genome representation for the action-sequence search
//!
//! A genome is a fixed-length sequence of action identifiers. The fitness
//! evaluator replays it front to back, holding each action for `frame_skip`
//! environment steps, and may stop early when the episode terminates.
//!
//! # Copy-on-write
//!
//! A genome is never modified once it has been scored. Crossover and
//! mutation always build new genomes, so an elite carried into the next
//! generation is byte-for-byte the genome that earned its fitness.
//!
//! # Example
//!
//! ```
//! use levelsearch::engines::generation::Genome;
//!
//! let genome = Genome::new(vec![1, 1, 2, 3, 0]);
//! assert_eq!(genome.len(), 5);
//! assert!(genome.validate(Some(5), 4).is_ok());
//! ```

use crate::error::{LevelSearchError, Result};
use crate::types::Action;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(Vec<Action>);

impl Genome {
    pub fn new(actions: Vec<Action>) -> Self {
        Self(actions)
    }

    /// Uniformly random genome of `length` actions drawn from `[0, action_count)`.
    pub fn random<R: Rng>(length: usize, action_count: u32, rng: &mut R) -> Self {
        Self((0..length).map(|_| rng.gen_range(0..action_count)).collect())
    }

    pub fn actions(&self) -> &[Action] {
        &self.0
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.0
    }

    /// Check the length (when fixed) and that every action is in range.
    pub fn validate(&self, length: Option<usize>, action_count: u32) -> Result<()> {
        if let Some(expected) = length {
            if self.0.len() != expected {
                return Err(LevelSearchError::InvalidGenome(format!(
                    "expected {} actions, found {}",
                    expected,
                    self.0.len()
                )));
            }
        }
        if let Some((position, action)) = self
            .0
            .iter()
            .enumerate()
            .find(|(_, action)| **action >= action_count)
        {
            return Err(LevelSearchError::InvalidGenome(format!(
                "action {} at position {} is outside [0, {})",
                action, position, action_count
            )));
        }
        Ok(())
    }
}

impl Deref for Genome {
    type Target = [Action];

    fn deref(&self) -> &[Action] {
        &self.0
    }
}

impl From<Vec<Action>> for Genome {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

impl FromIterator<Action> for Genome {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
