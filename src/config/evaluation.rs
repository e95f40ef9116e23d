use super::traits::{invalid, ConfigSection};
use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};

/// Reward shaping applied on top of the environment's native reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Environment steps each action is held for.
    pub frame_skip: usize,
    pub death_penalty: f64,
    pub backtrack_penalty: f64,
    /// Progress thresholds, each rewarded once per episode.
    pub milestones: Vec<i64>,
    pub milestone_bonus: f64,
    pub progress_weight: f64,
    pub step_penalty: f64,
    pub coin_bonus: f64,
    pub score_weight: f64,
    /// Minimum airborne steps before a jump's displacement counts.
    pub min_air_time: usize,
    pub jump_reward_factor: f64,
    pub max_stagnation: usize,
    pub stagnation_penalty: f64,
    pub goal_bonus: f64,
    pub time_bonus_factor: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            frame_skip: 4,
            death_penalty: 1000.0,
            backtrack_penalty: 10.0,
            milestones: vec![1000, 2000, 3000],
            milestone_bonus: 500.0,
            progress_weight: 0.1,
            step_penalty: 1.0,
            coin_bonus: 50.0,
            score_weight: 1.0,
            min_air_time: 5,
            jump_reward_factor: 1.0,
            max_stagnation: 50,
            stagnation_penalty: 100.0,
            goal_bonus: 10000.0,
            time_bonus_factor: 10.0,
        }
    }
}

impl ConfigSection for EvaluationConfig {
    fn section_name() -> &'static str {
        "evaluation"
    }

    fn validate(&self) -> Result<(), LevelSearchError> {
        if self.frame_skip == 0 {
            return Err(invalid::<Self>("frame_skip must be at least 1"));
        }
        if self.max_stagnation == 0 {
            return Err(invalid::<Self>("max_stagnation must be at least 1"));
        }
        let magnitudes = [
            ("death_penalty", self.death_penalty),
            ("backtrack_penalty", self.backtrack_penalty),
            ("milestone_bonus", self.milestone_bonus),
            ("step_penalty", self.step_penalty),
            ("coin_bonus", self.coin_bonus),
            ("stagnation_penalty", self.stagnation_penalty),
            ("goal_bonus", self.goal_bonus),
            ("time_bonus_factor", self.time_bonus_factor),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid::<Self>(format!(
                    "{name} must be a finite, non-negative number"
                )));
            }
        }
        Ok(())
    }
}
