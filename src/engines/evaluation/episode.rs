use crate::config::EvaluationConfig;
use crate::types::StepInfo;
use serde::{Deserialize, Serialize};

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The environment raised its own `done` flag.
    EnvironmentDone,
    LifeLost,
    /// No forward progress for `max_stagnation` consecutive steps.
    Stagnated,
    GoalReached,
    /// Every action of the genome was executed.
    GenomeExhausted,
}

/// Outcome of observing one environment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDecision {
    Continue,
    Terminate(Termination),
}

/// Fitness plus the diagnostics gathered while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub fitness: f64,
    /// Environment steps taken.
    pub steps: usize,
    /// Genome actions at least partially executed.
    pub actions_executed: usize,
    pub max_x: i64,
    /// Horizontal distance covered by qualifying jumps.
    pub jump_distance: i64,
    pub termination: Termination,
}

/// Accumulates the shaped reward of one episode, one step at a time.
///
/// `observe` applies the rules in a fixed order: native reward, `done`,
/// life loss, coins and score, backtracking, milestones, progress and time
/// pressure, airborne spans, stagnation, goal. Life loss is checked before
/// the goal when both happen on the same step.
pub struct EpisodeTracker<'a> {
    config: &'a EvaluationConfig,
    total: f64,
    steps: usize,
    prev_life: Option<i32>,
    prev_x: i64,
    prev_coins: u32,
    prev_score: u64,
    max_x: i64,
    claimed_milestones: Vec<bool>,
    stagnation: usize,
    air_time: usize,
    jump_start_x: Option<i64>,
    jump_distance: i64,
}

impl<'a> EpisodeTracker<'a> {
    pub fn new(config: &'a EvaluationConfig) -> Self {
        Self {
            config,
            total: 0.0,
            steps: 0,
            prev_life: None,
            prev_x: 0,
            prev_coins: 0,
            prev_score: 0,
            max_x: 0,
            claimed_milestones: vec![false; config.milestones.len()],
            stagnation: 0,
            air_time: 0,
            jump_start_x: None,
            jump_distance: 0,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Reward accumulated so far, excluding the deferred jump bonus.
    pub fn running_total(&self) -> f64 {
        self.total
    }

    pub fn observe(&mut self, reward: f64, done: bool, info: &StepInfo, airborne: bool) -> StepDecision {
        let config = self.config;
        self.steps += 1;
        self.total += reward;
        if done {
            return StepDecision::Terminate(Termination::EnvironmentDone);
        }

        match self.prev_life {
            None => self.prev_life = Some(info.life),
            Some(prev) if info.life < prev => {
                self.total -= config.death_penalty;
                return StepDecision::Terminate(Termination::LifeLost);
            }
            Some(_) => {}
        }

        let x = info.x_pos;
        self.max_x = self.max_x.max(x);

        if info.coins > self.prev_coins {
            self.total += f64::from(info.coins - self.prev_coins) * config.coin_bonus;
            self.prev_coins = info.coins;
        }
        if info.score > self.prev_score {
            self.total += (info.score - self.prev_score) as f64 * config.score_weight;
            self.prev_score = info.score;
        }

        if x < self.prev_x {
            self.total -= config.backtrack_penalty;
        }

        for (milestone, claimed) in config.milestones.iter().zip(self.claimed_milestones.iter_mut()) {
            if !*claimed && x >= *milestone && *milestone > self.prev_x {
                *claimed = true;
                self.total += config.milestone_bonus;
            }
        }

        self.total += (x - self.prev_x) as f64 * config.progress_weight;
        self.total -= config.step_penalty;

        if airborne {
            self.air_time += 1;
            self.jump_start_x.get_or_insert(x);
        } else {
            if let Some(start) = self.jump_start_x {
                if self.air_time >= config.min_air_time && x > start {
                    self.jump_distance += x - start;
                }
            }
            self.air_time = 0;
            self.jump_start_x = None;
        }

        if x > self.prev_x {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        self.prev_x = x;

        if self.stagnation >= config.max_stagnation {
            self.total -= config.stagnation_penalty;
            return StepDecision::Terminate(Termination::Stagnated);
        }

        if info.flag_get {
            self.total += config.goal_bonus;
            self.total += f64::from(info.time) * config.time_bonus_factor;
            return StepDecision::Terminate(Termination::GoalReached);
        }

        StepDecision::Continue
    }

    /// Close the episode, adding the deferred jump bonus once.
    pub fn finish(self, termination: Termination, actions_executed: usize) -> FitnessReport {
        let fitness = self.total + self.jump_distance as f64 * self.config.jump_reward_factor;
        FitnessReport {
            fitness,
            steps: self.steps,
            actions_executed,
            max_x: self.max_x,
            jump_distance: self.jump_distance,
            termination,
        }
    }
}
