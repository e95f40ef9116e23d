#![allow(dead_code)]

use anyhow::{bail, Result};
use levelsearch::data::{Checkpoint, CheckpointLabel, CheckpointStore};
use levelsearch::engines::generation::{GenerationSummary, ProgressCallback};
use levelsearch::environment::{Environment, EnvironmentFactory};
use levelsearch::types::{Action, StepInfo, StepOutcome};
use levelsearch::LevelSearchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Scripted oracle whose behaviour is fixed by step number and action.
#[derive(Clone, Default)]
pub struct ScriptedFactory {
    /// 1-based step that reports `done`.
    pub done_at: Option<usize>,
    /// 1-based step on which a life is lost.
    pub life_lost_at: Option<usize>,
    /// Stepping with this action fails.
    pub fail_on_action: Option<Action>,
    /// Reward equals the action id instead of a constant 1.
    pub reward_per_action: bool,
    /// Horizontal advance per step, multiplied by the action id.
    pub advance_per_action: i64,
    /// 1-based step whose reward is NaN.
    pub nan_reward_at: Option<usize>,
    /// Sleep per step, scaled by the action id, to shuffle completion order.
    pub jitter: bool,
    pub steps: Arc<AtomicUsize>,
    pub instances: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn total_steps(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn total_instances(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }
}

pub struct ScriptedEnvironment {
    script: ScriptedFactory,
    step: usize,
    x: i64,
}

impl Environment for ScriptedEnvironment {
    type Observation = usize;

    fn reset(&mut self) -> Result<usize> {
        self.step = 0;
        self.x = 0;
        Ok(0)
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome<usize>> {
        if self.script.fail_on_action == Some(action) {
            bail!("emulator crashed on action {action}");
        }
        self.step += 1;
        self.script.steps.fetch_add(1, Ordering::SeqCst);
        if self.script.jitter {
            thread::sleep(Duration::from_millis(u64::from(action % 4)));
        }

        self.x += self.script.advance_per_action * i64::from(action);
        let lost = self.script.life_lost_at.is_some_and(|at| self.step >= at);

        let reward = if self.script.nan_reward_at == Some(self.step) {
            f64::NAN
        } else if self.script.reward_per_action {
            f64::from(action)
        } else {
            1.0
        };

        Ok(StepOutcome {
            observation: self.step,
            reward,
            done: self.script.done_at == Some(self.step),
            info: StepInfo {
                life: if lost { 2 } else { 3 },
                x_pos: self.x,
                coins: 0,
                score: 0,
                time: 300,
                flag_get: false,
            },
        })
    }

    fn airborne(&self) -> bool {
        false
    }
}

impl EnvironmentFactory for ScriptedFactory {
    type Env = ScriptedEnvironment;

    fn create(&self) -> Result<ScriptedEnvironment> {
        self.instances.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedEnvironment {
            script: self.clone(),
            step: 0,
            x: 0,
        })
    }
}

/// Keeps checkpoints in memory and records every save in order.
#[derive(Default)]
pub struct RecordingStore {
    pub saved: Vec<CheckpointLabel>,
    pub contents: HashMap<CheckpointLabel, Checkpoint>,
    pub fail: bool,
}

impl CheckpointStore for RecordingStore {
    fn save(&mut self, label: CheckpointLabel, checkpoint: &Checkpoint) -> levelsearch::Result<()> {
        if self.fail {
            return Err(LevelSearchError::Checkpoint {
                path: format!("memory://{label}").into(),
                message: "disk full".to_string(),
            });
        }
        self.saved.push(label);
        self.contents.insert(label, checkpoint.clone());
        Ok(())
    }

    fn load(&self, label: CheckpointLabel) -> levelsearch::Result<Checkpoint> {
        self.contents.get(&label).cloned().ok_or_else(|| LevelSearchError::Checkpoint {
            path: format!("memory://{label}").into(),
            message: "not saved".to_string(),
        })
    }
}

/// Collects generation summaries for later assertions.
#[derive(Default)]
pub struct CollectingCallback {
    pub started: Vec<usize>,
    pub summaries: Vec<GenerationSummary>,
    pub checkpoints: Vec<(CheckpointLabel, bool)>,
}

impl ProgressCallback for CollectingCallback {
    fn on_generation_start(&mut self, generation: usize) {
        self.started.push(generation);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        self.summaries.push(summary.clone());
    }

    fn on_checkpoint(&mut self, label: CheckpointLabel, saved: bool) {
        self.checkpoints.push((label, saved));
    }
}

impl ProgressCallback for &mut CollectingCallback {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        (**self).on_generation_complete(summary);
    }

    fn on_checkpoint(&mut self, label: CheckpointLabel, saved: bool) {
        (**self).on_checkpoint(label, saved);
    }
}
