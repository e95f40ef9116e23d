use crate::types::{Action, StepOutcome};
use anyhow::Result;

/// A stateful simulation stepped one frame at a time.
///
/// Implementations are consumed single-threaded: each evaluation owns its
/// instance from `reset` until `close`, so no `Send`/`Sync` bound is needed.
pub trait Environment {
    type Observation;

    /// Start a new episode
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Advance one frame while holding `action`
    fn step(&mut self, action: Action) -> Result<StepOutcome<Self::Observation>>;

    /// Whether the controlled character is currently off the ground
    fn airborne(&self) -> bool;

    /// Draw the current frame. Only playback calls this.
    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release any resources held by the instance
    fn close(&mut self) {}
}

/// Builds a fresh, independent environment for every evaluation.
pub trait EnvironmentFactory: Send + Sync {
    type Env: Environment;

    fn create(&self) -> Result<Self::Env>;
}
