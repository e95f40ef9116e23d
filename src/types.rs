use serde::{Deserialize, Serialize};

/// Identifier of one discrete action, always in `[0, action_count)`.
pub type Action = u32;

/// Info record reported by the environment after every step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Remaining attempts. A decrease means a life was lost.
    pub life: i32,
    /// Horizontal progress coordinate.
    pub x_pos: i64,
    pub coins: u32,
    pub score: u64,
    /// Remaining time budget.
    pub time: u32,
    /// Goal reached.
    pub flag_get: bool,
}

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepOutcome<O> {
    pub observation: O,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Controller buttons an action maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    /// Jump.
    pub a: bool,
    /// Run.
    pub b: bool,
}

impl Buttons {
    pub const NOOP: Buttons = Buttons { left: false, right: false, a: false, b: false };

    pub const fn new(left: bool, right: bool, a: bool, b: bool) -> Self {
        Self { left, right, a, b }
    }
}
