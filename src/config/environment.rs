use super::traits::{invalid, ConfigSection};
use crate::environment::ActionSet;
use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub action_set: ActionSet,
    pub level: CorridorLevel,
}

impl EnvironmentConfig {
    /// Size of the action space genomes draw from.
    pub fn action_count(&self) -> u32 {
        self.action_set.len()
    }
}

/// Half-open horizontal range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn contains(&self, x: i64) -> bool {
        self.start <= x && x < self.end
    }
}

/// Layout of the bundled corridor level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorLevel {
    /// Distance to the goal flag.
    pub length: i64,
    pub lives: i32,
    pub time_budget: u32,
    /// Frames per tick of the time budget.
    pub frames_per_tick: u32,
    pub jump_impulse: i64,
    pub coins: Vec<i64>,
    pub pits: Vec<Span>,
}

impl Default for CorridorLevel {
    fn default() -> Self {
        Self {
            length: 3200,
            lives: 3,
            time_budget: 400,
            frames_per_tick: 24,
            jump_impulse: 8,
            coins: vec![240, 600, 610, 620, 1480, 2250, 2260, 2900],
            pits: vec![
                Span { start: 420, end: 450 },
                Span { start: 1100, end: 1135 },
                Span { start: 1730, end: 1770 },
                Span { start: 2500, end: 2545 },
            ],
        }
    }
}

impl CorridorLevel {
    pub fn pit_at(&self, x: i64) -> bool {
        self.pits.iter().any(|pit| pit.contains(x))
    }
}

impl ConfigSection for EnvironmentConfig {
    fn section_name() -> &'static str {
        "environment"
    }

    fn validate(&self) -> Result<(), LevelSearchError> {
        let level = &self.level;
        if level.length <= 0 {
            return Err(invalid::<Self>("level length must be positive"));
        }
        if level.lives < 1 {
            return Err(invalid::<Self>("level must grant at least one life"));
        }
        if level.time_budget == 0 || level.frames_per_tick == 0 {
            return Err(invalid::<Self>(
                "time_budget and frames_per_tick must be positive",
            ));
        }
        if level.jump_impulse <= 0 {
            return Err(invalid::<Self>("jump_impulse must be positive"));
        }
        for pit in &level.pits {
            if pit.start >= pit.end || pit.start <= 0 || pit.end > level.length {
                return Err(invalid::<Self>(format!(
                    "pit [{}, {}) must be non-empty and lie strictly inside the level",
                    pit.start, pit.end
                )));
            }
        }
        Ok(())
    }
}
