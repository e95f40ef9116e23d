use super::{ActionSet, Environment, EnvironmentFactory};
use crate::config::{ConfigSection, CorridorLevel, EnvironmentConfig};
use crate::types::{Action, Buttons, StepInfo, StepOutcome};
use anyhow::{anyhow, bail, Result};

const RUN_SPEED: i64 = 3;
const WALK_SPEED: i64 = 2;
const REWARD_CLIP: f64 = 15.0;
const DEATH_REWARD: f64 = -25.0;
const VIEW_BEHIND: i64 = 10;
const VIEW_AHEAD: i64 = 50;

/// Snapshot of the corridor returned as the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorridorFrame {
    pub x: i64,
    pub y: i64,
    pub vx: i64,
    pub frame: u64,
}

/// Deterministic side-scrolling corridor with pits, coins, a clock and a flag.
///
/// The native reward follows the emulator wrapper the fitness shaping was
/// tuned against: horizontal delta, minus one per clock tick, minus a death
/// penalty, clipped to `[-15, 15]`. Reaching the flag sets `flag_get` but not
/// `done`; `done` is raised once the last life is lost.
pub struct CorridorEnvironment {
    level: CorridorLevel,
    action_set: ActionSet,
    x: i64,
    y: i64,
    vx: i64,
    vy: i64,
    jump_held: bool,
    frame: u64,
    lives: i32,
    time: u32,
    coins: u32,
    score: u64,
    collected: Vec<bool>,
    flag_get: bool,
}

impl CorridorEnvironment {
    pub(crate) fn new(level: CorridorLevel, action_set: ActionSet) -> Self {
        let collected = vec![false; level.coins.len()];
        let lives = level.lives;
        let time = level.time_budget;
        Self {
            level,
            action_set,
            x: 0,
            y: 0,
            vx: 0,
            vy: 0,
            jump_held: false,
            frame: 0,
            lives,
            time,
            coins: 0,
            score: 0,
            collected,
            flag_get: false,
        }
    }

    fn grounded(&self) -> bool {
        self.y == 0 && self.vy == 0
    }

    fn frame_snapshot(&self) -> CorridorFrame {
        CorridorFrame {
            x: self.x,
            y: self.y,
            vx: self.vx,
            frame: self.frame,
        }
    }

    fn info(&self) -> StepInfo {
        StepInfo {
            life: self.lives,
            x_pos: self.x,
            coins: self.coins,
            score: self.score,
            time: self.time,
            flag_get: self.flag_get,
        }
    }

    fn respawn(&mut self) {
        self.x = 0;
        self.y = 0;
        self.vx = 0;
        self.vy = 0;
        self.jump_held = false;
        self.time = self.level.time_budget;
    }

    fn advance(&mut self, buttons: Buttons) -> f64 {
        let prev_x = self.x;

        let target = match (buttons.left, buttons.right) {
            (false, true) if buttons.b => RUN_SPEED,
            (false, true) => WALK_SPEED,
            (true, false) => -WALK_SPEED,
            _ => 0,
        };
        self.vx += (target - self.vx).signum();
        self.x = (self.x + self.vx).clamp(0, self.level.length);

        if buttons.a && !self.jump_held && self.grounded() {
            self.vy = self.level.jump_impulse;
        }
        self.jump_held = buttons.a;
        if !self.grounded() {
            self.y += self.vy;
            self.vy -= 1;
            if self.y <= 0 {
                self.y = 0;
                self.vy = 0;
            }
        }

        for (coin, taken) in self.level.coins.iter().zip(self.collected.iter_mut()) {
            if !*taken && prev_x.min(self.x) <= *coin && *coin <= prev_x.max(self.x) {
                *taken = true;
                self.coins += 1;
                self.score += 200;
            }
        }

        let mut clock = 0.0;
        self.frame += 1;
        if self.frame % u64::from(self.level.frames_per_tick) == 0 {
            self.time = self.time.saturating_sub(1);
            clock = -1.0;
        }

        if self.x >= self.level.length {
            self.flag_get = true;
        }

        let fell = self.grounded() && self.level.pit_at(self.x);
        if fell || self.time == 0 {
            self.lives -= 1;
            if self.lives > 0 {
                self.respawn();
            }
            return (clock + DEATH_REWARD).clamp(-REWARD_CLIP, REWARD_CLIP);
        }

        ((self.x - prev_x) as f64 + clock).clamp(-REWARD_CLIP, REWARD_CLIP)
    }

    fn draw(&self) -> String {
        let mut line = String::new();
        for column in (self.x - VIEW_BEHIND)..(self.x + VIEW_AHEAD) {
            let glyph = if column == self.x {
                if self.grounded() { 'M' } else { '^' }
            } else if column >= self.level.length {
                '|'
            } else if column < 0 || self.level.pit_at(column) {
                ' '
            } else if self
                .level
                .coins
                .iter()
                .zip(&self.collected)
                .any(|(coin, taken)| *coin == column && !*taken)
            {
                'o'
            } else {
                '_'
            };
            line.push(glyph);
        }
        line
    }
}

impl Environment for CorridorEnvironment {
    type Observation = CorridorFrame;

    fn reset(&mut self) -> Result<CorridorFrame> {
        *self = CorridorEnvironment::new(self.level.clone(), self.action_set);
        Ok(self.frame_snapshot())
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome<CorridorFrame>> {
        if self.lives <= 0 {
            bail!("step called after the episode finished");
        }
        let buttons = self
            .action_set
            .buttons(action)
            .ok_or_else(|| anyhow!("action {action} is outside {:?}", self.action_set))?;

        let reward = if self.flag_get { 0.0 } else { self.advance(buttons) };

        Ok(StepOutcome {
            observation: self.frame_snapshot(),
            reward,
            done: self.lives <= 0,
            info: self.info(),
        })
    }

    fn airborne(&self) -> bool {
        !self.grounded()
    }

    fn render(&mut self) -> Result<()> {
        println!(
            "{} x={:>5} lives={} coins={:>2} time={:>3}",
            self.draw(),
            self.x,
            self.lives,
            self.coins,
            self.time
        );
        Ok(())
    }
}

/// Builds corridor instances sharing one level layout.
#[derive(Debug, Clone)]
pub struct CorridorFactory {
    level: CorridorLevel,
    action_set: ActionSet,
}

impl CorridorFactory {
    /// Rejects layouts the physics cannot run, such as a zero tick length.
    pub fn new(level: CorridorLevel, action_set: ActionSet) -> crate::error::Result<Self> {
        let config = EnvironmentConfig { action_set, level };
        config.validate()?;
        Ok(Self {
            level: config.level,
            action_set: config.action_set,
        })
    }
}

impl EnvironmentFactory for CorridorFactory {
    type Env = CorridorEnvironment;

    fn create(&self) -> Result<CorridorEnvironment> {
        Ok(CorridorEnvironment::new(self.level.clone(), self.action_set))
    }
}
