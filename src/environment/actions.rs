use crate::types::{Action, Buttons};
use serde::{Deserialize, Serialize};

const RIGHT_ONLY: [Buttons; 5] = [
    Buttons::NOOP,
    Buttons::new(false, true, false, false),
    Buttons::new(false, true, true, false),
    Buttons::new(false, true, false, true),
    Buttons::new(false, true, true, true),
];

const SIMPLE_MOVEMENT: [Buttons; 7] = [
    Buttons::NOOP,
    Buttons::new(false, true, false, false),
    Buttons::new(false, true, true, false),
    Buttons::new(false, true, false, true),
    Buttons::new(false, true, true, true),
    Buttons::new(false, false, true, false),
    Buttons::new(true, false, false, false),
];

/// Mapping from action identifiers to controller buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSet {
    /// NOOP, right, right+jump, right+run, right+jump+run
    #[default]
    RightOnly,
    /// RightOnly plus jump in place and left
    SimpleMovement,
}

impl ActionSet {
    fn table(&self) -> &'static [Buttons] {
        match self {
            ActionSet::RightOnly => &RIGHT_ONLY,
            ActionSet::SimpleMovement => &SIMPLE_MOVEMENT,
        }
    }

    pub fn len(&self) -> u32 {
        self.table().len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    pub fn buttons(&self, action: Action) -> Option<Buttons> {
        self.table().get(action as usize).copied()
    }
}
