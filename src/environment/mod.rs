//! Environment oracle contract and the bundled corridor level.

pub mod actions;
pub mod corridor;
pub mod traits;

pub use actions::ActionSet;
pub use corridor::{CorridorEnvironment, CorridorFactory, CorridorFrame};
pub use traits::{Environment, EnvironmentFactory};
