use crate::error::LevelSearchError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), LevelSearchError>;
}

/// Shorthand for building a configuration error scoped to a section.
pub(crate) fn invalid<S: ConfigSection>(message: impl AsRef<str>) -> LevelSearchError {
    LevelSearchError::Configuration(format!("[{}] {}", S::section_name(), message.as_ref()))
}
