//! Engine configuration.

use crate::board::check_dimensions;
use crate::error::ConfigError;
use crate::types::{RandomizerKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Settings fixed for the lifetime of one engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub randomizer: RandomizerKind,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            randomizer: RandomizerKind::Uniform,
            seed: 1,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_randomizer(mut self, randomizer: RandomizerKind) -> Self {
        self.randomizer = randomizer;
        self
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_classic_playfield() {
        let config = EngineConfig::default();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.randomizer, RandomizerKind::Uniform);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tiny_boards_are_rejected() {
        let err = EngineConfig::default().with_size(3, 20).validate().unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooSmall { width: 3, .. }));
        assert!(EngineConfig::default().with_size(4, 4).validate().is_ok());
    }
}
