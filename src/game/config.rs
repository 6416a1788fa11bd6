use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported field; keeps coordinates and cell counts well inside `i32`
pub const MAX_FIELD_SIZE: usize = 1024;

/// Errors raised when a configuration cannot describe a playable session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("field size must be positive")]
    ZeroFieldSize,
    #[error("field size {field_size} exceeds the maximum of {max}")]
    FieldTooLarge { field_size: usize, max: usize },
    #[error("initial snake length {length} must be at least 2")]
    SnakeTooShort { length: usize },
    #[error("initial snake length {length} does not fit on a {field_size}x{field_size} field")]
    SnakeTooLong { length: usize, field_size: usize },
    #[error("{name} interval must be positive")]
    ZeroInterval { name: &'static str },
    #[error("min interval {min_ms}ms is above the base interval {base_ms}ms")]
    FloorAboveBase { min_ms: u64, base_ms: u64 },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub field_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Tick interval at score 0, in milliseconds
    pub base_interval_ms: u64,
    /// Floor for the tick interval, in milliseconds
    pub min_interval_ms: u64,
    /// Interval reduction per point, in milliseconds
    pub speed_step_ms: u64,

    /// Start ticking immediately instead of waiting for a resume command
    pub autostart: bool,
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_size: 10,
            initial_snake_length: 2,
            base_interval_ms: 500,
            // Equal to the base interval, so the speed-up never kicks in
            // unless one of the two is tuned.
            min_interval_ms: 500,
            speed_step_ms: 50,
            autostart: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(field_size: usize) -> Self {
        Self {
            field_size,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Fail fast on values that cannot produce a playable session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_size == 0 {
            return Err(ConfigError::ZeroFieldSize);
        }
        if self.field_size > MAX_FIELD_SIZE {
            return Err(ConfigError::FieldTooLarge {
                field_size: self.field_size,
                max: MAX_FIELD_SIZE,
            });
        }
        if self.initial_snake_length < 2 {
            return Err(ConfigError::SnakeTooShort {
                length: self.initial_snake_length,
            });
        }
        // Head sits at the centre column, the body trails to the left wall.
        if self.initial_snake_length > self.field_size / 2 + 1 {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                field_size: self.field_size,
            });
        }
        if self.base_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "base" });
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "min" });
        }
        // The interval may only shrink as the score rises.
        if self.min_interval_ms > self.base_interval_ms {
            return Err(ConfigError::FloorAboveBase {
                min_ms: self.min_interval_ms,
                base_ms: self.base_interval_ms,
            });
        }
        Ok(())
    }

    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }

    /// `max(min, base - score * step)`
    pub fn interval_for_score(&self, score: u32) -> Duration {
        let reduction = self.speed_step_ms.saturating_mul(u64::from(score));
        let ms = self
            .base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.field_size, 10);
        assert_eq!(config.initial_snake_length, 2);
        assert_eq!(config.base_interval_ms, 500);
        assert_eq!(config.min_interval_ms, 500);
        assert_eq!(config.speed_step_ms, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.field_size, 15);
        assert_eq!(config.base_interval_ms, 500);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            GameConfig::new(0).validate(),
            Err(ConfigError::ZeroFieldSize)
        );

        let short = GameConfig {
            initial_snake_length: 1,
            ..Default::default()
        };
        assert_eq!(
            short.validate(),
            Err(ConfigError::SnakeTooShort { length: 1 })
        );

        // A 1x1 field cannot hold a two cell snake.
        assert_eq!(
            GameConfig::new(1).validate(),
            Err(ConfigError::SnakeTooLong {
                length: 2,
                field_size: 1
            })
        );

        let no_floor = GameConfig {
            min_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            no_floor.validate(),
            Err(ConfigError::ZeroInterval { name: "min" })
        );
    }

    #[test]
    fn test_field_size_is_capped() {
        assert!(GameConfig::new(MAX_FIELD_SIZE).validate().is_ok());
        assert_eq!(
            GameConfig::new(MAX_FIELD_SIZE + 1).validate(),
            Err(ConfigError::FieldTooLarge {
                field_size: MAX_FIELD_SIZE + 1,
                max: MAX_FIELD_SIZE
            })
        );
        // Would wrap negative as an i32 coordinate.
        assert!(matches!(
            GameConfig::new(i32::MAX as usize + 1).validate(),
            Err(ConfigError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn test_floor_above_base_is_rejected() {
        let config = GameConfig {
            base_interval_ms: 100,
            min_interval_ms: 500,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FloorAboveBase {
                min_ms: 500,
                base_ms: 100
            })
        );
    }

    #[test]
    fn test_interval_never_rises_with_score() {
        let config = GameConfig {
            base_interval_ms: 400,
            min_interval_ms: 120,
            speed_step_ms: 30,
            ..Default::default()
        };
        let mut previous = config.interval_for_score(0);
        assert_eq!(previous, config.base_interval());
        for score in 1..50 {
            let next = config.interval_for_score(score);
            assert!(next <= previous);
            previous = next;
        }
    }

    #[test]
    fn test_default_speed_up_is_inert() {
        let config = GameConfig::default();
        for score in [0, 1, 5, 100] {
            assert_eq!(config.interval_for_score(score), Duration::from_millis(500));
        }
    }

    #[test]
    fn test_interval_shrinks_to_floor() {
        let config = GameConfig {
            min_interval_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.interval_for_score(0), Duration::from_millis(500));
        assert_eq!(config.interval_for_score(2), Duration::from_millis(400));
        assert_eq!(config.interval_for_score(8), Duration::from_millis(100));
        assert_eq!(config.interval_for_score(50), Duration::from_millis(100));
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"field_size": 20, "min_interval_ms": 80}}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.field_size, 20);
        assert_eq!(config.min_interval_ms, 80);
        assert_eq!(config.base_interval_ms, 500);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }
}
