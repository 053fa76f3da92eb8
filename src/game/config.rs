use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::state::Cell;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("snake length {length} must be at least 2 and fit in half a row of width {width}")]
    SnakeLength { length: usize, width: usize },
    #[error("minimum tick {min_ms}ms exceeds initial tick {initial_ms}ms")]
    TickRange { initial_ms: u64, min_ms: u64 },
    #[error("minimum tick must be at least 1ms")]
    ZeroTick,
    #[error("cell {cell:?} lies outside the {width}x{height} grid")]
    CellOutOfGrid { cell: Cell, width: usize, height: usize },
    #[error("snake of length {length} is shorter than 2")]
    SnakeTooShort { length: usize },
    #[error("food at {food:?} sits on the snake")]
    FoodOnSnake { food: Cell },
}

/// Configuration for the minigame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of columns
    pub grid_width: usize,
    /// Number of rows
    pub grid_height: usize,
    /// Length of the snake at spawn
    pub initial_snake_length: usize,

    // Pacing
    /// Tick interval at the start of a run, in milliseconds
    pub initial_tick_ms: u64,
    /// Floor for the tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// How much each food shortens the interval, in milliseconds
    pub tick_step_ms: u64,

    /// Samples tried before food placement gives up and keeps the last one
    pub food_retry_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 12,
            grid_height: 18,
            initial_snake_length: 3,
            initial_tick_ms: 180,
            min_tick_ms: 60,
            tick_step_ms: 5,
            food_retry_limit: 200,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(8, 8)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 24)
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        // The spawn segment extends left from the centre column.
        if self.initial_snake_length < 2 || self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::SnakeLength {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }
        // Implies a non-zero initial tick as well.
        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::TickRange {
                initial_ms: self.initial_tick_ms,
                min_ms: self.min_tick_ms,
            });
        }
        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn tick_step(&self) -> Duration {
        Duration::from_millis(self.tick_step_ms)
    }
}
