//! Grid simulation for Poké-Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine owns its state; callers drive it with `set_direction`, `tick` and `reset`.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickOutcome};
pub use state::{Cell, CollisionType, Grid, Phase, Snake};
