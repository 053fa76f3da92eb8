//! Poké-Snake - the snake minigame from the Pokémon reference app
//!
//! This library provides:
//! - Grid simulation engine (game module)
//! - Single-owner tick timer (scheduler module)
//! - Best-score persistence (storage module)
//! - Terminal front end (input, render, metrics and modes modules)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scheduler;
pub mod starter;
pub mod storage;
