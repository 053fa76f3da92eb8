//! Key-value persistence for the best score
//!
//! `get` returns an optional integer and `set` overwrites. [`BestScore`] layers
//! the "keep the maximum" rule on top and absorbs storage failures.

pub mod best_score;
pub mod store;

pub use best_score::{BEST_SCORE_KEY, BestScore};
pub use store::{JsonFileStore, MemoryStore, ScoreStore, StoreError};
