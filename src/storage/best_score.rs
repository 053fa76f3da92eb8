use tracing::{info, warn};

use super::store::ScoreStore;

/// Fixed key the best score lives under
pub const BEST_SCORE_KEY: &str = "@pokemon_snake_best_score";

/// Best score across runs, cached in memory and written through to a store
pub struct BestScore<S> {
    store: S,
    best: u32,
    writes_enabled: bool,
}

impl<S: ScoreStore> BestScore<S> {
    /// Read the stored best. A failed read counts as "no best score".
    pub fn load(store: S) -> Self {
        let best = match store.get(BEST_SCORE_KEY) {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "failed to load best score; starting from zero");
                0
            }
        };

        Self {
            store,
            best,
            writes_enabled: true,
        }
    }

    pub fn get(&self) -> u32 {
        self.best
    }

    /// Whether the store is still accepting writes this session
    pub fn is_tracking(&self) -> bool {
        self.writes_enabled
    }

    /// Record a finished run. Returns true when `score` beat the previous best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        if !self.writes_enabled {
            return true;
        }

        match self.store.set(BEST_SCORE_KEY, score) {
            Ok(()) => info!(best = score, "new best score saved"),
            Err(err) => {
                warn!(error = %err, "failed to save best score; tracking disabled for this session");
                self.writes_enabled = false;
            }
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
