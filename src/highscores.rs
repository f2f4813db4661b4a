//! High score leaderboard
//!
//! Persisted to LocalStorage as a plain JSON array of numbers, best first.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Top scores, sorted descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub scores: Vec<u64>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neonAsteroidsHS";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Check if a score qualifies for the leaderboard. Every finished run
    /// counts while the board has room, a zero score included.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().map(|&lowest| score > lowest).unwrap_or(true)
    }

    /// Add a finished run's score.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        // Ties keep the older score ahead
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        self.scores.insert(pos, score);
        self.scores.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Best score so far (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().copied()
    }

    /// Parse a stored list. Anything unreadable yields an empty board.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<u64>>(json) {
            Ok(mut scores) => {
                scores.sort_unstable_by(|a, b| b.cmp(a));
                scores.truncate(MAX_HIGH_SCORES);
                Self { scores }
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.scores.len());
                return scores;
            }
        } else {
            log::warn!("LocalStorage unavailable, high scores will not persist");
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &self.to_json()).is_err() {
                log::warn!("Failed to write high scores");
                return;
            }
            log::info!("High scores saved ({} entries)", self.scores.len());
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
