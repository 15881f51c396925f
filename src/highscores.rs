//! High score leaderboard
//!
//! Persisted as a plain JSON array of `{score, date}`, strictly descending by
//! score and capped at a configurable length.

use serde::{Deserialize, Serialize};

/// Default number of high scores to keep
pub const DEFAULT_MAX_ENTRIES: usize = 4;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    /// Player's score
    pub score: u64,
    /// ISO-8601 calendar date the score was achieved
    pub date: String,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighscoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Restore the list invariants on data read back from storage
    pub fn normalized(mut self, max_entries: usize) -> Self {
        self.settle(max_entries);
        self
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, max_entries: usize) -> bool {
        if score == 0 || max_entries == 0 {
            return false;
        }
        if self.entries.iter().any(|e| e.score == score) {
            return false;
        }
        if self.entries.len() < max_entries {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Append a score, re-sort, and truncate
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't make the list.
    pub fn add_score(&mut self, score: u64, date: String, max_entries: usize) -> Option<usize> {
        if !self.qualifies(score, max_entries) {
            return None;
        }
        self.entries.push(HighscoreEntry { score, date });
        self.settle(max_entries);
        self.entries.iter().position(|e| e.score == score).map(|i| i + 1)
    }

    /// Sort descending, drop duplicate scores (keeping the earlier entry), trim
    fn settle(&mut self, max_entries: usize) {
        // Stable sort keeps insertion order among equal scores
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.dedup_by_key(|e| e.score);
        self.entries.truncate(max_entries);
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
