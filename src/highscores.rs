//! Client-side view of the shared leaderboard
//!
//! The server is the source of truth; this is the last state it reported,
//! refreshed on page load and after each game-over.

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries the server returns
pub const MAX_HIGH_SCORES: usize = 10;

/// Top scores, descending (ties keep the server's insertion order)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<u32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the cached entries with a fresh server response
    pub fn replace(&mut self, scores: Vec<u32>) {
        self.entries = scores;
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// The known highscore (0 when the board is empty)
    pub fn top_score(&self) -> u32 {
        self.entries.first().copied().unwrap_or(0)
    }

    /// Whether a finished run should be submitted to the server.
    /// The client decides; the server appends whatever it is sent.
    pub fn beats(&self, score: u32) -> bool {
        score > self.top_score()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_reports_zero() {
        let scores = HighScores::new();
        assert!(scores.is_empty());
        assert_eq!(scores.top_score(), 0);
        // Any positive score beats an empty board
        assert!(scores.beats(10));
        assert!(!scores.beats(0));
    }

    #[test]
    fn test_beats_requires_strictly_more() {
        let mut scores = HighScores::new();
        scores.replace(vec![150, 100, 90]);
        assert_eq!(scores.top_score(), 150);
        assert!(!scores.beats(150));
        assert!(scores.beats(160));
    }

    #[test]
    fn test_replace_truncates_to_ten() {
        let mut scores = HighScores::new();
        scores.replace((0..15).map(|i| 1000 - i).collect());
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), 1000);
    }
}
