//! Leaderboard of the best runs
//!
//! Keeps the top 10 entries sorted by descending score and persists them as
//! JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::RunSummary;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Errors raised while recording or persisting the leaderboard
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed leaderboard: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("player name must not be blank")]
    EmptyName,
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
    /// Altitude reached when the run ended
    pub altitude: f32,
    /// Run length in seconds
    pub time_secs: f32,
    /// Display date supplied by the caller
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: i64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insertion_index(score) + 1)
    }

    /// Insert an entry, keeping the board sorted and capped.
    /// Returns the rank achieved or None if it didn't qualify.
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties keep the earlier entry ahead
        let index = self.insertion_index(entry.score);
        self.entries.insert(index, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(index + 1)
    }

    /// Record a finished run under `name`
    pub fn submit(
        &mut self,
        name: &str,
        summary: &RunSummary,
        date: &str,
    ) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }

        let rank = self.add_entry(LeaderboardEntry {
            name: name.to_string(),
            score: summary.score,
            altitude: summary.altitude,
            time_secs: summary.elapsed,
            date: date.to_string(),
        });
        match rank {
            Some(rank) => log::info!("{} placed #{} with {} points", name, rank, summary.score),
            None => log::info!("{} scored {} (not a top score)", name, summary.score),
        }
        Ok(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a stored board, restoring the sort order and the size cap
    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let mut board: Self = serde_json::from_str(json)?;
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(MAX_ENTRIES);
        Ok(board)
    }

    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        let json = std::fs::read_to_string(path)?;
        let board = Self::from_json(&json)?;
        log::info!("Loaded {} leaderboard entries", board.entries.len());
        Ok(board)
    }

    /// Load the board, starting fresh if the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(board) => board,
            Err(LeaderboardError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding leaderboard: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    fn insertion_index(&self, score: i64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DefeatReason, Outcome};

    fn entry(name: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            altitude: 1000.0,
            time_secs: 30.0,
            date: "2026-01-01".to_string(),
        }
    }

    #[test]
    fn test_sorted_insert() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_entry(entry("a", 100)), Some(1));
        assert_eq!(board.add_entry(entry("b", 300)), Some(1));
        assert_eq!(board.add_entry(entry("c", 200)), Some(2));
        // Ties rank below the existing score
        assert_eq!(board.add_entry(entry("d", 200)), Some(3));

        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a"]);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut board = Leaderboard::new();
        for i in 1..=12 {
            board.add_entry(entry(&format!("p{i}"), i * 10));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(30));

        assert!(!board.qualifies(30));
        assert_eq!(board.potential_rank(30), None);
        assert_eq!(board.add_entry(entry("late", 5)), None);
        assert_eq!(board.potential_rank(35), Some(10));
        assert_eq!(board.potential_rank(1000), Some(1));
    }

    #[test]
    fn test_negative_scores_keep_order() {
        let mut board = Leaderboard::new();
        let fell = Outcome::Defeat(DefeatReason::Fell);
        board.submit("deep", &RunSummary::new(fell, -300.0, 200.0), "d").unwrap();
        board.submit("shallow", &RunSummary::new(fell, -250.0, 60.0), "d").unwrap();
        let scores: Vec<_> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, [-200, -285]);
        assert_eq!(board.entries[0].name, "shallow");
    }

    #[test]
    fn test_submit_rejects_blank_name() {
        let mut board = Leaderboard::new();
        let summary = RunSummary::new(Outcome::Defeat(DefeatReason::Fell), 100.0, 10.0);
        assert!(matches!(
            board.submit("   ", &summary, "today"),
            Err(LeaderboardError::EmptyName)
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn test_submit_records_summary() {
        let mut board = Leaderboard::new();
        let summary = RunSummary::new(Outcome::Victory, 4900.0, 42.0);
        let rank = board.submit("  Etna ", &summary, "2026-03-04").unwrap();
        assert_eq!(rank, Some(1));

        let e = &board.entries[0];
        assert_eq!(e.name, "Etna");
        assert_eq!(e.score, summary.score);
        assert_eq!(e.altitude, 4900.0);
        assert_eq!(e.time_secs, 42.0);
        assert_eq!(e.date, "2026-03-04");
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut board = Leaderboard::new();
        for (name, score) in [("x", 500), ("y", 900), ("z", 700)] {
            board.add_entry(entry(name, score));
        }
        let json = board.to_json().unwrap();
        let restored = Leaderboard::from_json(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_from_json_normalizes() {
        let entries: Vec<_> = (0..15).map(|i| entry("n", i)).collect();
        let json = serde_json::to_string(&Leaderboard { entries }).unwrap();
        let board = Leaderboard::from_json(&json).unwrap();
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(14));
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Leaderboard::from_json("not json"),
            Err(LeaderboardError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "magma-rise-leaderboard-{}.json",
            std::process::id()
        ));
        let mut board = Leaderboard::new();
        board.add_entry(entry("saved", 1234));
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded, board);
        std::fs::remove_file(&path).unwrap();

        // Missing file falls back to an empty board
        assert!(Leaderboard::load_or_default(&path).is_empty());
    }
}
