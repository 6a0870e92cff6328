//! High score table and its persistence
//!
//! The simulation only sees [`ScoreStore`]. Stores are best-effort: a store
//! that cannot read reports no history, one that cannot write drops the score.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Default file for the native score table
pub const DEFAULT_SCORE_FILE: &str = "top_scores.json";

/// Where finished rounds report their score
pub trait ScoreStore {
    /// Best score on record, if any
    fn best_score(&self) -> Option<u32>;
    /// Offer a final score
    fn record_score(&mut self, score: u32);
}

/// Problems reading or writing the score file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top scores, best first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    scores: Vec<u32>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().is_none_or(|&lowest| score > lowest)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.scores.iter().position(|&s| score > s);
        Some(rank.unwrap_or(self.scores.len()) + 1)
    }

    /// Insert a score, keeping the table sorted and trimmed.
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u32) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.scores.insert(rank - 1, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Drop anything that breaks the table's shape (hand-edited files)
    fn normalize(&mut self) {
        self.scores.retain(|&s| s > 0);
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(MAX_HIGH_SCORES);
    }
}

/// In-memory store, handy for tests and headless runs
impl ScoreStore for HighScores {
    fn best_score(&self) -> Option<u32> {
        self.top_score()
    }

    fn record_score(&mut self, score: u32) {
        self.add_score(score);
    }
}

/// Score table backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    /// Open the table at `path`. Missing or unreadable files start empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match Self::try_load(&path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores from {}", scores.scores.len(), path.display());
                scores
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Ignoring high scores in {}: {e}", path.display());
                HighScores::new()
            }
        };
        Self { path, scores }
    }

    pub fn try_load(path: &Path) -> Result<HighScores, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.normalize();
        Ok(scores)
    }

    pub fn try_save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn best_score(&self) -> Option<u32> {
        self.scores.top_score()
    }

    fn record_score(&mut self, score: u32) {
        let Some(rank) = self.scores.add_score(score) else {
            return;
        };
        match self.try_save() {
            Ok(()) => log::info!("Score {score} saved at rank {rank}"),
            Err(e) => log::warn!("Could not save high scores to {}: {e}", self.path.display()),
        }
    }
}
