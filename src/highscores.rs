//! High score record
//!
//! One flat record: the best score ever reached and the score of the most
//! recent run. Stored as JSON under `consts::RECORD_KEY`.

use serde::{Deserialize, Serialize};

/// Persisted score record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersistedRecord {
    #[serde(rename = "highestScore")]
    pub highest_score: u64,
    #[serde(rename = "score")]
    pub last_score: u64,
}

impl PersistedRecord {
    /// Fold a finished (or paused) run's score into the prior record.
    /// The best score never goes down.
    pub fn record(prior: Option<Self>, score: u64) -> Self {
        let best = prior.map(|r| r.highest_score).unwrap_or(0);
        Self {
            highest_score: best.max(score),
            last_score: score,
        }
    }

    /// Check if a score would set a new best
    pub fn is_new_best(&self, score: u64) -> bool {
        score > self.highest_score
    }
}
