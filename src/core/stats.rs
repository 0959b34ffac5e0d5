use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::index::score_index::ScoreIndexStats;

/// Roster summary for monitoring and the `stats` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStats {
    pub taken_at: DateTime<Utc>,

    // Store
    pub records: usize,
    pub enrolled_courses: usize,
    pub completed_courses: usize,

    // Sorted order
    pub sorted: bool,
    pub sort_stale: bool,
    pub sort_workers: usize,
    pub slowest_worker: Option<Duration>,

    // Score index
    pub score_index: ScoreIndexStats,
    pub score_index_stale: bool,
}

impl RosterStats {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
