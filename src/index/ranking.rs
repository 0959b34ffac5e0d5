use std::cmp::Ordering;
use serde::Serialize;
use crate::core::types::{Position, Score};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedEntry {
    pub score: Score,
    pub position: Position,
}

impl RankedEntry {
    pub fn new(score: Score, position: Position) -> Self {
        RankedEntry { score, position }
    }

    /// Score descending, then position ascending.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Entries for one course, best score first.
///
/// Equal scores are ordered by ascending position. Scores are never NaN; the
/// score index filters those out before building a ranking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(mut entries: Vec<RankedEntry>) -> Self {
        debug_assert!(entries.iter().all(|e| !e.score.is_nan()));
        entries.sort_by(RankedEntry::rank_cmp);
        Ranking { entries }
    }

    /// Entries with `score >= min_score`, best first.
    ///
    /// Binary-searches for the first entry below the threshold, so the cost is
    /// `O(log n)` plus the size of the returned prefix.
    pub fn at_least(&self, min_score: Score) -> &[RankedEntry] {
        let cut = self.entries.partition_point(|e| e.score >= min_score);
        &self.entries[..cut]
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
