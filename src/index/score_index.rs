use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::core::store::StoreSnapshot;
use crate::core::types::{CategoryKey, Position, Record, Score};
use crate::index::ranking::{RankedEntry, Ranking};

/// Counters from the last score index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreIndexStats {
    pub categories: usize,
    pub entries: usize,
    pub skipped: usize,  // NaN scores left out
}

/// Course -> students ranked by score, for threshold queries.
#[derive(Debug, Clone)]
pub struct ScoreIndex<C> {
    rankings: HashMap<C, Ranking>,
    stats: ScoreIndexStats,
}

impl<C> Default for ScoreIndex<C> {
    fn default() -> Self {
        ScoreIndex {
            rankings: HashMap::new(),
            stats: ScoreIndexStats::default(),
        }
    }
}

impl<C: CategoryKey> ScoreIndex<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every ranking from the snapshot's completed courses.
    ///
    /// The new rankings replace the old ones only once the scan is complete.
    pub fn build<K>(&mut self, snapshot: StoreSnapshot<'_, K, C>) -> ScoreIndexStats {
        let mut grouped: HashMap<C, Vec<RankedEntry>> = HashMap::new();
        let mut stats = ScoreIndexStats::default();

        for (position, record) in snapshot.enumerate() {
            for (course, &score) in record.completed() {
                if score.is_nan() {
                    warn!(%course, %position, "Skipping NaN score");
                    stats.skipped += 1;
                    continue;
                }
                grouped
                    .entry(course.clone())
                    .or_default()
                    .push(RankedEntry::new(score, position));
                stats.entries += 1;
            }
        }

        self.rankings = grouped
            .into_iter()
            .map(|(course, entries)| (course, Ranking::from_entries(entries)))
            .collect();
        stats.categories = self.rankings.len();
        self.stats = stats;

        debug!(
            categories = stats.categories,
            entries = stats.entries,
            "Built score index"
        );
        stats
    }

    /// Positions in `course` with `score >= min_score`, best first.
    ///
    /// An unknown course yields an empty result.
    pub fn query_positions<Q>(&self, course: &Q, min_score: Score) -> Vec<Position>
    where
        C: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.rankings
            .get(course)
            .map(|ranking| ranking.at_least(min_score).iter().map(|e| e.position).collect())
            .unwrap_or_default()
    }

    /// Same as `query_positions`, resolved against the snapshot the index was built from.
    pub fn query<'a, K, Q>(
        &self,
        snapshot: StoreSnapshot<'a, K, C>,
        course: &Q,
        min_score: Score,
    ) -> Vec<&'a Record<K, C>>
    where
        C: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        snapshot.resolve(self.query_positions(course, min_score))
    }

    pub fn ranking<Q>(&self, course: &Q) -> Option<&Ranking>
    where
        C: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.rankings.get(course)
    }

    pub fn categories(&self) -> impl Iterator<Item = &C> {
        self.rankings.keys()
    }

    pub fn stats(&self) -> ScoreIndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    pub fn clear(&mut self) {
        self.rankings.clear();
        self.stats = ScoreIndexStats::default();
    }
}
