use std::borrow::Borrow;
use std::hash::Hash;
use std::path::Path;
use std::str::FromStr;
use chrono::Utc;
use tracing::{info, warn};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::RosterStats;
use crate::core::store::RecordStore;
use crate::core::types::{CategoryKey, Position, Record, RollKey, Score};
use crate::index::score_index::{ScoreIndex, ScoreIndexStats};
use crate::ingest::csv;
use crate::parallel::observer::{LogObserver, SortObserver};
use crate::parallel::sorter::{ParallelOrderIndex, SortOutcome};

/// Rows accepted and rejected by a CSV load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// A student roster: the record store plus its two derived views.
///
/// Neither view follows store changes on its own. Appends mark them stale and
/// the caller rebuilds with `sort_by_roll` / `build_score_index`.
pub struct Roster<K, C> {
    config: Config,

    store: RecordStore<K, C>,

    order: ParallelOrderIndex,   // sorted by roll
    scores: ScoreIndex<C>,       // course -> ranked scores

    observer: Box<dyn SortObserver>,
    order_stale: bool,
    scores_built: bool,
    scores_stale: bool,
}

impl<K: RollKey, C: CategoryKey> Roster<K, C> {
    pub fn new(config: Config) -> Self {
        Roster {
            config,
            store: RecordStore::new(),
            order: ParallelOrderIndex::new(),
            scores: ScoreIndex::new(),
            observer: Box::new(LogObserver),
            order_stale: false,
            scores_built: false,
            scores_stale: false,
        }
    }

    pub fn with_observer(mut self, observer: impl SortObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RecordStore<K, C> {
        &self.store
    }

    pub fn add_record(&mut self, record: Record<K, C>) -> Position {
        self.mark_stale();
        self.store.append(record)
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record<K, C>>) {
        self.mark_stale();
        self.store.extend(records);
    }

    pub fn len(&self) -> usize {
        self.store.size()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> std::slice::Iter<'_, Record<K, C>> {
        self.store.iter()
    }

    /// Rebuilds the sorted order. `None` uses the configured worker count.
    pub fn sort_by_roll(&mut self, workers: Option<usize>) -> Result<SortOutcome> {
        let workers = workers.unwrap_or(self.config.worker_count);
        let outcome = self
            .order
            .build(self.store.snapshot(), workers, self.observer.as_ref())?;
        self.order_stale = false;
        Ok(outcome)
    }

    pub fn is_sorted(&self) -> bool {
        self.order.is_built()
    }

    pub fn order(&self) -> &ParallelOrderIndex {
        &self.order
    }

    /// Records by ascending roll. Reverse with `.rev()`.
    pub fn sorted(&self) -> Result<impl DoubleEndedIterator<Item = &Record<K, C>>> {
        if !self.order.is_built() {
            return Err(Error::invalid_state("Sorted order is empty. Sort first."));
        }
        if self.order_stale {
            warn!(
                sorted = self.order.len(),
                records = self.store.size(),
                "Sorted order predates the latest records"
            );
        }
        Ok(self.order.iter(self.store.snapshot()))
    }

    pub fn build_score_index(&mut self) -> ScoreIndexStats {
        let stats = self.scores.build(self.store.snapshot());
        self.scores_built = true;
        self.scores_stale = false;
        stats
    }

    pub fn score_index(&self) -> &ScoreIndex<C> {
        &self.scores
    }

    /// Students in `course` scoring at least `min_score` (or the configured
    /// default), best first.
    pub fn query<Q>(&self, course: &Q, min_score: Option<Score>) -> Vec<&Record<K, C>>
    where
        C: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.scores_stale {
            warn!("Score index predates the latest records");
        }
        let min_score = min_score.unwrap_or(self.config.default_min_score);
        self.scores.query(self.store.snapshot(), course, min_score)
    }

    pub fn records_where<P>(&self, predicate: P) -> Vec<&Record<K, C>>
    where
        P: Fn(&Record<K, C>) -> bool,
    {
        self.store.iter().filter(|r| predicate(r)).collect()
    }

    /// Drops every record and both views.
    pub fn reset(&mut self) {
        self.store.reset();
        self.order.clear();
        self.scores.clear();
        self.order_stale = false;
        self.scores_built = false;
        self.scores_stale = false;
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            taken_at: Utc::now(),
            records: self.store.size(),
            enrolled_courses: self.store.iter().map(|r| r.enrolled().len()).sum(),
            completed_courses: self.store.iter().map(|r| r.completed().len()).sum(),
            sorted: self.order.is_built(),
            sort_stale: self.order_stale,
            sort_workers: self.order.segments().len(),
            slowest_worker: self.order.timings().iter().max().copied(),
            score_index: self.scores.stats(),
            score_index_stale: self.scores_stale,
        }
    }

    fn mark_stale(&mut self) {
        self.order_stale = self.order.is_built();
        // an index built over ungraded records is empty but still a build
        self.scores_stale = self.scores_built;
    }
}

impl<K, C> Roster<K, C>
where
    K: RollKey + FromStr + Send,
    C: CategoryKey + FromStr + Send,
{
    /// Appends every valid row of a CSV file. Bad rows are logged and skipped;
    /// records already in the roster are untouched either way.
    pub fn load_csv(&mut self, path: &Path) -> Result<LoadSummary> {
        let parsed = csv::load::<K, C>(path, self.config.ingest_batch_size)?;
        for row in &parsed.rejected {
            warn!(
                line = row.line_number,
                reason = %row.reason,
                "Skipping invalid CSV line: '{}'",
                row.line
            );
        }

        let summary = LoadSummary {
            loaded: parsed.records.len(),
            skipped: parsed.rejected.len(),
        };
        self.extend(parsed.records);
        info!(
            loaded = summary.loaded,
            skipped = summary.skipped,
            total = self.len(),
            "Loaded {}",
            path.display()
        );
        Ok(summary)
    }

    /// Appends `records` to a CSV file in the roster's row format.
    pub fn append_csv<'a, I>(&self, path: &Path, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Record<K, C>>,
        K: 'a,
        C: 'a,
    {
        csv::append(path, records, self.config.score_precision)
    }

    /// Writes the whole roster, replacing the file.
    pub fn save_csv(&self, path: &Path) -> Result<usize> {
        csv::write_all(path, self.store.iter(), self.config.score_precision)
    }
}

impl<K: RollKey> Roster<K, String> {
    /// Students enrolled in or done with `code`, ignoring case.
    pub fn students_in_course(&self, code: &str) -> Vec<&Record<K, String>> {
        self.records_where(|r| {
            r.enrolled().iter().any(|c| c.eq_ignore_ascii_case(code))
                || r.completed().keys().any(|c| c.eq_ignore_ascii_case(code))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::parallel::observer::NoopObserver;

    fn roster() -> Roster<u32, String> {
        let config = Config {
            worker_count: 2,
            ..Config::default()
        };
        let mut roster = Roster::new(config).with_observer(NoopObserver);
        for (roll, score) in [(50, 7.0), (10, 9.5), (30, 9.0), (20, 6.0), (40, 8.0)] {
            roster.add_record(
                Record::new(format!("student{}", roll), roll, "cse", 2022)
                    .with_enrolled(["OOPD".to_string()])
                    .with_completed([("ml".to_string(), score)]),
            );
        }
        roster
    }

    #[test]
    fn sorted_requires_a_sort_first() {
        let roster = roster();
        let err = roster.sorted().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn sort_then_iterate_both_ways() {
        let mut roster = roster();
        roster.sort_by_roll(None).unwrap();

        let forward: Vec<u32> = roster.sorted().unwrap().map(|r| *r.roll()).collect();
        let backward: Vec<u32> = roster.sorted().unwrap().rev().map(|r| *r.roll()).collect();
        assert_eq!(forward, vec![10, 20, 30, 40, 50]);
        assert_eq!(backward, vec![50, 40, 30, 20, 10]);

        // insertion order is untouched
        let original: Vec<u32> = roster.records().map(|r| *r.roll()).collect();
        assert_eq!(original, vec![50, 10, 30, 20, 40]);
    }

    #[test]
    fn query_uses_the_default_threshold() {
        let mut roster = roster();
        roster.build_score_index();

        let names: Vec<&str> = roster.query("ml", None).into_iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["student10", "student30"]);
        assert_eq!(roster.query("ml", Some(7.5)).len(), 3);
    }

    #[test]
    fn appends_mark_views_stale() {
        let mut roster = roster();
        roster.sort_by_roll(Some(3)).unwrap();
        roster.build_score_index();
        assert!(!roster.stats().sort_stale);

        roster.add_record(Record::new("late", 5, "ece", 2024));
        let stats = roster.stats();
        assert!(stats.sort_stale);
        assert!(stats.score_index_stale);

        roster.sort_by_roll(None).unwrap();
        assert_eq!(roster.sorted().unwrap().next().map(|r| *r.roll()), Some(5));
    }

    #[test]
    fn empty_score_index_still_goes_stale() {
        let mut roster: Roster<u32, String> = Roster::new(Config::default()).with_observer(NoopObserver);
        roster.add_record(Record::new("ungraded", 1, "cse", 2022));
        roster.build_score_index();
        assert!(roster.score_index().is_empty());
        assert!(!roster.stats().score_index_stale);

        roster.add_record(Record::new("graded", 2, "cse", 2022).with_completed([("ml".to_string(), 9.5)]));

        assert!(roster.stats().score_index_stale);
        assert!(roster.query("ml", Some(9.0)).is_empty());
        roster.build_score_index();
        assert_eq!(roster.query("ml", Some(9.0)).len(), 1);
        assert!(!roster.stats().score_index_stale);
    }

    #[test]
    fn reset_clears_everything() {
        let mut roster = roster();
        roster.sort_by_roll(None).unwrap();
        roster.build_score_index();

        roster.reset();

        assert!(roster.is_empty());
        assert!(!roster.is_sorted());
        assert!(roster.score_index().is_empty());
        assert!(roster.query("ml", Some(0.0)).is_empty());

        roster.add_record(Record::new("fresh", 1, "cse", 2024));
        let stats = roster.stats();
        assert!(!stats.sort_stale);
        assert!(!stats.score_index_stale);
    }

    #[test]
    fn course_filter_ignores_case() {
        let roster = roster();
        assert_eq!(roster.students_in_course("oopd").len(), 5);
        assert_eq!(roster.students_in_course("ML").len(), 5);
        assert!(roster.students_in_course("dbms").is_empty());
    }

    #[test]
    fn stats_report_the_last_sort() {
        let mut roster = roster();
        roster.sort_by_roll(Some(4)).unwrap();
        let stats = roster.stats();

        assert_eq!(stats.records, 5);
        assert_eq!(stats.sort_workers, 4);
        assert!(stats.slowest_worker.is_some());
        assert_eq!(stats.completed_courses, 5);
        assert_eq!(stats.enrolled_courses, 5);
    }
}
