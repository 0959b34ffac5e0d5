use std::cmp::Ordering;
use std::time::{Duration, Instant};
use serde::Serialize;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::store::StoreSnapshot;
use crate::core::types::{Position, Record, RollKey};
use crate::parallel::merger::SegmentMerger;
use crate::parallel::observer::SortObserver;
use crate::parallel::partition::{clamp_workers, partition, Segment};

/// Result of a sort build over a non-empty store.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub requested_workers: usize,
    pub workers: usize,
    pub segments: Vec<Segment>,
    pub timings: Vec<Duration>,  // one per worker, same order as segments
    pub merge_time: Duration,
}

impl SortReport {
    pub fn slowest_worker(&self) -> Option<Duration> {
        self.timings.iter().max().copied()
    }
}

#[derive(Debug, Clone)]
pub enum SortOutcome {
    /// The store was empty; the index is left empty.
    Empty,
    Sorted(SortReport),
}

impl SortOutcome {
    pub fn report(&self) -> Option<&SortReport> {
        match self {
            SortOutcome::Empty => None,
            SortOutcome::Sorted(report) => Some(report),
        }
    }
}

/// Sorted view over a store, held as a permutation of positions.
///
/// Built by sorting disjoint segments of the identity permutation on scoped
/// worker threads, then folding the sorted segments together on the calling
/// thread.
#[derive(Debug, Default, Clone)]
pub struct ParallelOrderIndex {
    permutation: Vec<Position>,
    segments: Vec<Segment>,
    timings: Vec<Duration>,
}

impl ParallelOrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts by roll ascending.
    pub fn build<K, C>(
        &mut self,
        snapshot: StoreSnapshot<'_, K, C>,
        requested_workers: usize,
        observer: &dyn SortObserver,
    ) -> Result<SortOutcome>
    where
        K: RollKey,
        C: Sync,
    {
        self.build_by(snapshot, requested_workers, observer, |a, b| a.roll().cmp(b.roll()))
    }

    /// Sorts with an arbitrary record comparator.
    ///
    /// On error the previous permutation is kept.
    pub fn build_by<K, C, F>(
        &mut self,
        snapshot: StoreSnapshot<'_, K, C>,
        requested_workers: usize,
        observer: &dyn SortObserver,
        compare: F,
    ) -> Result<SortOutcome>
    where
        K: Sync,
        C: Sync,
        F: Fn(&Record<K, C>, &Record<K, C>) -> Ordering + Sync,
    {
        let n = snapshot.len();
        if n == 0 {
            self.clear();
            observer.on_empty();
            return Ok(SortOutcome::Empty);
        }

        let workers = clamp_workers(requested_workers, n);
        let segments = partition(n, workers);
        observer.on_partition(requested_workers, workers, &segments);

        let records = snapshot.records();
        let by_position = |a: &Position, b: &Position| compare(&records[a.0], &records[b.0]);

        let mut working: Vec<Position> = (0..n).map(Position).collect();
        let timings = sort_segments(&mut working, &segments, &by_position)?;
        for (worker, (segment, elapsed)) in segments.iter().zip(&timings).enumerate() {
            observer.on_worker_finished(worker, *segment, *elapsed);
        }

        let merge_started = Instant::now();
        SegmentMerger::with_capacity(n).merge_segments(&mut working, &segments, &by_position);
        let merge_time = merge_started.elapsed();
        observer.on_merged(n, merge_time);

        self.permutation = working;
        self.segments = segments.clone();
        self.timings = timings.clone();

        Ok(SortOutcome::Sorted(SortReport {
            requested_workers,
            workers,
            segments,
            timings,
            merge_time,
        }))
    }

    pub fn permutation(&self) -> &[Position] {
        &self.permutation
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn timings(&self) -> &[Duration] {
        &self.timings
    }

    pub fn is_built(&self) -> bool {
        !self.permutation.is_empty()
    }

    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Records in sorted order. Reverse with `.rev()`.
    ///
    /// `snapshot` must come from the store this index was built on.
    pub fn iter<'a, K, C>(
        &'a self,
        snapshot: StoreSnapshot<'a, K, C>,
    ) -> impl DoubleEndedIterator<Item = &'a Record<K, C>> + 'a {
        self.permutation.iter().filter_map(move |p| snapshot.get(*p))
    }

    pub fn clear(&mut self) {
        self.permutation.clear();
        self.segments.clear();
        self.timings.clear();
    }
}

/// Sorts each segment of `working` on its own scoped thread and returns the
/// per-worker elapsed times.
///
/// Segments are carved with `split_at_mut` before any thread starts, so every
/// worker holds the only reference to its slice.
fn sort_segments<F>(working: &mut [Position], segments: &[Segment], compare: &F) -> Result<Vec<Duration>>
where
    F: Fn(&Position, &Position) -> Ordering + Sync,
{
    let mut slices = Vec::with_capacity(segments.len());
    let mut rest = working;
    for segment in segments {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(segment.len());
        slices.push(head);
        rest = tail;
    }
    debug_assert!(rest.is_empty());

    let mut timings = vec![Duration::ZERO; segments.len()];
    crossbeam::thread::scope(|scope| {
        for (slice, slot) in slices.into_iter().zip(timings.iter_mut()) {
            scope.spawn(move |_| {
                let started = Instant::now();
                slice.sort_unstable_by(compare);
                *slot = started.elapsed();
            });
        }
    })
    .map_err(|_| Error::new(ErrorKind::Internal, "Sort worker panicked".to_string()))?;

    Ok(timings)
}
