use std::time::Duration;
use tracing::{debug, info};
use crate::parallel::partition::Segment;

/// Receives diagnostics from a parallel sort build.
///
/// Observers are called from the coordinating thread only, before dispatch and
/// after the join barrier. Nothing they do affects the resulting order.
pub trait SortObserver: Send + Sync {
    fn on_empty(&self) {}

    fn on_partition(&self, _requested: usize, _workers: usize, _segments: &[Segment]) {}

    fn on_worker_finished(&self, _worker: usize, _segment: Segment, _elapsed: Duration) {}

    fn on_merged(&self, _len: usize, _elapsed: Duration) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SortObserver for NoopObserver {}

/// Emits build diagnostics as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SortObserver for LogObserver {
    fn on_empty(&self) {
        info!("No students to sort");
    }

    fn on_partition(&self, requested: usize, workers: usize, segments: &[Segment]) {
        if requested != workers {
            debug!(requested, workers, "Worker count clamped");
        }
        info!(workers, segments = segments.len(), "Parallel sort by roll");
    }

    fn on_worker_finished(&self, worker: usize, segment: Segment, elapsed: Duration) {
        info!(
            "  Thread {} sorted indices [{}, {}) in {} ms",
            worker,
            segment.start,
            segment.end,
            elapsed.as_millis()
        );
    }

    fn on_merged(&self, len: usize, elapsed: Duration) {
        debug!(len, elapsed_us = elapsed.as_micros() as u64, "Merged sorted segments");
    }
}
