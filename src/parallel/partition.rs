use std::ops::Range;
use serde::Serialize;

/// Fewest workers a non-trivial sort is split across.
pub const MIN_WORKERS: usize = 2;

/// Contiguous half-open range `[start, end)` of the working permutation owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Segment { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Clamps a requested worker count into `[MIN_WORKERS, n]`.
///
/// A single record gets a single worker and an empty input gets none.
pub fn clamp_workers(requested: usize, n: usize) -> usize {
    match n {
        0 => 0,
        1 => 1,
        _ => requested.clamp(MIN_WORKERS, n),
    }
}

/// Splits `[0, n)` into `workers` contiguous segments.
///
/// Every segment holds `n / workers` positions and the first `n % workers`
/// segments hold one extra. `workers` must already be clamped.
pub fn partition(n: usize, workers: usize) -> Vec<Segment> {
    if n == 0 || workers == 0 {
        return Vec::new();
    }
    debug_assert!(workers <= n);

    let base = n / workers;
    let remainder = n % workers;

    let mut segments = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let size = base + usize::from(i < remainder);
        segments.push(Segment::new(start, start + size));
        start += size;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_the_valid_range() {
        assert_eq!(clamp_workers(1, 5), 2);
        assert_eq!(clamp_workers(0, 5), 2);
        assert_eq!(clamp_workers(100, 5), 5);
        assert_eq!(clamp_workers(3, 5), 3);
        assert_eq!(clamp_workers(8, 1), 1);
        assert_eq!(clamp_workers(8, 0), 0);
    }

    #[test]
    fn five_positions_over_two_workers() {
        assert_eq!(partition(5, 2), vec![Segment::new(0, 3), Segment::new(3, 5)]);
    }

    #[test]
    fn remainder_goes_to_leading_segments() {
        let sizes: Vec<usize> = partition(11, 4).iter().map(Segment::len).collect();
        assert_eq!(sizes, vec![3, 3, 3, 2]);
    }

    #[test]
    fn segments_tile_the_whole_range() {
        let segments = partition(3000, 7);
        assert_eq!(segments.first().map(|s| s.start), Some(0));
        assert_eq!(segments.last().map(|s| s.end), Some(3000));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(partition(0, 4).is_empty());
    }
}
