use std::cmp::Ordering;
use crate::core::types::Position;
use crate::parallel::partition::Segment;

/// Folds independently sorted segments into one sorted permutation.
///
/// Segment 0 is merged with segment 1, the result with segment 2, and so on.
/// Each step is a linear two-way merge through a scratch buffer holding the
/// already merged prefix.
pub struct SegmentMerger {
    scratch: Vec<Position>,
}

impl SegmentMerger {
    pub fn new() -> Self {
        SegmentMerger { scratch: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SegmentMerger {
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Merges `segments` of `permutation` left to right.
    ///
    /// The segments must tile `permutation` from index 0 and each must already
    /// be sorted under `compare`.
    pub fn merge_segments<F>(&mut self, permutation: &mut [Position], segments: &[Segment], compare: &F)
    where
        F: Fn(&Position, &Position) -> Ordering,
    {
        let Some(first) = segments.first() else {
            return;
        };
        debug_assert_eq!(first.start, 0);

        let mut merged_end = first.end;
        for segment in &segments[1..] {
            debug_assert_eq!(segment.start, merged_end);
            self.merge_adjacent(&mut permutation[..segment.end], merged_end, compare);
            merged_end = segment.end;
        }
    }

    /// Merges the sorted runs `run[..mid]` and `run[mid..]` in place.
    fn merge_adjacent<F>(&mut self, run: &mut [Position], mid: usize, compare: &F)
    where
        F: Fn(&Position, &Position) -> Ordering,
    {
        if mid == 0 || mid == run.len() {
            return;
        }
        // already ordered across the boundary
        if compare(&run[mid - 1], &run[mid]) != Ordering::Greater {
            return;
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&run[..mid]);

        let (mut left, mut right, mut out) = (0, mid, 0);
        while left < self.scratch.len() && right < run.len() {
            // left wins ties so equal keys keep segment order
            if compare(&run[right], &self.scratch[left]) == Ordering::Less {
                run[out] = run[right];
                right += 1;
            } else {
                run[out] = self.scratch[left];
                left += 1;
            }
            out += 1;
        }

        let rest = &self.scratch[left..];
        run[out..out + rest.len()].copy_from_slice(rest);
    }
}

impl Default for SegmentMerger {
    fn default() -> Self {
        Self::new()
    }
}
