use proptest::prelude::*;
use rosterx::parallel::partition::{clamp_workers, partition};
use rosterx::{NoopObserver, ParallelOrderIndex, Position, Record, RecordStore, SortOutcome};

fn store_from(rolls: &[i64]) -> RecordStore<i64, String> {
    let mut store = RecordStore::with_capacity(rolls.len());
    for (i, roll) in rolls.iter().enumerate() {
        store.append(Record::new(format!("student{}", i), *roll, "cse", 2022));
    }
    store
}

proptest! {
    #[test]
    fn permutation_is_a_bijection(
        rolls in prop::collection::vec(-1000i64..1000, 1..400),
        workers in 0usize..64,
    ) {
        let store = store_from(&rolls);
        let mut index = ParallelOrderIndex::new();
        index.build(store.snapshot(), workers, &NoopObserver).unwrap();

        let mut seen: Vec<Position> = index.permutation().to_vec();
        seen.sort();
        let expected: Vec<Position> = (0..rolls.len()).map(Position).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn sorted_order_is_non_decreasing(
        rolls in prop::collection::vec(0i64..50, 1..400),
        workers in 0usize..64,
    ) {
        let store = store_from(&rolls);
        let mut index = ParallelOrderIndex::new();
        index.build(store.snapshot(), workers, &NoopObserver).unwrap();

        let sorted: Vec<i64> = index.iter(store.snapshot()).map(|r| *r.roll()).collect();
        let mut expected = rolls.clone();
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn partition_sizes_are_deterministic(n in 1usize..5000, requested in 0usize..128) {
        let workers = clamp_workers(requested, n);
        let segments = partition(n, workers);

        prop_assert_eq!(segments.len(), workers);
        for (i, segment) in segments.iter().enumerate() {
            let expected = n / workers + usize::from(i < n % workers);
            prop_assert_eq!(segment.len(), expected);
        }
        prop_assert_eq!(segments.iter().map(|s| s.len()).sum::<usize>(), n);
    }

    #[test]
    fn rebuilding_gives_the_same_order(
        rolls in prop::collection::vec(any::<i64>(), 1..200),
        workers in 2usize..16,
    ) {
        let store = store_from(&rolls);
        let mut index = ParallelOrderIndex::new();

        index.build(store.snapshot(), workers, &NoopObserver).unwrap();
        let first: Vec<i64> = index.iter(store.snapshot()).map(|r| *r.roll()).collect();
        index.build(store.snapshot(), workers, &NoopObserver).unwrap();
        let second: Vec<i64> = index.iter(store.snapshot()).map(|r| *r.roll()).collect();

        prop_assert_eq!(first, second);
    }
}

#[test]
fn scenario_five_rolls_two_workers() {
    let store = store_from(&[50, 10, 30, 20, 40]);
    let mut index = ParallelOrderIndex::new();

    let outcome = index.build(store.snapshot(), 2, &NoopObserver).unwrap();
    let report = outcome.report().unwrap();

    let bounds: Vec<(usize, usize)> = report.segments.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(bounds, vec![(0, 3), (3, 5)]);
    let rolls: Vec<i64> = index.iter(store.snapshot()).map(|r| *r.roll()).collect();
    assert_eq!(rolls, vec![10, 20, 30, 40, 50]);
}

#[test]
fn scenario_empty_store() {
    let store = store_from(&[]);
    let mut index = ParallelOrderIndex::new();

    let outcome = index.build(store.snapshot(), 4, &NoopObserver).unwrap();

    assert!(matches!(outcome, SortOutcome::Empty));
    assert!(index.permutation().is_empty());
}

#[test]
fn scenario_worker_clamping() {
    let store = store_from(&[5, 4, 3, 2, 1]);
    let mut index = ParallelOrderIndex::new();

    let workers_for = |index: &mut ParallelOrderIndex, requested| {
        index
            .build(store.snapshot(), requested, &NoopObserver)
            .unwrap()
            .report()
            .map(|r| r.workers)
    };

    assert_eq!(workers_for(&mut index, 1), Some(2));
    assert_eq!(workers_for(&mut index, 100), Some(5));
}

#[test]
fn large_roster_with_many_duplicates() {
    let rolls: Vec<i64> = (0..20_000).map(|i| (i * 7919) % 97).collect();
    let store = store_from(&rolls);
    let mut index = ParallelOrderIndex::new();

    index.build(store.snapshot(), 8, &NoopObserver).unwrap();

    let sorted: Vec<i64> = index.iter(store.snapshot()).map(|r| *r.roll()).collect();
    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(index.timings().len(), 8);
}
