use std::ops::Index;
use crate::core::types::{Position, Record};

/// Insertion-ordered owner of every record.
///
/// A record's position is its identity for the lifetime of the store; indexes
/// refer to records only by `Position`.
#[derive(Debug, Clone)]
pub struct RecordStore<K, C> {
    records: Vec<Record<K, C>>,
}

impl<K, C> Default for RecordStore<K, C> {
    fn default() -> Self {
        RecordStore { records: Vec::new() }
    }
}

impl<K, C> RecordStore<K, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RecordStore {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Appends a record and returns the position it was assigned.
    pub fn append(&mut self, record: Record<K, C>) -> Position {
        let position = Position(self.records.len());
        self.records.push(record);
        position
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record<K, C>>) {
        self.records.extend(records);
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: Position) -> Option<&Record<K, C>> {
        self.records.get(position.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<K, C>> {
        self.records.iter()
    }

    /// Read-only view over positions `0..size()`.
    ///
    /// The snapshot borrows the store, so no append or reset can happen while
    /// an index build holds it.
    pub fn snapshot(&self) -> StoreSnapshot<'_, K, C> {
        StoreSnapshot {
            records: &self.records,
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}

/// Borrowed, immutable view of a `RecordStore`.
#[derive(Debug)]
pub struct StoreSnapshot<'a, K, C> {
    records: &'a [Record<K, C>],
}

impl<K, C> Clone for StoreSnapshot<'_, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for StoreSnapshot<'_, K, C> {}

impl<'a, K, C> StoreSnapshot<'a, K, C> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: Position) -> Option<&'a Record<K, C>> {
        self.records.get(position.0)
    }

    pub fn records(&self) -> &'a [Record<K, C>] {
        self.records
    }

    /// Resolves a sequence of positions to record references.
    pub fn resolve<I>(&self, positions: I) -> Vec<&'a Record<K, C>>
    where
        I: IntoIterator<Item = Position>,
    {
        let records = self.records;
        positions
            .into_iter()
            .filter_map(|p| records.get(p.0))
            .collect()
    }

    pub fn enumerate(self) -> impl Iterator<Item = (Position, &'a Record<K, C>)> + 'a {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (Position(i), record))
    }
}

impl<'a, K, C> Index<Position> for StoreSnapshot<'a, K, C> {
    type Output = Record<K, C>;

    fn index(&self, position: Position) -> &Self::Output {
        &self.records[position.0]
    }
}
