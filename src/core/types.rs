use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Numeric grade attached to a completed course.
pub type Score = f64;

/// Stable index of a record inside a `RecordStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position(pub usize);

impl Position {
    pub fn new(index: usize) -> Self {
        Position(index)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<usize> for Position {
    fn from(index: usize) -> Self {
        Position(index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordering key used by the parallel sort (integer or string roll numbers).
pub trait RollKey: Ord + Clone + Send + Sync + fmt::Display {}

impl<T> RollKey for T where T: Ord + Clone + Send + Sync + fmt::Display {}

/// Course identifier used by the score index.
pub trait CategoryKey: Eq + Hash + Ord + Clone + Send + Sync + fmt::Display {}

impl<T> CategoryKey for T where T: Eq + Hash + Ord + Clone + Send + Sync + fmt::Display {}

/// A student record.
///
/// Identity fields are fixed at construction. The course relations may only be
/// changed while the record is still owned by the caller; once appended to a
/// store it is only reachable through shared references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<K, C> {
    name: String,
    roll: K,
    branch: String,
    start_year: i32,
    enrolled: Vec<C>,
    completed: BTreeMap<C, Score>,
}

impl<K, C> Record<K, C> {
    pub fn new(name: impl Into<String>, roll: K, branch: impl Into<String>, start_year: i32) -> Self {
        Record {
            name: name.into(),
            roll,
            branch: branch.into(),
            start_year,
            enrolled: Vec::new(),
            completed: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roll(&self) -> &K {
        &self.roll
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn enrolled(&self) -> &[C] {
        &self.enrolled
    }

    pub fn completed(&self) -> &BTreeMap<C, Score> {
        &self.completed
    }

    pub fn enroll(&mut self, course: C) {
        self.enrolled.push(course);
    }

    pub fn with_enrolled(mut self, courses: impl IntoIterator<Item = C>) -> Self {
        for course in courses {
            self.enroll(course);
        }
        self
    }
}

impl<K, C> Record<K, C>
where
    C: Ord,
{
    /// Records a final score, dropping the course from the in-progress list.
    pub fn complete(&mut self, course: C, score: Score) {
        self.enrolled.retain(|c| c != &course);
        self.completed.insert(course, score);
    }

    pub fn score_for(&self, course: &C) -> Option<Score> {
        self.completed.get(course).copied()
    }

    /// True when the course is either in progress or completed.
    pub fn involves(&self, course: &C) -> bool {
        self.enrolled.contains(course) || self.completed.contains_key(course)
    }

    pub fn with_completed(mut self, courses: impl IntoIterator<Item = (C, Score)>) -> Self {
        for (course, score) in courses {
            self.complete(course, score);
        }
        self
    }
}

impl<K: fmt::Display, C> fmt::Display for Record<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Name: {}, Roll: {}, Branch: {}, StartYear: {}",
            self.name, self.roll, self.branch, self.start_year
        )
    }
}
