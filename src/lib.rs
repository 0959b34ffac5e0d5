pub mod core;
pub mod parallel;
pub mod index;
pub mod ingest;

pub use crate::core::config::Config;
pub use crate::core::database::{LoadSummary, Roster};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::store::{RecordStore, StoreSnapshot};
pub use crate::core::types::{CategoryKey, Position, Record, RollKey, Score};
pub use crate::index::score_index::ScoreIndex;
pub use crate::parallel::observer::{LogObserver, NoopObserver, SortObserver};
pub use crate::parallel::sorter::{ParallelOrderIndex, SortOutcome, SortReport};

/*
┌──────────────────────────────────────────────────────────────────────────────────┐
│                              ROSTERX ARCHITECTURE                                │
└──────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────── CORE LAYER ───────────────────────────────────┐
│                                                                                  │
│  ┌────────────────────────────────────────────────────────────────────────┐     │
│  │                          struct Roster<K, C>                           │     │
│  │  config: Config                   // workers, default threshold        │     │
│  │  store: RecordStore<K, C>         // owns every Record                 │     │
│  │  order: ParallelOrderIndex        // permutation sorted by roll        │     │
│  │  scores: ScoreIndex<C>            // course → ranked (score, position) │     │
│  │  observer: Box<dyn SortObserver>  // partition / timing diagnostics    │     │
│  └────────────────────────────────────────────────────────────────────────┘     │
│                                                                                  │
│  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────────────┐   │
│  │ struct Record<K,C> │  │ struct Position    │  │ struct StoreSnapshot<'a> │   │
│  │ • name, branch     │  │ • 0: usize         │  │ • records: &'a [Record]  │   │
│  │ • roll: K          │  └────────────────────┘  └──────────────────────────┘   │
│  │ • start_year       │                                                          │
│  │ • enrolled: Vec<C> │                                                          │
│  │ • completed:       │                                                          │
│  │   BTreeMap<C, f64> │                                                          │
│  └────────────────────┘                                                          │
└──────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────── PARALLEL LAYER ─────────────────────────────────┐
│                                                                                  │
│   identity [0..n) ──partition()──► Segment 0 │ Segment 1 │ … │ Segment w-1       │
│                                        │           │               │             │
│                             crossbeam scoped threads, one &mut slice each        │
│                                        ▼           ▼               ▼             │
│                                  sort_unstable  sort_unstable   sort_unstable    │
│                                        └─────── join barrier ──────┘             │
│                                                    │                             │
│                          SegmentMerger: ((s0 ⋈ s1) ⋈ s2) ⋈ … on caller thread    │
│                                                    ▼                             │
│                                 permutation + per-worker timings                 │
└──────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── INDEX LAYER ───────────────────────────────────┐
│                                                                                  │
│  ScoreIndex<C>: HashMap<C, Ranking>                                              │
│  Ranking: Vec<RankedEntry { score, position }>  score desc, position asc         │
│  query(course, min) = prefix of the ranking with score ≥ min                     │
└──────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── INGEST LAYER ──────────────────────────────────┐
│                                                                                  │
│  csv        name,roll,branch,startYear,currentCourses,completedCourses           │
│             rows parsed on the rayon pool, bad rows skipped                      │
│  validate   names, alphabetic / numeric course codes, score range                │
│  generator  seeded synthetic rosters                                             │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
