//! Data acquisition: CSV files, entry validation and synthetic rosters.
//!
//! Nothing in `core`, `parallel` or `index` depends on these modules except
//! the `Roster` CSV helpers.

pub mod csv;
pub mod validate;
pub mod generator;
