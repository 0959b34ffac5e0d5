//! Command-line argument definitions for the rosterx CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use rosterx::ingest::validate::CourseStyle;

#[derive(Parser)]
#[command(name = "rosterx")]
#[command(about = "Student roster with a parallel roll-number sort and grade threshold queries")]
#[command(after_help = "EXAMPLES:
  # Create a synthetic roster of 3000 students
  rosterx generate -n 3000 --seed 7

  # Sort by roll on 4 threads and print the result
  rosterx sort -w 4

  # Students with grade >= 9 in course 12345
  rosterx query -c 12345 -t 9")]
pub struct Cli {
    /// Show progress and timing diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV data file (overrides the config)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Treat roll numbers as integers instead of text
    #[arg(long, global = true)]
    pub numeric_rolls: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the data file and report how many rows were accepted
    Load,

    /// Show records in file order
    List,

    /// Sort by roll using worker threads and show the sorted records
    Sort {
        /// Worker threads (at least 2 are used)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Also print the sorted order in reverse
        #[arg(long)]
        reverse: bool,

        /// Only print timings, not records
        #[arg(short, long)]
        quiet: bool,
    },

    /// Students with a completed-course grade at or above a threshold
    Query {
        /// Course code
        #[arg(short, long)]
        course: String,

        /// Minimum grade (defaults to the configured threshold)
        #[arg(short = 't', long)]
        min_score: Option<f64>,
    },

    /// Students taking or having taken a course (case-insensitive)
    Course {
        code: String,
    },

    /// Validate a student and append it to the data file
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        roll: String,

        #[arg(long)]
        branch: String,

        #[arg(long)]
        start_year: i32,

        /// Course in progress (repeatable)
        #[arg(long = "enroll")]
        enrolled: Vec<String>,

        /// Completed course as CODE:GRADE (repeatable)
        #[arg(long = "complete", value_parser = parse_completed)]
        completed: Vec<(String, f64)>,

        /// Required course code style: alphabetic (IIITD) or numeric (IITD)
        #[arg(long)]
        style: Option<CourseStyle>,
    },

    /// Truncate the data file
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a synthetic roster to the data file
    Generate {
        #[arg(short = 'n', long, default_value_t = 3000)]
        count: usize,

        /// RNG seed for a reproducible roster
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print roster and index statistics as JSON
    Stats {
        /// Sort and index before reporting
        #[arg(long)]
        build: bool,
    },
}

fn parse_completed(raw: &str) -> Result<(String, f64), String> {
    let (code, grade) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected CODE:GRADE, got '{}'", raw))?;
    let grade: f64 = grade
        .trim()
        .parse()
        .map_err(|e| format!("invalid grade '{}': {}", grade, e))?;
    Ok((code.trim().to_string(), grade))
}
