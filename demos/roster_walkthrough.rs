/// Roster walkthrough
///
/// Generates a roster, sorts it by roll on several workers, then runs a few
/// threshold queries against the score index.

use rosterx::ingest::generator::{generate, GeneratorOptions};
use rosterx::{Config, Roster, SortOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   rosterx - Roster Walkthrough                ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Fill the roster
    let config = Config {
        worker_count: 4,
        ..Config::default()
    };
    let mut roster: Roster<String, String> = Roster::new(config);
    roster.extend(generate(GeneratorOptions { count: 3000, seed: Some(1) }));
    println!("Step 1: {} students generated\n", roster.len());

    // Step 2: Parallel sort
    println!("Step 2: Sorting by roll...");
    if let SortOutcome::Sorted(report) = roster.sort_by_roll(None)? {
        println!(
            "Sorted on {} workers, merge took {:?}",
            report.workers, report.merge_time
        );
    }
    for record in roster.sorted()?.take(3) {
        println!("  {}", record);
    }
    println!("  ...");
    for record in roster.sorted()?.rev().take(3) {
        println!("  {}", record);
    }

    // Step 3: Score queries
    println!("\nStep 3: Threshold queries");
    let stats = roster.build_score_index();
    println!("Indexed {} grades across {} courses", stats.entries, stats.categories);
    for (course, min) in [("12345", 9.5), ("34567", 9.9), ("23456", 7.0)] {
        let hits = roster.query(course, Some(min));
        println!("  {} >= {}: {} students", course, min, hits.len());
    }

    // Step 4: Stats
    println!("\nStep 4: Stats");
    println!("{}", roster.stats().to_json()?);

    Ok(())
}
