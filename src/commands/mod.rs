pub mod args;

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use anyhow::{bail, Context, Result};
use tracing::info;
use rosterx::ingest::csv;
use rosterx::ingest::generator::{self, GeneratorOptions};
use rosterx::ingest::validate::{self, CourseStyle};
use rosterx::{Config, Record, RollKey, Roster, SortOutcome};

use args::{Cli, Commands};

type Course = String;

pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }

    if cli.numeric_rolls {
        run_with::<u64>(cli.command, config)
    } else {
        run_with::<String>(cli.command, config)
    }
}

fn run_with<K>(command: Commands, config: Config) -> Result<()>
where
    K: RollKey + FromStr + Send,
{
    match command {
        Commands::Generate { count, seed } => generate(&config, count, seed),
        Commands::Clear { yes } => clear(&config, yes),
        Commands::Add {
            name,
            roll,
            branch,
            start_year,
            enrolled,
            completed,
            style,
        } => {
            validate::validate_plain_field(&roll, "roll")?;
            let roll: K = roll
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid roll number '{}'", roll))?;
            let record = build_record(name, roll, branch, start_year, enrolled, completed, style)?;
            let roster = Roster::<K, Course>::new(config);
            let written = roster.append_csv(&roster.config().data_path, [&record])?;
            println!("Saved {} student(s) to {}", written, roster.config().data_path.display());
            Ok(())
        }
        Commands::Load => load::<K>(config).map(|_| ()),
        Commands::List => list(&load::<K>(config)?),
        Commands::Sort {
            workers,
            reverse,
            quiet,
        } => sort(&mut load::<K>(config)?, workers, reverse, quiet),
        Commands::Query { course, min_score } => query(&mut load::<K>(config)?, &course, min_score),
        Commands::Course { code } => course(&load::<K>(config)?, &code),
        Commands::Stats { build } => stats(&mut load::<K>(config)?, build),
    }
}

fn load<K>(config: Config) -> Result<Roster<K, Course>>
where
    K: RollKey + FromStr + Send,
{
    let mut roster = Roster::<K, Course>::new(config);
    let data_path = roster.config().data_path.clone();
    let summary = roster
        .load_csv(&data_path)
        .with_context(|| format!("Failed to load {}", data_path.display()))?;
    println!("Loaded. Total: {} ({} skipped)", roster.len(), summary.skipped);
    Ok(roster)
}

fn list<K: RollKey>(roster: &Roster<K, Course>) -> Result<()> {
    println!("\n=== Original order of records ===");
    for record in roster.records() {
        print_detailed(record);
    }
    Ok(())
}

fn sort<K: RollKey>(roster: &mut Roster<K, Course>, workers: Option<usize>, reverse: bool, quiet: bool) -> Result<()> {
    let report = match roster.sort_by_roll(workers)? {
        SortOutcome::Empty => {
            println!("No students to sort.");
            return Ok(());
        }
        SortOutcome::Sorted(report) => report,
    };

    println!("\nThread timing ({} threads used):", report.workers);
    for (i, (segment, elapsed)) in report.segments.iter().zip(&report.timings).enumerate() {
        println!(
            "  Thread {} sorted indices [{}, {}) in {} ms",
            i,
            segment.start,
            segment.end,
            elapsed.as_millis()
        );
    }
    if quiet {
        return Ok(());
    }

    println!("\n=== Sorted order by roll ===");
    for record in roster.sorted()? {
        print_detailed(record);
    }
    if reverse {
        println!("\n=== Reverse iteration over sorted order ===");
        for record in roster.sorted()?.rev() {
            println!("{}", record);
        }
    }
    Ok(())
}

fn query<K: RollKey>(roster: &mut Roster<K, Course>, course: &str, min_score: Option<f64>) -> Result<()> {
    roster.build_score_index();
    let threshold = min_score.unwrap_or(roster.config().default_min_score);
    let hits = roster.query(course, Some(threshold));
    if hits.is_empty() {
        println!("None found.");
        return Ok(());
    }

    println!("Students with grade >= {} in {}:", threshold, course);
    let course = course.to_string();
    for record in hits {
        let grade = record.score_for(&course).unwrap_or_default();
        println!("{} (grade={})", record, grade);
    }
    Ok(())
}

fn course<K: RollKey>(roster: &Roster<K, Course>, code: &str) -> Result<()> {
    println!("\n===== {} STUDENTS =====", code.to_uppercase());
    let found = roster.students_in_course(code);
    if found.is_empty() {
        println!("No {} students found.", code);
    }
    for record in found {
        println!("{}", record);
    }
    Ok(())
}

fn stats<K: RollKey>(roster: &mut Roster<K, Course>, build: bool) -> Result<()> {
    if build {
        roster.sort_by_roll(None)?;
        roster.build_score_index();
    }
    println!("{}", roster.stats().to_json()?);
    Ok(())
}

fn build_record<K>(
    name: String,
    roll: K,
    branch: String,
    start_year: i32,
    enrolled: Vec<Course>,
    completed: Vec<(Course, f64)>,
    style: Option<CourseStyle>,
) -> Result<Record<K, Course>> {
    validate::validate_name(&name)?;
    validate::validate_plain_field(&branch, "branch")?;
    let codes = enrolled.iter().chain(completed.iter().map(|(code, _)| code));
    for code in codes {
        match style.or_else(|| CourseStyle::detect(code)) {
            Some(style) => validate::validate_course(code, style)?,
            None => bail!("course '{}' must be all letters or all digits", code),
        }
    }
    for (_, grade) in &completed {
        validate::validate_score(*grade)?;
    }

    Ok(Record::new(name, roll, branch, start_year)
        .with_enrolled(enrolled)
        .with_completed(completed))
}

fn generate(config: &Config, count: usize, seed: Option<u64>) -> Result<()> {
    let records = generator::generate(GeneratorOptions { count, seed });
    let written = csv::write_all(&config.data_path, &records, config.score_precision)?;
    info!(written, seed = ?seed, "Generated roster");
    println!("Generated {} entries in {}", written, config.data_path.display());
    Ok(())
}

fn clear(config: &Config, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Are you sure you want to clear {}?", config.data_path.display()))? {
        println!("Cancelled.");
        return Ok(());
    }
    csv::clear(&config.data_path)?;
    println!("CSV cleared.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/n): ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

fn print_detailed<K: Display>(record: &Record<K, Course>) {
    println!("{}", record);
    if !record.enrolled().is_empty() {
        println!("    Current courses: {}", record.enrolled().join(" "));
    }
    if !record.completed().is_empty() {
        let completed: Vec<String> = record
            .completed()
            .iter()
            .map(|(code, grade)| format!("({}, grade={})", code, grade))
            .collect();
        println!("    Completed: {}", completed.join(" "));
    }
}
