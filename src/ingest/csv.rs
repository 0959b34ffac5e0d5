use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::Path;
use std::str::FromStr;
use rayon::prelude::*;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Record, Score};

pub const HEADER: &str = "name,roll,branch,startYear,currentCourses,completedCourses";

const FIELD_SEPARATOR: char = ',';
const LIST_SEPARATOR: char = ';';
const PAIR_SEPARATOR: char = ':';

/// A line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// Records parsed from a CSV body, in file order, plus the lines that were skipped.
#[derive(Debug, Clone)]
pub struct ParsedRows<K, C> {
    pub records: Vec<Record<K, C>>,
    pub rejected: Vec<RejectedRow>,
}

/// Parses one data row.
///
/// The two relation columns are optional so legacy four-column rows still load.
pub fn parse_row<K, C>(line: &str) -> Result<Record<K, C>>
where
    K: FromStr,
    C: FromStr + Ord,
{
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < 4 {
        return Err(Error::invalid_input(format!(
            "expected at least 4 fields, found {}",
            fields.len()
        )));
    }
    if fields.len() > 6 {
        return Err(Error::invalid_input(format!(
            "expected at most 6 fields, found {}",
            fields.len()
        )));
    }

    let name = fields[0];
    if name.is_empty() {
        return Err(Error::invalid_input("empty name"));
    }
    let roll = parse_key::<K>(fields[1], "roll")?;
    let branch = fields[2];
    let start_year: i32 = fields[3].parse()?;

    let mut record = Record::new(name, roll, branch, start_year);

    if let Some(enrolled) = fields.get(4) {
        for code in split_list(enrolled) {
            record.enroll(parse_key::<C>(code, "course")?);
        }
    }
    if let Some(completed) = fields.get(5) {
        for pair in split_list(completed) {
            let (code, score) = parse_completed(pair)?;
            record.complete(code, score);
        }
    }

    Ok(record)
}

/// Formats a record as a data row, scores with `precision` decimals.
pub fn format_row<K, C>(record: &Record<K, C>, precision: usize) -> String
where
    K: Display,
    C: Display,
{
    let enrolled = record
        .enrolled()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";");
    let completed = record
        .completed()
        .iter()
        .map(|(code, score)| format!("{}:{:.*}", code, precision, score))
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{},{},{},{},{},{}",
        record.name(),
        record.roll(),
        record.branch(),
        record.start_year(),
        enrolled,
        completed
    )
}

/// Parses a whole CSV body.
///
/// The first non-empty line is the header. Blank lines are ignored and bad
/// rows are collected into `rejected` instead of failing the load. Rows are
/// parsed on the rayon pool, at least `batch_size` per task, and come back in
/// file order.
pub fn parse_str<K, C>(content: &str, batch_size: usize) -> ParsedRows<K, C>
where
    K: FromStr + Send,
    C: FromStr + Ord + Send,
{
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1)
        .map(|(i, line)| (i + 1, line))
        .collect();

    let parsed: Vec<(usize, &str, Result<Record<K, C>>)> = lines
        .par_iter()
        .with_min_len(batch_size.max(1))
        .map(|&(line_number, line)| (line_number, line, parse_row(line)))
        .collect();

    let mut records = Vec::with_capacity(parsed.len());
    let mut rejected = Vec::new();
    for (line_number, line, result) in parsed {
        match result {
            Ok(record) => records.push(record),
            Err(err) => rejected.push(RejectedRow {
                line_number,
                line: line.to_string(),
                reason: err.context,
            }),
        }
    }

    ParsedRows { records, rejected }
}

pub fn load<K, C>(path: &Path, batch_size: usize) -> Result<ParsedRows<K, C>>
where
    K: FromStr + Send,
    C: FromStr + Ord + Send,
{
    let content = fs::read_to_string(path).map_err(|err| {
        let kind = if err.kind() == IoErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind, format!("Could not open CSV file {}: {}", path.display(), err))
    })?;
    Ok(parse_str(&content, batch_size))
}

/// Appends rows, writing the header first when the file is new or empty.
pub fn append<'a, K, C, I>(path: &Path, records: I, precision: usize) -> Result<usize>
where
    K: Display + 'a,
    C: Display + 'a,
    I: IntoIterator<Item = &'a Record<K, C>>,
{
    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(err) if err.kind() == IoErrorKind::NotFound => true,
        Err(err) => return Err(err.into()),
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    if needs_header {
        writeln!(out, "{}", HEADER)?;
    }

    let mut written = 0;
    for record in records {
        writeln!(out, "{}", format_row(record, precision))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Writes a complete file: header plus every record.
pub fn write_all<'a, K, C, I>(path: &Path, records: I, precision: usize) -> Result<usize>
where
    K: Display + 'a,
    C: Display + 'a,
    I: IntoIterator<Item = &'a Record<K, C>>,
{
    clear(path)?;
    append(path, records, precision)
}

/// Truncates the file to zero length, creating it if needed.
pub fn clear(path: &Path) -> Result<()> {
    File::create(path)?;
    Ok(())
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_key<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    if raw.is_empty() {
        return Err(Error::new(ErrorKind::Parse, format!("empty {}", what)));
    }
    raw.parse()
        .map_err(|_| Error::new(ErrorKind::Parse, format!("invalid {} '{}'", what, raw)))
}

fn parse_completed<C: FromStr>(pair: &str) -> Result<(C, Score)> {
    let (code, score) = pair.rsplit_once(PAIR_SEPARATOR).ok_or_else(|| {
        Error::new(ErrorKind::Parse, format!("expected course:score, found '{}'", pair))
    })?;
    let score: Score = score.trim().parse()?;
    if !score.is_finite() {
        return Err(Error::new(ErrorKind::Parse, format!("non-finite score in '{}'", pair)));
    }
    Ok((parse_key(code.trim(), "course")?, score))
}
