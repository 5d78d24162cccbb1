use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain;

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// One parsed `(hostname, date)` observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub host: String,
    pub date: NaiveDate,
}

/// Entries read from one source, in source order.
#[derive(Debug, Default)]
pub struct LogBatch {
    pub entries: Vec<LogEntry>,
    pub skipped: u64,
}

impl LogBatch {
    fn merge(&mut self, other: LogBatch) {
        self.entries.extend(other.entries);
        self.skipped += other.skipped;
    }
}

/// Parse a `DATE HOSTNAME` line. `None` for anything unusable.
pub fn parse_line(line: &str, date_format: &str) -> Option<LogEntry> {
    let mut fields = line.split_whitespace();
    let date = NaiveDate::parse_from_str(fields.next()?, date_format).ok()?;
    let host = domain::host_of(fields.next()?)?;
    if !domain::is_valid_hostname(&host) {
        return None;
    }
    Some(LogEntry { host, date })
}

pub fn read_entries<R: BufRead>(reader: R, date_format: &str) -> Result<LogBatch> {
    let mut batch = LogBatch::default();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed, date_format) {
            Some(entry) => batch.entries.push(entry),
            None => {
                debug!(action = "skip", component = "log_parser", line_number = line_num + 1, line = trimmed, "Malformed log line");
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

fn read_source(path: &Path, date_format: &str) -> Result<LogBatch> {
    if path == Path::new("-") {
        return read_entries(io::stdin().lock(), date_format).context("Failed to read stdin");
    }
    let file = File::open(path).with_context(|| format!("Failed to open log file {:?}", path))?;
    read_entries(BufReader::new(file), date_format)
        .with_context(|| format!("Failed to read log file {:?}", path))
}

/// Parse every source on a rayon pool, one task per file. The combined batch
/// keeps the order of `paths`.
pub fn load_logs(paths: &[PathBuf], date_format: &str, workers: usize) -> Result<LogBatch> {
    let start_time = Instant::now();
    info!(action = "start", component = "log_loading", file_count = paths.len(), worker_count = workers, "Loading log files");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    let batches: Vec<LogBatch> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| read_source(path, date_format))
            .collect::<Result<Vec<_>>>()
    })?;

    let mut all = LogBatch::default();
    for batch in batches {
        all.merge(batch);
    }

    info!(
        action = "complete",
        component = "log_loading",
        entry_count = all.entries.len(),
        skipped = all.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "Log files loaded"
    );
    Ok(all)
}
