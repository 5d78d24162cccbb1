use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::time::Instant;
use tracing::info;

use crate::logfile::{self, LogBatch};
use crate::report::Report;
use crate::tldlist::TldList;
use crate::{history, Args};

pub fn parse_date(value: &str, date_format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, date_format)
        .with_context(|| format!("Invalid date {:?} (expected format {:?})", value, date_format))
}

/// Feed a batch into `list` in order. Returns how many entries were rejected.
pub fn count_batch(list: &mut TldList<NaiveDate>, batch: &LogBatch) -> u64 {
    batch
        .entries
        .iter()
        .filter(|entry| !list.add(&entry.host, &entry.date).is_counted())
        .count() as u64
}

pub fn run(args: &Args) -> Result<Report> {
    let start_time = Instant::now();
    info!(action = "start", component = "monitor", "Starting TLD count");

    let begin = parse_date(&args.begin, &args.date_format)?;
    let end = parse_date(&args.end, &args.date_format)?;
    let mut list = TldList::new(begin, end)
        .with_context(|| format!("Cannot count between {} and {}", args.begin, args.end))?;

    let mut rejected = 0;
    let mut skipped = 0;

    let sources = args.log_sources();
    if !sources.is_empty() {
        let batch = logfile::load_logs(&sources, &args.date_format, args.worker_count())?;
        rejected += count_batch(&mut list, &batch);
        skipped += batch.skipped;
    }

    if let Some(path) = &args.history {
        let batch = history::load_history(path, args.temp_path.as_deref())?;
        rejected += count_batch(&mut list, &batch);
        skipped += batch.skipped;
    }

    info!(
        action = "complete",
        component = "monitor",
        counted = list.count(),
        distinct = list.distinct(),
        rejected,
        skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "TLD count completed"
    );

    Ok(Report::from_list(&list, rejected, skipped))
}
