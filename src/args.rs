use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::logfile::DEFAULT_DATE_FORMAT;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "tldcount",
    about = "Count top-level domains of log entries dated within a window",
    version,
    long_about = None
)]
pub struct Args {
    /// First date of the window (inclusive)
    pub begin: String,

    /// Last date of the window (inclusive)
    pub end: String,

    /// Log files of `DATE HOSTNAME` lines; `-` reads stdin
    pub files: Vec<PathBuf>,

    /// Also count visits from a Chromium-style history database
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Custom temporary file path for the history database copy
    #[arg(long)]
    pub temp_path: Option<PathBuf>,

    /// chrono format string for window and log dates
    #[arg(short, long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only list the N most frequent domains
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Number of worker threads for parsing log files
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log sources to read. With no files and no history database, stdin.
    pub fn log_sources(&self) -> Vec<PathBuf> {
        if self.files.is_empty() && self.history.is_none() {
            vec![PathBuf::from("-")]
        } else {
            self.files.clone()
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| std::cmp::min(num_cpus::get(), 8))
    }
}
