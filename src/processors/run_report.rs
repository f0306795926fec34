use crate::error::ProcessingError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Counters for one input file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub rows_written: usize,
    pub rows_without_calendar_date: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a whole run. Per-file failures are collected here rather than
/// aborting sibling files.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub files_discovered: usize,
    pub files_succeeded: usize,
    pub files_cancelled: usize,
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub rows_written: usize,
    pub rows_without_calendar_date: usize,
    pub failures: Vec<FileFailure>,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn new(output_path: &Path, files_discovered: usize) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            files_discovered,
            files_succeeded: 0,
            files_cancelled: 0,
            lines_read: 0,
            lines_skipped: 0,
            rows_written: 0,
            rows_without_calendar_date: 0,
            failures: Vec::new(),
            cancelled: false,
            elapsed_ms: 0,
        }
    }

    pub fn record_success(&mut self, stats: &FileStats) {
        self.files_succeeded += 1;
        self.lines_read += stats.lines_read;
        self.lines_skipped += stats.lines_skipped;
        self.rows_written += stats.rows_written;
        self.rows_without_calendar_date += stats.rows_without_calendar_date;
    }

    pub fn record_failure(&mut self, path: &Path, error: &ProcessingError) {
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    pub fn record_cancelled(&mut self) {
        self.files_cancelled += 1;
        self.cancelled = true;
    }

    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Processing Report ===\n");
        summary.push_str(&format!("Output: {}\n", self.output_path.display()));
        summary.push_str(&format!(
            "Files: {} discovered, {} succeeded, {} failed, {} cancelled\n",
            self.files_discovered,
            self.files_succeeded,
            self.files_failed(),
            self.files_cancelled
        ));
        summary.push_str(&format!("Lines read: {}\n", self.lines_read));
        summary.push_str(&format!("Lines skipped: {}\n", self.lines_skipped));
        summary.push_str(&format!("Rows written: {}\n", self.rows_written));
        summary.push_str(&format!(
            "Rows dated past month end: {}\n",
            self.rows_without_calendar_date
        ));
        summary.push_str(&format!("Elapsed: {} ms\n", self.elapsed_ms));

        if !self.failures.is_empty() {
            summary.push_str("\nFailed files:\n");
            for (i, failure) in self.failures.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    failure.path.display(),
                    failure.error
                ));
            }
            if self.failures.len() > 10 {
                summary.push_str(&format!("  ... and {} more\n", self.failures.len() - 10));
            }
        }

        summary
    }
}
