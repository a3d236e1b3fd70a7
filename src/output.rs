//! Collision-free naming of report files.
//!
//! Reports are called `research_report_<YYYYMMDD>.pdf`.  When that file already exists a
//! numeric suffix is appended (`_1`, `_2`, ...) until an unused name is found; existing files
//! are never overwritten.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

const REPORT_PREFIX: &str = "research_report";
const REPORT_EXTENSION: &str = "pdf";

/// File stem for a report created on `date`, e.g. `research_report_20250101`.
pub fn report_file_stem(date: NaiveDate) -> String {
    format!("{}_{}", REPORT_PREFIX, date.format("%Y%m%d"))
}

/// First unused report path in `dir` for `date`.
pub fn next_available_path(dir: &Path, date: NaiveDate) -> PathBuf {
    let stem = report_file_stem(date);
    let mut candidate = dir.join(format!("{stem}.{REPORT_EXTENSION}"));
    let mut counter = 1usize;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}_{counter}.{REPORT_EXTENSION}"));
        counter += 1;
    }
    candidate
}

/// First unused report path in `dir` for today's local date.
pub fn today_report_path(dir: &Path) -> PathBuf {
    next_available_path(dir, Local::now().date_naive())
}
