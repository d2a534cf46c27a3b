//! Plain-text identifier lists: reading, cleaning, deduplicating and
//! diffing against a results CSV.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tkscrape_core::{extract_username, normalize_username};

use crate::csv_store::{read_records, write_atomic};
use crate::error::StoreError;

/// Reads a text file as lines, without line terminators.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn read_lines(path: &Path) -> Result<Vec<String>, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(text
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect())
}

/// Atomically writes `lines`, one per line.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written or replaced.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), StoreError> {
    write_atomic(path, |out| {
        for line in lines {
            writeln!(out, "{}", line.as_ref()).map_err(|e| StoreError::io(path, e))?;
        }
        Ok(())
    })
}

/// Reads a list of bare usernames (one per line, optional leading `@`).
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn read_username_list(path: &Path) -> Result<Vec<String>, StoreError> {
    Ok(read_lines(path)?
        .iter()
        .filter_map(|l| normalize_username(l))
        .collect())
}

/// Drops blank lines and exact duplicates, keeping first-seen order.
#[must_use]
pub fn dedupe_lines(lines: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .filter(|l| seen.insert(l.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeReport {
    pub backup: PathBuf,
    pub lines_in: usize,
    pub unique: usize,
}

/// Deduplicates a list file in place after copying the original to
/// `{name}.{YYYYmmdd_HHMMSS}.bak` beside it.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read, backed up or replaced.
pub fn dedupe_list_file(path: &Path) -> Result<DedupeReport, StoreError> {
    let lines = read_lines(path)?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup = path.with_file_name(format!("{file_name}.{stamp}.bak"));
    fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
    tracing::info!(backup = %backup.display(), "backed up list before dedupe");

    let unique = dedupe_lines(&lines);
    write_lines(path, &unique)?;

    Ok(DedupeReport {
        backup,
        lines_in: lines.len(),
        unique: unique.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub lines_in: usize,
    pub kept: usize,
}

fn is_http_url(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}

/// Rewrites a list keeping only trimmed `http://` / `https://` lines.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or replaced.
pub fn clean_url_list(path: &Path) -> Result<CleanReport, StoreError> {
    let lines = read_lines(path)?;
    let kept: Vec<&str> = lines
        .iter()
        .map(|l| l.as_str().trim())
        .filter(|l| is_http_url(l))
        .collect();
    write_lines(path, &kept)?;
    Ok(CleanReport {
        lines_in: lines.len(),
        kept: kept.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingReport {
    /// Usernames extracted from the list.
    pub total: usize,
    /// Distinct usernames already present in the CSV.
    pub scraped: usize,
    /// List usernames not in the CSV, in list order.
    pub remaining: Vec<String>,
}

impl RemainingReport {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.scraped as f64 / self.total as f64 * 100.0
        }
    }
}

/// Usernames from the URL list at `list_path` that have no row in
/// `scraped_csv`. A missing CSV means nothing has been scraped yet.
///
/// # Errors
///
/// Returns [`StoreError`] if the list cannot be read, or the CSV exists but
/// cannot be read.
pub fn remaining_usernames(
    list_path: &Path,
    scraped_csv: &Path,
) -> Result<RemainingReport, StoreError> {
    let usernames: Vec<String> = read_lines(list_path)?
        .iter()
        .map(|l| l.as_str().trim())
        .filter(|l| is_http_url(l))
        .filter_map(extract_username)
        .collect();

    let scraped: HashSet<String> = match read_records(scraped_csv) {
        Ok(rows) => rows
            .into_iter()
            .map(|r| r.username)
            .filter(|u| !u.is_empty())
            .collect(),
        Err(e) if e.is_not_found() => {
            tracing::warn!(
                path = %scraped_csv.display(),
                "no scraped CSV found; treating all users as remaining"
            );
            HashSet::new()
        }
        Err(e) => return Err(e),
    };

    let remaining = usernames
        .iter()
        .filter(|u| !scraped.contains(u.as_str()))
        .cloned()
        .collect();

    Ok(RemainingReport {
        total: usernames.len(),
        scraped: scraped.len(),
        remaining,
    })
}

#[cfg(test)]
#[path = "lists_test.rs"]
mod tests;
