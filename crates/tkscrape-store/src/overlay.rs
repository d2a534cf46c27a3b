//! Overlaying fresh successful results onto an existing results CSV.
//!
//! Used by retry runs: the file is loaded, rows whose username has a new
//! success are replaced in place, and the file is rewritten atomically.
//! Usernames not already in the file are not added, and failures never
//! replace anything.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tkscrape_core::ProfileRecord;

use crate::csv_store::{read_records, write_records};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayReport {
    /// Rows replaced by a new success.
    pub updated: usize,
    /// Rows in the rewritten file.
    pub total: usize,
    /// Successful rows in the rewritten file.
    pub success: usize,
}

impl OverlayReport {
    /// Success share of the rewritten file, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64 * 100.0
        }
    }
}

/// Applies successful `results` to `existing`, keyed by username.
///
/// Duplicate usernames in `existing` collapse to one row at the position of
/// the first occurrence, holding the last occurrence's content.
pub fn overlay_successes(
    existing: Vec<ProfileRecord>,
    results: &[ProfileRecord],
) -> (Vec<ProfileRecord>, usize) {
    let mut rows: Vec<ProfileRecord> = Vec::with_capacity(existing.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in existing {
        match index.get(&row.username) {
            Some(&pos) => rows[pos] = row,
            None => {
                index.insert(row.username.clone(), rows.len());
                rows.push(row);
            }
        }
    }

    let mut updated = 0;
    let mut applied: HashSet<&str> = HashSet::new();
    for result in results.iter().filter(|r| r.is_success()) {
        if applied.contains(result.username.as_str()) {
            continue;
        }
        if let Some(&pos) = index.get(&result.username) {
            rows[pos] = result.clone();
            applied.insert(result.username.as_str());
            updated += 1;
        }
    }

    (rows, updated)
}

/// Load → overlay → atomic rewrite of the CSV at `path`.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read (including when it does
/// not exist; check [`StoreError::is_not_found`]) or rewritten.
pub fn overlay_successes_on_file(
    path: &Path,
    results: &[ProfileRecord],
) -> Result<OverlayReport, StoreError> {
    let existing = read_records(path)?;
    let (rows, updated) = overlay_successes(existing, results);
    write_records(path, &rows)?;

    let success = rows.iter().filter(|r| r.is_success()).count();
    tracing::info!(path = %path.display(), updated, total = rows.len(), "overlaid retry results");
    Ok(OverlayReport {
        updated,
        total: rows.len(),
        success,
    })
}
