//! Merging several results CSVs into one deduplicated file.
//!
//! Rows are keyed by `username`. The first row seen for a key is kept unless
//! a later row is a success and the kept one is not; success always wins,
//! and among equals the first-seen row wins. Output is sorted
//! case-insensitively so repeated merges of the same inputs are
//! byte-identical.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tkscrape_core::ProfileRecord;

use crate::csv_store::{read_records, write_records};
use crate::error::StoreError;

/// Rows contributed by one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCount {
    pub path: PathBuf,
    /// Rows with a non-empty username.
    pub records: usize,
    /// The file did not exist and was skipped.
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub inputs: Vec<InputCount>,
    pub unique_users: usize,
    pub success: usize,
    pub failed: usize,
    pub output_bytes: u64,
}

/// Deduplicates rows by username and sorts the survivors.
pub fn merge_records<I>(rows: I) -> Vec<ProfileRecord>
where
    I: IntoIterator<Item = ProfileRecord>,
{
    let mut by_username: HashMap<String, ProfileRecord> = HashMap::new();

    for row in rows {
        if row.username.is_empty() {
            continue;
        }
        match by_username.get_mut(&row.username) {
            Some(kept) => {
                if row.is_success() && !kept.is_success() {
                    *kept = row;
                }
            }
            None => {
                by_username.insert(row.username.clone(), row);
            }
        }
    }

    let mut merged: Vec<ProfileRecord> = by_username.into_values().collect();
    merged.sort_by(|a, b| {
        a.username
            .to_lowercase()
            .cmp(&b.username.to_lowercase())
            .then_with(|| a.username.cmp(&b.username))
    });
    merged
}

/// Merges the CSVs at `inputs` into `output`.
///
/// Missing inputs are logged and skipped.
///
/// # Errors
///
/// Returns [`StoreError`] if an existing input cannot be read or the output
/// cannot be written.
pub fn merge_csv_files(inputs: &[PathBuf], output: &Path) -> Result<MergeReport, StoreError> {
    let mut all_rows = Vec::new();
    let mut counts = Vec::with_capacity(inputs.len());

    for path in inputs {
        match read_records(path) {
            Ok(rows) => {
                let records = rows.iter().filter(|r| !r.username.is_empty()).count();
                tracing::info!(path = %path.display(), records, "loaded CSV for merge");
                counts.push(InputCount {
                    path: path.clone(),
                    records,
                    missing: false,
                });
                all_rows.extend(rows);
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(path = %path.display(), "merge input does not exist; skipping");
                counts.push(InputCount {
                    path: path.clone(),
                    records: 0,
                    missing: true,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let merged = merge_records(all_rows);
    let success = merged.iter().filter(|r| r.is_success()).count();
    write_records(output, &merged)?;

    let output_bytes = std::fs::metadata(output)
        .map(|m| m.len())
        .map_err(|e| StoreError::io(output, e))?;

    Ok(MergeReport {
        inputs: counts,
        unique_users: merged.len(),
        success,
        failed: merged.len() - success,
        output_bytes,
    })
}
