//! File maintenance commands: CSV merge and list dedupe / clean / remaining.
//!
//! These never touch the network; they are thin wrappers over
//! `tkscrape_store` that print a short report.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub(crate) fn run_merge(inputs: &[PathBuf], output: &Path) -> anyhow::Result<()> {
    let report = tkscrape_store::merge_csv_files(inputs, output)
        .with_context(|| format!("failed to merge into {}", output.display()))?;

    for input in &report.inputs {
        if input.missing {
            println!("  {}: missing, skipped", input.path.display());
        } else {
            println!("  {}: {} records", input.path.display(), input.records);
        }
    }
    println!("merged {} unique users", report.unique_users);
    println!("  success: {}", report.success);
    println!("  failed:  {}", report.failed);
    #[allow(clippy::cast_precision_loss)]
    let kib = report.output_bytes as f64 / 1024.0;
    println!("  output:  {} ({kib:.1} KiB)", output.display());
    Ok(())
}

pub(crate) fn run_dedupe(path: &Path) -> anyhow::Result<()> {
    let report = tkscrape_store::dedupe_list_file(path)
        .with_context(|| format!("failed to dedupe {}", path.display()))?;
    println!(
        "{}: {} lines -> {} unique ({} removed)",
        path.display(),
        report.lines_in,
        report.unique,
        report.lines_in - report.unique
    );
    println!("  backup: {}", report.backup.display());
    Ok(())
}

pub(crate) fn run_clean(path: &Path) -> anyhow::Result<()> {
    let report = tkscrape_store::clean_url_list(path)
        .with_context(|| format!("failed to clean {}", path.display()))?;
    println!(
        "{}: kept {} of {} lines",
        path.display(),
        report.kept,
        report.lines_in
    );
    Ok(())
}

pub(crate) fn run_remaining(list: &Path, csv: &Path, output: &Path) -> anyhow::Result<()> {
    let report = tkscrape_store::remaining_usernames(list, csv)
        .with_context(|| format!("failed to compare {} with {}", list.display(), csv.display()))?;
    tkscrape_store::write_lines(output, &report.remaining)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("total in list:  {}", report.total);
    println!("already scraped: {}", report.scraped);
    println!("remaining:      {}", report.remaining.len());
    println!("progress:       {:.1}%", report.progress_percent());
    println!("written to {}", output.display());
    Ok(())
}
