//! File-backed persistence for scrape results and identifier lists.
//!
//! Every write goes through a temporary file in the target directory that is
//! renamed over the destination, so readers never observe a half-written
//! file.

pub mod csv_store;
pub mod error;
pub mod lists;
pub mod merge;
pub mod overlay;

pub use csv_store::{read_records, write_records};
pub use error::StoreError;
pub use lists::{
    clean_url_list, dedupe_lines, dedupe_list_file, read_lines, read_username_list,
    remaining_usernames, write_lines, CleanReport, DedupeReport, RemainingReport,
};
pub use merge::{merge_csv_files, merge_records, InputCount, MergeReport};
pub use overlay::{overlay_successes, overlay_successes_on_file, OverlayReport};
