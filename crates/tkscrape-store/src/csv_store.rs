//! Reading and writing the fixed-schema results CSV.
//!
//! Files are UTF-8 with a byte-order mark and CRLF line endings so that
//! spreadsheet tools open them without an import dialog. Reads tolerate a
//! missing BOM, extra columns and missing columns.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tempfile::NamedTempFile;
use tkscrape_core::{ProfileRecord, CSV_COLUMNS};

use crate::error::StoreError;

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loads every row of a results CSV.
///
/// Cells that are not valid UTF-8 are decoded lossily so the row is kept;
/// a rewrite of the file never loses records that were readable bytes.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read, or
/// [`StoreError::Csv`] if the header or any row cannot be parsed.
pub fn read_records(path: &Path) -> Result<Vec<ProfileRecord>, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    parse_records(path, &bytes)
}

fn parse_records(path: &Path, bytes: &[u8]) -> Result<Vec<ProfileRecord>, StoreError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(body);
    let headers = reader
        .byte_headers()
        .map_err(|e| StoreError::csv(path, e))?
        .clone();
    let headers = StringRecord::from_byte_record_lossy(headers);

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row.map_err(|e| StoreError::csv(path, e))?;
        if std::str::from_utf8(row.as_slice()).is_err() {
            tracing::warn!(
                path = %path.display(),
                line = ?row.position().map(csv::Position::line),
                "row is not valid UTF-8; decoding lossily"
            );
        }
        let record: ProfileRecord = StringRecord::from_byte_record_lossy(row)
            .deserialize(Some(&headers))
            .map_err(|e| StoreError::csv(path, e))?;
        records.push(record);
    }
    Ok(records)
}

/// Writes `records` to `path` with the fixed header, replacing any existing
/// file atomically. Parent directories are created.
///
/// # Errors
///
/// Returns [`StoreError`] if the temporary file cannot be written or renamed
/// into place.
pub fn write_records(path: &Path, records: &[ProfileRecord]) -> Result<(), StoreError> {
    write_atomic(path, |out| {
        out.write_all(UTF8_BOM).map_err(|e| StoreError::io(path, e))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(out);
        writer
            .write_record(CSV_COLUMNS)
            .map_err(|e| StoreError::csv(path, e))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StoreError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

/// Writes through a temporary file in the destination directory, then renames
/// it over `path`. On any error the destination is left untouched.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), StoreError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
    {
        let mut buffered = BufWriter::new(tmp.as_file_mut());
        write(&mut buffered)?;
        buffered.flush().map_err(|e| StoreError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
