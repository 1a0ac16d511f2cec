//! Transcript writers.
//!
//! This module provides serializers for the two export formats:
//! - [`to_txt`] - one `[timestamp] direction: body` line per message
//! - [`to_csv`] - `Timestamp,Type,Message` with standard quoting
//!
//! and [`write_atomic`], which commits a finished transcript to disk so a
//! failed export never leaves a truncated file behind.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> smsslicer::Result<()> {
//! use smsslicer::core::ExportRecord;
//! use smsslicer::core::output::write_records;
//! use smsslicer::format::ExportFormat;
//! use smsslicer::Direction;
//!
//! let records = vec![ExportRecord {
//!     timestamp: "2024-06-15 12:30:00".into(),
//!     direction: Direction::Sent,
//!     body: "Hello!".into(),
//!     raw_timestamp: 1718454600000,
//! }];
//!
//! write_records(&records, "conversation.csv".as_ref(), ExportFormat::Csv)?;
//! # Ok(())
//! # }
//! ```

mod csv_writer;
mod txt_writer;

use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

pub use csv_writer::{CSV_HEADER, to_csv};
pub use txt_writer::to_txt;

use crate::core::models::ExportRecord;
use crate::error::{Result, SmsSlicerError};
use crate::format::ExportFormat;

/// Serializes records in the requested format.
pub fn render(records: &[ExportRecord], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Txt => Ok(to_txt(records)),
        ExportFormat::Csv => to_csv(records),
    }
}

/// Writes `bytes` to `destination` all-or-nothing.
///
/// The content goes to a temporary file in the destination's directory,
/// which is flushed and then renamed over the destination. On any failure
/// the temporary file is removed and the destination is untouched.
///
/// On Unix a replaced file keeps its mode; a new one gets `0o666` minus
/// the process umask, as a plain `File::create` would.
///
/// # Errors
///
/// Returns [`SmsSlicerError::OutputWrite`] if the directory does not exist,
/// is not writable, or the rename fails (e.g. the destination is a directory).
pub fn write_atomic(bytes: &[u8], destination: &Path) -> Result<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = staging_file(dir, destination).map_err(|e| SmsSlicerError::output_write(destination, e))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.flush())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| SmsSlicerError::output_write(destination, e))?;

    staged
        .persist(destination)
        .map_err(|e| SmsSlicerError::output_write(destination, e.error))?;

    Ok(())
}

#[cfg_attr(not(unix), allow(unused_variables))]
fn staging_file(dir: &Path, destination: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    builder.permissions(target_permissions(destination));
    builder.tempfile_in(dir)
}

#[cfg(unix)]
fn target_permissions(destination: &Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(destination) {
        Ok(meta) if meta.is_file() => meta.permissions(),
        _ => std::fs::Permissions::from_mode(0o666),
    }
}

/// Renders records and commits them to `destination`.
pub fn write_records(records: &[ExportRecord], destination: &Path, format: ExportFormat) -> Result<()> {
    let bytes = render(records, format)?;
    write_atomic(&bytes, destination)
}
