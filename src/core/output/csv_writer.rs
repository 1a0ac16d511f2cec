//! CSV transcript writer.

use crate::core::models::ExportRecord;
use crate::error::{Result, SmsSlicerError};

/// Header row of CSV transcripts.
pub const CSV_HEADER: [&str; 3] = ["Timestamp", "Type", "Message"];

/// Serializes records to CSV.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `Timestamp`, `Type`, `Message`
/// - Quoting: only where needed (embedded commas, quotes, newlines)
/// - Encoding: UTF-8, `\n` line endings
///
/// An empty slice produces the header row only.
pub fn to_csv(records: &[ExportRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record([
            record.timestamp.as_str(),
            record.direction.as_str(),
            record.body.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| SmsSlicerError::Csv(e.into_error().into()))
}
