//! Plain-text transcript writer.

use crate::core::models::ExportRecord;

/// Serializes records as `[YYYY-MM-DD HH:MM:SS] <direction>: <body>` lines.
///
/// Bodies are written verbatim, so a multi-line body spans several lines.
/// An empty slice produces an empty transcript.
pub fn to_txt(records: &[ExportRecord]) -> Vec<u8> {
    let mut out = String::with_capacity(records.len() * 64);

    for record in records {
        out.push('[');
        out.push_str(&record.timestamp);
        out.push_str("] ");
        out.push_str(record.direction.as_str());
        out.push_str(": ");
        out.push_str(&record.body);
        out.push('\n');
    }

    out.into_bytes()
}
