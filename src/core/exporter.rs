//! Date-filtered transcript export for one conversation.
//!
//! Export is an independent second pass over the backup: it shares nothing
//! with the aggregation pass except the file path.
//!
//! | Step | Detail |
//! |------|--------|
//! | filter | address equals the request, timestamp inside [`DateRange`] |
//! | order | stable sort by raw timestamp, ties keep file order |
//! | render | [`ExportFormat::Txt`] or [`ExportFormat::Csv`] into memory |
//! | commit | temp file in the destination directory, then rename |
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use smsslicer::core::{ExportRequest, Exporter};
//! use smsslicer::format::ExportFormat;
//!
//! # fn main() -> smsslicer::Result<()> {
//! let request = ExportRequest::new(
//!     "+15551234567",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//! )
//! .with_format(ExportFormat::Csv);
//!
//! // conversation__15551234567_2024-01-01_2024-12-31.csv under ./exports
//! let written = Exporter::new()
//!     .with_output_dir("exports")
//!     .export("sms-backup.xml", &request)?;
//! println!("wrote {}", written.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StreamingConfig;
use crate::core::filter::{DATE_FORMAT, DateRange};
use crate::core::models::ExportRecord;
use crate::core::output;
use crate::error::{Result, SmsSlicerError};
use crate::format::ExportFormat;
use crate::streaming::{MessageIterator, SmsReader};

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Exact address to match.
    pub address: String,

    /// First local calendar date, inclusive.
    pub start_date: NaiveDate,

    /// Last local calendar date, inclusive.
    pub end_date: NaiveDate,

    #[serde(default)]
    pub format: ExportFormat,

    /// Destination; the default file name is used when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ExportRequest {
    pub fn new(address: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            address: address.into(),
            start_date,
            end_date,
            format: ExportFormat::default(),
            output: None,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Millisecond bounds for the requested dates in local time.
    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::from_local_dates(self.start_date, self.end_date)
    }

    /// `conversation_<address>_<start>_<end>.<ext>`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use smsslicer::core::ExportRequest;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    /// let request = ExportRequest::new("+1 (555) 010", day, day);
    /// assert_eq!(
    ///     request.default_file_name(),
    ///     "conversation__1__555__010_2024-03-09_2024-03-09.txt"
    /// );
    /// ```
    pub fn default_file_name(&self) -> String {
        format!(
            "conversation_{}_{}_{}.{}",
            sanitize_address(&self.address),
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT),
            self.format.extension()
        )
    }
}

/// Replaces every non-alphanumeric character with `_`.
pub fn sanitize_address(address: &str) -> String {
    address
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Exports conversations from a backup.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: StreamingConfig,
    output_dir: Option<PathBuf>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreamingConfig) -> Self {
        Self {
            config,
            output_dir: None,
        }
    }

    /// Directory for requests without an explicit output path.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Where `request` will be written.
    pub fn destination(&self, request: &ExportRequest) -> PathBuf {
        match (&request.output, &self.output_dir) {
            (Some(output), _) => output.clone(),
            (None, Some(dir)) => dir.join(request.default_file_name()),
            (None, None) => PathBuf::from(request.default_file_name()),
        }
    }

    /// Streams the backup and returns the matching records, oldest first.
    ///
    /// # Errors
    ///
    /// - [`InvalidDate`](SmsSlicerError::InvalidDate) if a bound cannot be
    ///   resolved in the local time zone
    /// - [`FileAccess`](SmsSlicerError::FileAccess) /
    ///   [`MalformedInput`](SmsSlicerError::MalformedInput) from the reader
    pub fn collect<P: AsRef<Path>>(&self, path: P, request: &ExportRequest) -> Result<Vec<ExportRecord>> {
        let path = path.as_ref();
        let range = request.date_range()?;
        let mut reader = SmsReader::open(path, &self.config)?;

        let mut records = Vec::new();
        while let Some(result) = reader.next() {
            let msg = result?;
            if msg.address != request.address || !range.contains(msg.timestamp) {
                continue;
            }

            let record = ExportRecord::from_message(msg)
                .map_err(|kind| SmsSlicerError::malformed(path, reader.bytes_processed(), kind))?;
            records.push(record);
        }

        records.sort_by_key(|record| record.raw_timestamp);
        debug!(address = %request.address, matched = records.len(), "collected export records");
        Ok(records)
    }

    /// Collects, renders and atomically writes the transcript.
    ///
    /// Returns the path written. On error no file is created or modified.
    pub fn export<P: AsRef<Path>>(&self, path: P, request: &ExportRequest) -> Result<PathBuf> {
        let destination = self.destination(request);
        let records = self.collect(path, request)?;
        output::write_records(&records, &destination, request.format)?;

        info!(
            address = %request.address,
            messages = records.len(),
            format = %request.format,
            path = %destination.display(),
            "exported conversation"
        );
        Ok(destination)
    }
}

/// Exports with default settings.
///
/// See [`Exporter::export`].
pub fn export<P: AsRef<Path>>(path: P, request: &ExportRequest) -> Result<PathBuf> {
    Exporter::new().export(path, request)
}
