//! Unified error types for smsslicer.
//!
//! This module provides a single [`SmsSlicerError`] enum covering every
//! failure the engine can surface. The three data-path kinds callers are
//! expected to tell apart are:
//!
//! - [`FileAccess`](SmsSlicerError::FileAccess): the backup could not be
//!   opened or read
//! - [`MalformedInput`](SmsSlicerError::MalformedInput): the XML is not
//!   well-formed, or an `sms` element lacks a required attribute
//! - [`OutputWrite`](SmsSlicerError::OutputWrite): the export destination
//!   could not be created or written
//!
//! None of them are retried by the library.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for smsslicer operations.
///
/// # Example
///
/// ```rust
/// use smsslicer::error::Result;
/// use smsslicer::core::ConversationTable;
///
/// fn my_function() -> Result<ConversationTable> {
///     Ok(ConversationTable::new())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SmsSlicerError>;

/// The error type for all smsslicer operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SmsSlicerError {
    /// The backup file could not be opened or read.
    ///
    /// This typically happens when:
    /// - The file doesn't exist
    /// - Permission denied
    /// - The device failed mid-read
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        /// The backup file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backup is not a well-formed SMS backup document.
    #[error("Malformed backup {} at byte {position}: {source}", path.display())]
    MalformedInput {
        /// The backup file path
        path: PathBuf,
        /// Byte offset where the problem was detected
        position: u64,
        /// What was wrong
        #[source]
        source: MalformedKind,
    },

    /// The export destination could not be created or written.
    ///
    /// No file is left at the destination when this is returned.
    #[error("Cannot write {}: {source}", path.display())]
    OutputWrite {
        /// The destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid date in an export request.
    ///
    /// Dates are expected in YYYY-MM-DD format and must map to an existing
    /// local time.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A format name or file extension was not recognized.
    #[error("Invalid {format}: {message}")]
    InvalidFormat {
        /// What was being interpreted (e.g. "export format", "backup path")
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// No conversation exists for the requested address.
    #[error("No messages found for address '{0}'")]
    UnknownAddress(String),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of malformed input.
#[derive(Debug, Error)]
pub enum MalformedKind {
    /// The XML itself is not well-formed
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be tokenized
    #[error("{0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    /// A required attribute is absent
    #[error("sms element is missing required attribute '{0}'")]
    MissingAttribute(&'static str),
    /// An attribute is present but its value cannot be interpreted
    #[error("attribute '{name}' has invalid value '{value}'")]
    InvalidAttribute {
        /// Attribute name
        name: &'static str,
        /// Raw attribute value
        value: String,
    },
    /// The timestamp cannot be represented as a calendar date
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
    /// The document ends before a root element was opened and closed
    #[error("unexpected end of document")]
    UnexpectedEof,
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SmsSlicerError {
    /// Creates a file access error.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SmsSlicerError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed input error.
    pub fn malformed(path: impl Into<PathBuf>, position: u64, source: impl Into<MalformedKind>) -> Self {
        SmsSlicerError::MalformedInput {
            path: path.into(),
            position,
            source: source.into(),
        }
    }

    /// Creates an output write error.
    pub fn output_write(path: &Path, source: io::Error) -> Self {
        SmsSlicerError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        SmsSlicerError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        SmsSlicerError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if the backup could not be opened or read.
    pub fn is_file_access(&self) -> bool {
        matches!(self, SmsSlicerError::FileAccess { .. })
    }

    /// Returns `true` if the backup is malformed.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, SmsSlicerError::MalformedInput { .. })
    }

    /// Returns `true` if the export destination could not be written.
    pub fn is_output_write(&self) -> bool {
        matches!(self, SmsSlicerError::OutputWrite { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, SmsSlicerError::InvalidDate { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, SmsSlicerError::InvalidFormat { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
