//! Export format types.
//!
//! # Example
//!
//! ```rust
//! use smsslicer::format::ExportFormat;
//! use std::str::FromStr;
//!
//! let format = ExportFormat::from_str("csv").unwrap();
//! assert_eq!(format, ExportFormat::Csv);
//! assert_eq!(format.extension(), "csv");
//!
//! // Or use format detection from extension
//! let format = ExportFormat::from_path("conversation.txt").unwrap();
//! assert_eq!(format, ExportFormat::Txt);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SmsSlicerError;

/// Output format for conversation transcripts.
///
/// - [`Txt`](ExportFormat::Txt) - human readable, one line per message
/// - [`Csv`](ExportFormat::Csv) - spreadsheet compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `[YYYY-MM-DD HH:MM:SS] direction: body` lines
    #[default]
    Txt,

    /// `Timestamp,Type,Message` with standard CSV quoting
    Csv,
}

impl ExportFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["txt", "text", "csv"]
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Errors
    ///
    /// Returns [`SmsSlicerError::InvalidFormat`] if the path has no
    /// extension or an unrecognized one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SmsSlicerError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(SmsSlicerError::invalid_format(
                "export format",
                format!("Cannot infer a format from '{}'. Expected a .txt or .csv file", path.display()),
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Txt => write!(f, "TXT"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = SmsSlicerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(SmsSlicerError::invalid_format(
                "export format",
                format!(
                    "Unknown format: '{}'. Expected one of: {}",
                    s,
                    ExportFormat::all_names().join(", ")
                ),
            )),
        }
    }
}
