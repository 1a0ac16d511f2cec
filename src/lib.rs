//! # smsslicer
//!
//! Per-contact statistics and date-filtered transcript export for SMS
//! backup files (the flat `<smses><sms .../></smses>` XML written by
//! common Android backup apps).
//!
//! ## Overview
//!
//! Backups routinely reach hundreds of megabytes, so everything here is
//! streaming:
//! - **Aggregation** makes one forward pass and builds a
//!   [`ConversationTable`](core::ConversationTable) while reporting
//!   throughput-based progress
//! - **Export** makes an independent pass for one contact and date range,
//!   then writes a TXT or CSV transcript atomically
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smsslicer::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Pass 1: statistics
//!     let table = aggregate("sms-backup.xml", no_progress())?;
//!     for (address, stats) in table.top_by_count(10) {
//!         println!("{:<24} {:<16} {}", stats.display_name(), address, stats.count);
//!     }
//!
//!     // Pass 2: one conversation, any number of times
//!     let stats = table.get("+15551234567").unwrap();
//!     let (start, end) = stats.date_span().unwrap();
//!     let request = ExportRequest::new("+15551234567", start, end).with_format(ExportFormat::Csv);
//!     let path = export("sms-backup.xml", &request)?;
//!     println!("saved {}", path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`streaming`] - pull-based [`SmsReader`](streaming::SmsReader)
//! - [`core`] - aggregation, export, filtering and output writers
//!   - [`core::aggregator`] - [`Aggregator`](core::Aggregator), [`aggregate`](core::aggregate)
//!   - [`core::exporter`] - [`Exporter`](core::Exporter), [`ExportRequest`](core::ExportRequest)
//!   - [`core::output`] - TXT/CSV writers and atomic commit
//! - [`progress`] - [`ProgressSnapshot`](progress::ProgressSnapshot) and stock sinks
//! - [`config`] - [`StreamingConfig`](config::StreamingConfig)
//! - [`format`] - [`ExportFormat`](format::ExportFormat)
//! - [`files`] - backup discovery and validation
//! - [`error`] - [`SmsSlicerError`], [`Result`]
//! - [`prelude`] - Convenient re-exports
//!
//! ## Logging
//!
//! The library logs through [`tracing`] and never installs a subscriber.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod files;
pub mod format;
pub mod message;
pub mod progress;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use error::{Result, SmsSlicerError};
pub use message::{Direction, SmsMessage};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use smsslicer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::message::{Direction, SmsMessage};

    pub use crate::error::{Result, SmsSlicerError};

    pub use crate::config::StreamingConfig;

    pub use crate::core::{
        Aggregator, ConversationStats, ConversationTable, ExportRecord, ExportRequest, Exporter,
        aggregate, export,
    };

    pub use crate::format::ExportFormat;

    pub use crate::progress::{ProgressSnapshot, SinkResult, no_progress, stderr_progress};

    pub use crate::streaming::{MessageIterator, SmsReader};

    pub use crate::files::{find_sms_backups, validate_backup_path};
}
