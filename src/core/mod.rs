//! Core processing logic for smsslicer.
//!
//! This module contains:
//! - [`models`] - Statistics and export record types
//! - [`aggregator`] - The single-pass statistics engine
//! - [`exporter`] - Date-filtered conversation export
//! - [`filter`] - Local-date bounds for exports
//! - [`output`] - Format writers (TXT, CSV) and atomic commit
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use smsslicer::core::{ExportRequest, aggregate, export};
//! use smsslicer::progress::no_progress;
//!
//! # fn main() -> smsslicer::Result<()> {
//! let table = aggregate("sms-backup.xml", no_progress())?;
//!
//! if let Some((address, stats)) = table.top_by_count(1).into_iter().next() {
//!     let (start, end) = stats.date_span().unwrap();
//!     export("sms-backup.xml", &ExportRequest::new(address, start, end))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod exporter;
pub mod filter;
pub mod models;
pub mod output;

pub use aggregator::{Aggregator, aggregate};
pub use exporter::{ExportRequest, Exporter, export};
pub use filter::DateRange;
pub use models::{ConversationStats, ConversationTable, ExportRecord};
pub use output::render;
