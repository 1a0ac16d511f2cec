//! Streaming access to SMS backup files.
//!
//! Backups routinely run to hundreds of megabytes, so nothing here builds a
//! document tree. [`SmsReader`] pulls one tag at a time from a buffered
//! reader and yields one [`SmsMessage`](crate::SmsMessage) per `sms`
//! element, and [`MessageIterator`] exposes how many bytes have been
//! consumed so callers can report progress.
//!
//! # Example
//!
//! ```rust,no_run
//! use smsslicer::config::StreamingConfig;
//! use smsslicer::streaming::SmsReader;
//!
//! let reader = SmsReader::open("sms-backup.xml", &StreamingConfig::default()).unwrap();
//!
//! // Count sent messages without ever holding more than one in memory
//! let sent = reader
//!     .filter_map(Result::ok)
//!     .filter(|msg| msg.direction.is_sent())
//!     .count();
//! ```
//!
//! # Memory Usage
//!
//! | Approach | 500MB backup |
//! |----------|--------------|
//! | DOM parse | ~2GB RAM |
//! | [`SmsReader`] | buffer size + one element |

mod reader;
mod traits;

pub use reader::{SMS_TAG, SmsReader};
pub use traits::MessageIterator;
