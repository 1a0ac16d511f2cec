//! Core trait for streaming readers.

use crate::SmsMessage;
use crate::error::Result;

/// Iterator over backup messages with progress tracking.
///
/// Extends the standard [`Iterator`] trait with methods for monitoring
/// how much of the underlying file has been consumed. The aggregator uses
/// these to compute throughput and ETA.
///
/// An iterator yields at most one `Err` and then ends: a malformed document
/// cannot be resumed.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> smsslicer::Result<()> {
/// use smsslicer::config::StreamingConfig;
/// use smsslicer::streaming::{MessageIterator, SmsReader};
///
/// let mut reader = SmsReader::open("sms-backup.xml", &StreamingConfig::default())?;
///
/// while let Some(result) = reader.next() {
///     let msg = result?;
///
///     if let Some(pct) = reader.progress() {
///         eprintln!("\r{:.1}% {}", pct, msg.address);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub trait MessageIterator: Iterator<Item = Result<SmsMessage>> {
    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if the total size is unknown.
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return Some(100.0);
        }
        Some((self.bytes_processed() as f64 / total as f64 * 100.0).min(100.0))
    }

    /// Returns the number of bytes consumed so far.
    fn bytes_processed(&self) -> u64;

    /// Returns the total input size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}
