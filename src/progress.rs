//! Progress reporting for the aggregation pass.
//!
//! The aggregator pushes a [`ProgressSnapshot`] to a caller-supplied sink
//! at most once per configured interval, plus one final snapshot at 100%.
//! A sink is any `FnMut(&ProgressSnapshot<'_>) -> SinkResult`.
//!
//! # Example
//!
//! ```rust,no_run
//! use smsslicer::core::aggregate;
//! use smsslicer::progress::ProgressSnapshot;
//!
//! let table = aggregate("sms-backup.xml", |snapshot: &ProgressSnapshot<'_>| {
//!     eprintln!(
//!         "{:.0}% ({:.1} MB/s, {:.0}s left, {} contacts so far)",
//!         snapshot.progress * 100.0,
//!         snapshot.throughput_mb_s,
//!         snapshot.eta_secs,
//!         snapshot.conversations.len(),
//!     );
//!     Ok(())
//! })?;
//! # Ok::<(), smsslicer::SmsSlicerError>(())
//! ```
//!
//! Sink failures never abort the pass: an `Err` or a panic from the sink is
//! logged at `warn` level and streaming continues.

use std::time::Duration;

use crate::core::ConversationTable;

/// Bytes per megabyte for throughput figures.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Error type a sink may return. Only ever logged.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by progress sinks.
pub type SinkResult = Result<(), SinkError>;

/// Point-in-time view of an aggregation pass.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot<'a> {
    /// Fraction of the file consumed, in `[0, 1]`.
    pub progress: f64,

    /// MB consumed per elapsed second. Zero in the final snapshot.
    pub throughput_mb_s: f64,

    /// Estimated seconds remaining. Zero when unknown or complete.
    pub eta_secs: f64,

    /// Messages folded into the table so far.
    pub messages_processed: u64,

    /// Bytes consumed so far.
    pub bytes_processed: u64,

    /// Size of the backup file.
    pub total_bytes: u64,

    /// Statistics accumulated so far (partial until the final snapshot).
    pub conversations: &'a ConversationTable,

    finished: bool,
}

impl<'a> ProgressSnapshot<'a> {
    /// Computes progress, throughput and ETA from raw counters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use smsslicer::core::ConversationTable;
    /// use smsslicer::progress::{BYTES_PER_MB, ProgressSnapshot};
    ///
    /// let table = ConversationTable::new();
    /// let mb = BYTES_PER_MB as u64;
    /// let snapshot = ProgressSnapshot::measure(mb, 4 * mb, Duration::from_secs(1), 10, &table);
    ///
    /// assert_eq!(snapshot.progress, 0.25);
    /// assert_eq!(snapshot.throughput_mb_s, 1.0);
    /// assert_eq!(snapshot.eta_secs, 3.0);
    /// ```
    pub fn measure(
        bytes_processed: u64,
        total_bytes: u64,
        elapsed: Duration,
        messages_processed: u64,
        conversations: &'a ConversationTable,
    ) -> Self {
        let progress = if total_bytes == 0 {
            1.0
        } else {
            (bytes_processed as f64 / total_bytes as f64).min(1.0)
        };

        let elapsed_secs = elapsed.as_secs_f64();
        let throughput_mb_s = if elapsed_secs > 0.0 {
            bytes_processed as f64 / BYTES_PER_MB / elapsed_secs
        } else {
            0.0
        };

        let eta_secs = if throughput_mb_s > 0.0 && progress < 1.0 {
            total_bytes.saturating_sub(bytes_processed) as f64 / BYTES_PER_MB / throughput_mb_s
        } else {
            0.0
        };

        Self {
            progress,
            throughput_mb_s,
            eta_secs,
            messages_processed,
            bytes_processed,
            total_bytes,
            conversations,
            finished: false,
        }
    }

    /// The final snapshot: progress 1.0, throughput and ETA zero.
    pub fn complete(messages_processed: u64, total_bytes: u64, conversations: &'a ConversationTable) -> Self {
        Self {
            progress: 1.0,
            throughput_mb_s: 0.0,
            eta_secs: 0.0,
            messages_processed,
            bytes_processed: total_bytes,
            total_bytes,
            conversations,
            finished: true,
        }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    pub fn percentage(&self) -> f64 {
        self.progress * 100.0
    }

    /// Returns whether this is the final snapshot.
    pub fn is_complete(&self) -> bool {
        self.finished
    }
}

/// Creates a no-op sink.
///
/// ```rust
/// use smsslicer::core::ConversationTable;
/// use smsslicer::progress::{ProgressSnapshot, no_progress};
///
/// let table = ConversationTable::new();
/// let mut sink = no_progress();
/// assert!(sink(&ProgressSnapshot::complete(0, 0, &table)).is_ok());
/// ```
pub fn no_progress() -> impl FnMut(&ProgressSnapshot<'_>) -> SinkResult {
    |_| Ok(())
}

/// Creates a sink that redraws a single status line on stderr.
pub fn stderr_progress() -> impl FnMut(&ProgressSnapshot<'_>) -> SinkResult {
    |snapshot| {
        if snapshot.is_complete() {
            eprintln!(
                "\rProcessed {} messages across {} conversations          ",
                snapshot.messages_processed,
                snapshot.conversations.len()
            );
        } else {
            eprint!(
                "\rProcessing... {:5.1}% {:.1} MB/s, {:.0}s remaining",
                snapshot.percentage(),
                snapshot.throughput_mb_s,
                snapshot.eta_secs
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_measure_progress_and_eta() {
        let table = ConversationTable::new();
        let snapshot = ProgressSnapshot::measure(2 * MB, 10 * MB, Duration::from_secs(2), 5, &table);
        assert_eq!(snapshot.progress, 0.2);
        assert_eq!(snapshot.throughput_mb_s, 1.0);
        assert_eq!(snapshot.eta_secs, 8.0);
        assert_eq!(snapshot.messages_processed, 5);
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_measure_zero_elapsed_has_zero_eta() {
        let table = ConversationTable::new();
        let snapshot = ProgressSnapshot::measure(MB, 10 * MB, Duration::ZERO, 1, &table);
        assert_eq!(snapshot.throughput_mb_s, 0.0);
        assert_eq!(snapshot.eta_secs, 0.0);
    }

    #[test]
    fn test_measure_clamps_progress() {
        let table = ConversationTable::new();
        let snapshot = ProgressSnapshot::measure(3 * MB, 2 * MB, Duration::from_secs(1), 1, &table);
        assert_eq!(snapshot.progress, 1.0);
        assert_eq!(snapshot.eta_secs, 0.0);
    }

    #[test]
    fn test_measure_empty_file() {
        let table = ConversationTable::new();
        let snapshot = ProgressSnapshot::measure(0, 0, Duration::from_secs(1), 0, &table);
        assert_eq!(snapshot.progress, 1.0);
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_complete_snapshot() {
        let table = ConversationTable::new();
        let snapshot = ProgressSnapshot::complete(42, 1000, &table);
        assert_eq!(snapshot.progress, 1.0);
        assert_eq!(snapshot.throughput_mb_s, 0.0);
        assert_eq!(snapshot.eta_secs, 0.0);
        assert_eq!(snapshot.percentage(), 100.0);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_no_progress_sink() {
        let table = ConversationTable::new();
        let mut sink = no_progress();
        assert!(sink(&ProgressSnapshot::complete(0, 0, &table)).is_ok());
    }
}
